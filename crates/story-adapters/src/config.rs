//! Carga de configuración del presentador desde variables de entorno.
//! Variables: `STORYLINE_MAX_LINE_WIDTH` y `STORYLINE_INDENT`.

use std::env;

use dotenvy::dotenv;
use once_cell::sync::Lazy;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

pub const DEFAULT_MAX_LINE_WIDTH: usize = 79;
pub const DEFAULT_INDENT: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresenterConfig {
    /// Ancho a partir del cual un valor del contexto pasa a su propia línea.
    pub max_line_width: usize,
    /// Espacios por nivel de anidamiento.
    pub indent: usize,
}

impl Default for PresenterConfig {
    fn default() -> Self {
        Self { max_line_width: DEFAULT_MAX_LINE_WIDTH,
               indent: DEFAULT_INDENT }
    }
}

impl PresenterConfig {
    /// Valores inválidos o ausentes caen a los defaults.
    pub fn from_env() -> Self {
        Lazy::force(&DOTENV_LOADED);
        let max_line_width = read("STORYLINE_MAX_LINE_WIDTH").unwrap_or(DEFAULT_MAX_LINE_WIDTH);
        let indent = read("STORYLINE_INDENT").unwrap_or(DEFAULT_INDENT);
        Self { max_line_width, indent }
    }
}

fn read(key: &str) -> Option<usize> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            log::warn!("config:{key} invalid value {raw:?}, using default");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_terminal_width() {
        let cfg = PresenterConfig::default();
        assert_eq!(cfg.max_line_width, 79);
        assert_eq!(cfg.indent, 2);
    }
}
