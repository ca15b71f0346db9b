use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Variables nuevas producidas por `Outcome::Success`, en orden.
pub type Outputs = IndexMap<String, Value>;

/// Marcador devuelto por un step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Outcome {
    /// Continuar; agrega las variables al contexto (sin sobrescribir).
    Success(Outputs),
    /// Detener la ejecución completa, con razón opcional.
    Failure(Option<String>),
    /// Abandonar la historia actual y seguir en la historia padre.
    Skip,
    /// Detener la ejecución completa devolviendo un valor.
    Result(Value),
}

impl Outcome {
    pub fn success() -> Self {
        Outcome::Success(Outputs::new())
    }

    pub fn success_with<I, K, V>(pairs: I) -> Self
        where I: IntoIterator<Item = (K, V)>,
              K: Into<String>,
              V: Into<Value>
    {
        Outcome::Success(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    pub fn failure() -> Self {
        Outcome::Failure(None)
    }

    pub fn failure_because(reason: impl Into<String>) -> Self {
        Outcome::Failure(Some(reason.into()))
    }

    pub fn skip() -> Self {
        Outcome::Skip
    }

    pub fn result(value: impl Into<Value>) -> Self {
        Outcome::Result(value.into())
    }

    /// Código corto usado en logs.
    pub fn code(&self) -> &'static str {
        match self {
            Outcome::Success(_) => "S",
            Outcome::Failure(_) => "F",
            Outcome::Skip => "K",
            Outcome::Result(_) => "R",
        }
    }
}
