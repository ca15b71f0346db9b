//! Ejecución de historias compiladas.
//!
//! `BoundStory` compila una vez y expone tres puntos de entrada con el mismo
//! recorrido: `call` (lanza el fallo de negocio), `run` (lo devuelve como
//! valor) y `execute` (registro completo de la ejecución).

pub(crate) mod core;
mod execution;
mod story;

pub use execution::{Execution, Summary, Termination};
pub use story::BoundStory;
