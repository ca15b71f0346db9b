//! story-adapters: colaboradores externos del motor de historias.
//!
//! Este crate provee:
//! - `presentation`: texto legible de un `Execution` (steps ejecutados,
//!   omitidos o fallidos y contexto final con procedencia).
//! - `contract`: `SchemaContract`, validador de variables basado en serde.
//! - `config`: parámetros del presentador desde variables de entorno.
//!
//! Nota: el core sólo expone el registro de ejecución; todo el formato vive
//! aquí.

pub mod config;
pub mod contract;
pub mod presentation;

pub use config::PresenterConfig;
pub use contract::SchemaContract;
pub use presentation::{present, Presenter};
