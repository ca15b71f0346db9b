use serde::{Deserialize, Serialize};

/// Estado terminal de una ejecución completa.
///
/// - `Completed`: se agotaron las instrucciones (también tras un `Skip` de
///   nivel raíz). El valor devuelto es `None`.
/// - `Returned`: un step devolvió `Outcome::Result`.
/// - `Failed`: un step devolvió `Outcome::Failure`.
/// - `Errored`: la ejecución se interrumpió con un `StoryError` que no es un
///   fallo de negocio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    Completed,
    Returned,
    Failed,
    Errored,
}
