//! Steps: unidades de trabajo de una historia.
//!
//! Un step recibe una vista de sólo lectura del contexto y devuelve a lo sumo
//! un `Outcome`. Los errores propios del step viajan como `StepError` y nunca
//! se convierten en fallo de negocio.

pub mod macros;
mod outcome;
mod status;

pub use outcome::{Outcome, Outputs};
pub use status::RunStatus;

use crate::context::ContextView;
use crate::errors::StepError;

/// Resultado de un step. `Ok(None)` equivale a no devolver nada: el motor
/// continúa con el contexto intacto.
pub type StepResult = Result<Option<Outcome>, StepError>;

/// Firma de un step registrado sobre un host `H`.
pub type StepFn<H> = fn(&H, &ContextView<'_>) -> StepResult;
