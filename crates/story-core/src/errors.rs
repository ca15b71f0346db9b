//! Errores del motor de historias.
//!
//! - `CompileError`: la fase de colección no pudo resolver un cuerpo
//!   declarativo.
//! - `StoryError`: todo lo que puede interrumpir una ejecución. El fallo de
//!   negocio (`FailureError`) sólo aparece aquí en el punto de entrada que
//!   lanza (`call`); `run` lo devuelve como valor.
//! - `StepError`: transporte de cualquier error producido dentro del cuerpo
//!   de un step. El motor no lo reclasifica como fallo de negocio.

use std::error::Error as StdError;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{CONTEXT_CONTRACT_ERROR, FAILURE_ERROR, FAILURE_PROTOCOL_ERROR, MUTATION_ERROR};

/// Nombre corto de un tipo (`a::b::Foo<x::Y>` -> `Foo`).
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("'{host}' has no step or story named '{name}' (referenced by {story})")]
    UnknownCapability { host: &'static str, story: String, name: String },
    #[error("'{host}' declares no story named '{name}'")]
    UnknownStory { host: &'static str, name: String },
    #[error("story {story} includes itself ({})", .path.join(" -> "))]
    RecursiveStory { story: String, path: Vec<String> },
    #[error("'{host}' registers '{name}' more than once")]
    DuplicateCapability { host: &'static str, name: String },
}

/// Una variable rechazada por un `Contract`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractViolation {
    pub variable: String,
    pub message: String,
}

impl fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.variable, self.message)
    }
}

fn join_violations(violations: &[ContractViolation]) -> String {
    violations.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

/// Violaciones del contrato de variables de una historia.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContextContractError {
    #[error("story {story} called with positional and keyword arguments at once")]
    MixedArguments { story: String },
    #[error("story {story} received keyword arguments more than once: {names:?}")]
    RepeatedArguments { story: String, names: Vec<String> },
    #[error("story {story} takes {expected} positional arguments, {found} given")]
    PositionalCount { story: String, expected: usize, found: usize },
    #[error("story {story} arguments mismatch (missing: {missing:?}, unexpected: {unexpected:?})")]
    ArgumentMismatch {
        story: String,
        missing: Vec<String>,
        unexpected: Vec<String>,
    },
    #[error("substory {story} requires variables missing from context: {missing:?}")]
    MissingVariables { story: String, missing: Vec<String> },
    #[error("story {story} contract rejected variables: {}", join_violations(.violations))]
    InvalidVariables {
        story: String,
        violations: Vec<ContractViolation>,
    },
}

/// Un step rompió el protocolo de resultados.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FailureProtocolError {
    #[error("step {step} tried to override context variables: {names:?}")]
    VariableOverride { step: String, names: Vec<String> },
    #[error("step {step} failed with reason {reason:?} not declared by story {story} (declared: {declared:?})")]
    UndeclaredReason {
        step: String,
        story: String,
        reason: String,
        declared: Vec<String>,
    },
    #[error("step {step} failed with reason {reason:?} but story {story} declares no failure protocol")]
    NoProtocol { step: String, story: String, reason: String },
    #[error("failed story has no value")]
    ValueOfFailure,
}

/// Intento de modificar el contexto desde fuera del motor.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MutationError {
    #[error("Context object is immutable.\n\nUse Success() keyword arguments to expand its scope.")]
    Assignment,
    #[error("Context object is immutable.\n\nVariables can not be removed from Context.")]
    Deletion,
}

fn fmt_reason(reason: &Option<String>) -> String {
    match reason {
        Some(r) => format!(" (reason: {r:?})"),
        None => String::new(),
    }
}

/// Fallo de negocio: un step devolvió `Outcome::Failure`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("step {step} failed in {}{}", .chain.join(" <- "), fmt_reason(.reason))]
pub struct FailureError {
    /// Step que devolvió el fallo.
    pub step: String,
    /// Razón opcional declarada por el protocolo de la historia.
    pub reason: Option<String>,
    /// Historias activas en el momento del fallo, la más interna primero.
    pub chain: Vec<String>,
}

/// Error producido dentro del cuerpo de un step.
///
/// No implementa `std::error::Error` para poder convertirse desde cualquier
/// error con `?`.
pub struct StepError {
    source: Box<dyn StdError + Send + Sync + 'static>,
    type_name: &'static str,
}

impl StepError {
    /// Error ad-hoc con un mensaje.
    pub fn msg(message: impl Into<String>) -> Self {
        StepMessage(message.into()).into()
    }

    /// Nombre corto del tipo del error original.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Convierte al error de ejecución. `MutationError` conserva su tipo.
    pub(crate) fn into_story_error(self, step: &str) -> StoryError {
        let type_name = self.type_name;
        match self.source.downcast::<MutationError>() {
            Ok(mutation) => StoryError::Mutation(*mutation),
            Err(source) => StoryError::Step { step: step.to_string(),
                                              type_name,
                                              source },
        }
    }
}

impl<E> From<E> for StepError where E: StdError + Send + Sync + 'static
{
    fn from(err: E) -> Self {
        Self { source: Box::new(err),
               type_name: short_type_name::<E>() }
    }
}

impl fmt::Debug for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepError")
         .field("type_name", &self.type_name)
         .field("source", &self.source)
         .finish()
    }
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.type_name, self.source)
    }
}

/// Error de mensaje libre usado por `StepError::msg`.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct StepMessage(pub String);

/// Error de ejecución de una historia.
#[derive(Debug, Error)]
pub enum StoryError {
    #[error(transparent)]
    Failure(#[from] FailureError),
    #[error(transparent)]
    ContextContract(#[from] ContextContractError),
    #[error(transparent)]
    FailureProtocol(#[from] FailureProtocolError),
    #[error(transparent)]
    Mutation(#[from] MutationError),
    #[error("step {step} raised {type_name}: {source}")]
    Step {
        step: String,
        type_name: &'static str,
        #[source]
        source: Box<dyn StdError + Send + Sync + 'static>,
    },
}

impl StoryError {
    /// Etiqueta estable del tipo de error, usada en los registros de
    /// ejecución (`errored: <kind>`).
    pub fn kind_name(&self) -> &'static str {
        match self {
            StoryError::Failure(_) => FAILURE_ERROR,
            StoryError::ContextContract(_) => CONTEXT_CONTRACT_ERROR,
            StoryError::FailureProtocol(_) => FAILURE_PROTOCOL_ERROR,
            StoryError::Mutation(_) => MUTATION_ERROR,
            StoryError::Step { type_name, .. } => *type_name,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, StoryError::Failure(_))
    }

    /// Recupera el error original de un step, si es de tipo `E`.
    pub fn step_source<E: StdError + 'static>(&self) -> Option<&E> {
        match self {
            StoryError::Step { source, .. } => source.downcast_ref::<E>(),
            _ => None,
        }
    }
}
