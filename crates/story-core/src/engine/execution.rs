use serde_json::Value;
use uuid::Uuid;

use crate::context::Context;
use crate::errors::{FailureError, FailureProtocolError, StoryError};
use crate::event::StoryEvent;
use crate::step::RunStatus;

/// Cómo terminó un recorrido que no se interrumpió con error.
#[derive(Debug, Clone, PartialEq)]
pub enum Termination {
    Completed,
    Returned(Value),
    Failed(FailureError),
}

/// Resultado del punto de entrada que no lanza (`run`).
#[derive(Debug, Clone, PartialEq)]
pub enum Summary {
    Success(Option<Value>),
    Failure(FailureError),
}

impl Summary {
    pub fn is_success(&self) -> bool {
        matches!(self, Summary::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Summary::Failure(_))
    }

    /// Valor devuelto. Pedirlo a un resultado fallido es un error de
    /// protocolo.
    pub fn value(&self) -> Result<Option<&Value>, FailureProtocolError> {
        match self {
            Summary::Success(value) => Ok(value.as_ref()),
            Summary::Failure(_) => Err(FailureProtocolError::ValueOfFailure),
        }
    }

    pub fn failure(&self) -> Option<&FailureError> {
        match self {
            Summary::Failure(err) => Some(err),
            Summary::Success(_) => None,
        }
    }

    pub fn failed_because(&self, reason: &str) -> bool {
        self.failure()
            .and_then(|err| err.reason.as_deref())
            .is_some_and(|r| r == reason)
    }
}

impl From<Termination> for Summary {
    fn from(termination: Termination) -> Self {
        match termination {
            Termination::Completed => Summary::Success(None),
            Termination::Returned(value) => Summary::Success(Some(value)),
            Termination::Failed(err) => Summary::Failure(err),
        }
    }
}

/// Registro completo de una ejecución: eventos en orden, contexto final con
/// procedencia y resultado.
#[derive(Debug)]
pub struct Execution {
    pub run_id: Uuid,
    pub story: String,
    pub events: Vec<StoryEvent>,
    pub context: Context,
    pub result: Result<Termination, StoryError>,
}

impl Execution {
    pub fn status(&self) -> RunStatus {
        match &self.result {
            Ok(Termination::Completed) => RunStatus::Completed,
            Ok(Termination::Returned(_)) => RunStatus::Returned,
            Ok(Termination::Failed(_)) => RunStatus::Failed,
            Err(_) => RunStatus::Errored,
        }
    }

    /// Secuencia compacta de códigos de evento.
    pub fn variants(&self) -> Vec<&'static str> {
        self.events.iter().map(|e| e.kind.code()).collect()
    }

    /// Semántica del punto de entrada que no lanza.
    pub fn into_summary(self) -> Result<Summary, StoryError> {
        self.result.map(Summary::from)
    }

    /// Semántica del punto de entrada que lanza: el fallo de negocio se
    /// convierte en `StoryError::Failure`.
    pub fn into_value(self) -> Result<Option<Value>, StoryError> {
        match self.result? {
            Termination::Completed => Ok(None),
            Termination::Returned(value) => Ok(Some(value)),
            Termination::Failed(err) => Err(StoryError::Failure(err)),
        }
    }
}
