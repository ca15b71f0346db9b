use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use super::Context;
use crate::errors::MutationError;

/// Lectura de una variable que no pudo completarse.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VariableError {
    #[error("context has no variable '{0}'")]
    Missing(String),
    #[error("context variable '{name}' could not be decoded: {message}")]
    Decode { name: String, message: String },
}

/// Vista de sólo lectura entregada a cada step.
///
/// Los intentos de asignar o borrar variables devuelven `MutationError`;
/// propagados con `?` desde un step llegan al caller sin reclasificar.
#[derive(Debug, Clone, Copy)]
pub struct ContextView<'a> {
    ctx: &'a Context,
}

impl<'a> ContextView<'a> {
    pub fn new(ctx: &'a Context) -> Self {
        Self { ctx }
    }

    pub fn get(&self, name: &str) -> Option<&'a Value> {
        self.ctx.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.ctx.contains(name)
    }

    /// Variable requerida.
    pub fn require(&self, name: &str) -> Result<&'a Value, VariableError> {
        self.ctx.get(name).ok_or_else(|| VariableError::Missing(name.to_string()))
    }

    /// Variable decodificada a un tipo concreto.
    pub fn value<T: DeserializeOwned>(&self, name: &str) -> Result<T, VariableError> {
        let raw = self.require(name)?;
        serde_json::from_value(raw.clone()).map_err(|e| VariableError::Decode { name: name.to_string(),
                                                                                 message: e.to_string() })
    }

    pub fn names(&self) -> impl Iterator<Item = &'a str> {
        self.ctx.names()
    }

    pub fn context(&self) -> &'a Context {
        self.ctx
    }

    /// Siempre falla: el contexto sólo crece vía `Outcome::Success`.
    pub fn assign(&self, _name: &str, _value: impl Into<Value>) -> Result<(), MutationError> {
        Err(MutationError::Assignment)
    }

    /// Siempre falla: las variables no pueden eliminarse.
    pub fn remove(&self, _name: &str) -> Result<(), MutationError> {
        Err(MutationError::Deletion)
    }
}
