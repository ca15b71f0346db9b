use std::fmt;

use serde::{Deserialize, Serialize};

/// Identidad del step que produjo una variable: tipo host dueño + nombre.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StepIdentity {
    pub host: String,
    pub step: String,
}

impl StepIdentity {
    pub fn new(host: impl Into<String>, step: impl Into<String>) -> Self {
        Self { host: host.into(),
               step: step.into() }
    }
}

impl fmt::Display for StepIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.host, self.step)
    }
}

/// Origen de una variable del contexto.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provenance {
    /// Suministrada como argumento de la llamada.
    Argument,
    /// Agregada por el `Success` de un step.
    SetBy(StepIdentity),
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::Argument => f.write_str("Story argument"),
            Provenance::SetBy(identity) => write!(f, "Set by {identity}"),
        }
    }
}
