//! Contexto inmutable de una ejecución.
//!
//! Un `Context` es un mapa ordenado por inserción `nombre -> valor` con una
//! tabla lateral de procedencia (`Provenance`) indexada por posición. La única
//! forma de agregar variables es `extend`, que devuelve un contexto nuevo y
//! rechaza cualquier clave ya presente (write-once).
//!
//! Los steps sólo ven el contexto a través de `ContextView`.

mod arguments;
mod provenance;
mod view;

pub use arguments::Arguments;
pub use provenance::{Provenance, StepIdentity};
pub use view::{ContextView, VariableError};

use std::fmt;

use indexmap::IndexMap;
use serde_json::Value;

use crate::errors::FailureProtocolError;
use crate::step::Outputs;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    values: IndexMap<String, Value>,
    provenance: Vec<Provenance>,
}

impl Context {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Contexto inicial a partir de argumentos ya validados (en orden
    /// declarado).
    pub(crate) fn from_arguments(arguments: Vec<(String, Value)>) -> Self {
        let mut values = IndexMap::with_capacity(arguments.len());
        for (name, value) in arguments {
            values.insert(name, value);
        }
        let provenance = vec![Provenance::Argument; values.len()];
        Self { values, provenance }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Nombres en orden de inserción.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn provenance(&self, name: &str) -> Option<&Provenance> {
        self.values.get_index_of(name).and_then(|i| self.provenance.get(i))
    }

    /// Variables con su procedencia, en orden de inserción.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value, &Provenance)> {
        self.values
            .iter()
            .zip(self.provenance.iter())
            .map(|((name, value), provenance)| (name.as_str(), value, provenance))
    }

    /// Nombres de `required` ausentes del contexto, en el orden dado.
    pub fn missing<'a>(&self, required: &'a [String]) -> Vec<&'a str> {
        required.iter()
                .filter(|name| !self.contains(name))
                .map(String::as_str)
                .collect()
    }

    /// Devuelve un contexto nuevo con `outputs` agregadas, todas con
    /// procedencia `by`. Falla si alguna clave ya existe.
    pub fn extend(&self, outputs: Outputs, by: &StepIdentity) -> Result<Context, FailureProtocolError> {
        let collisions: Vec<String> = outputs.keys().filter(|k| self.contains(k)).cloned().collect();
        if !collisions.is_empty() {
            return Err(FailureProtocolError::VariableOverride { step: by.to_string(),
                                                                names: collisions });
        }
        let mut next = self.clone();
        for (name, value) in outputs {
            next.values.insert(name, value);
            next.provenance.push(Provenance::SetBy(by.clone()));
        }
        Ok(next)
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items: Vec<String> = self.values.iter().map(|(k, v)| format!("{k}={v}")).collect();
        write!(f, "Context({})", items.join(", "))
    }
}
