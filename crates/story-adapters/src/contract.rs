//! `SchemaContract`: contrato de variables declarado campo por campo.
//!
//! Cada campo se valida deserializando el valor al tipo declarado (o con una
//! función propia). Variables que el esquema no conoce se rechazan.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use story_core::{Contract, ContractViolation};

type FieldCheck = Arc<dyn Fn(&Value) -> Result<(), String> + Send + Sync>;

#[derive(Clone, Default)]
pub struct SchemaContract {
    fields: IndexMap<String, FieldCheck>,
}

impl SchemaContract {
    pub fn new() -> Self {
        Self::default()
    }

    /// Campo cuyo valor debe deserializar como `T`.
    pub fn field<T: DeserializeOwned + 'static>(self, name: impl Into<String>) -> Self {
        self.field_with(name, |value| {
                serde_json::from_value::<T>(value.clone()).map(|_| ())
                                                          .map_err(|e| e.to_string())
            })
    }

    /// Campo con validación propia.
    pub fn field_with<F>(mut self, name: impl Into<String>, check: F) -> Self
        where F: Fn(&Value) -> Result<(), String> + Send + Sync + 'static
    {
        self.fields.insert(name.into(), Arc::new(check));
        self
    }

}

impl Contract for SchemaContract {
    fn declares(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    fn check(&self, variables: &[(&str, &Value)]) -> Result<(), Vec<ContractViolation>> {
        let mut violations = Vec::new();
        for (name, value) in variables {
            let outcome = match self.fields.get(*name) {
                Some(check) => check(value),
                None => Err("unknown variable".to_string()),
            };
            if let Err(message) = outcome {
                violations.push(ContractViolation { variable: name.to_string(),
                                                    message });
            }
        }
        if violations.is_empty() {
            Ok(())
        } else {
            log::warn!("contract:rejected variables={:?}",
                       violations.iter().map(|v| v.variable.as_str()).collect::<Vec<_>>());
            Err(violations)
        }
    }
}

impl fmt::Debug for SchemaContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaContract")
         .field("fields", &self.fields.keys().collect::<Vec<_>>())
         .finish()
    }
}
