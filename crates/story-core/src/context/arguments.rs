use indexmap::IndexMap;
use serde_json::Value;

use crate::errors::ContextContractError;

/// Argumentos de una invocación: posicionales o por nombre, nunca ambos.
///
/// Un nombre repetido no reemplaza al anterior: queda registrado y `bind` lo
/// rechaza.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    positional: Vec<Value>,
    keyword: IndexMap<String, Value>,
    repeated: Vec<String>,
}

impl Arguments {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn positional<I, V>(values: I) -> Self
        where I: IntoIterator<Item = V>,
              V: Into<Value>
    {
        Self { positional: values.into_iter().map(Into::into).collect(),
               ..Self::default() }
    }

    pub fn keyword<I, K, V>(pairs: I) -> Self
        where I: IntoIterator<Item = (K, V)>,
              K: Into<String>,
              V: Into<Value>
    {
        pairs.into_iter().fold(Self::default(), |args, (k, v)| args.kwarg(k, v))
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        if self.keyword.contains_key(&name) {
            self.repeated.push(name);
        } else {
            self.keyword.insert(name, value.into());
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keyword.is_empty()
    }

    /// Valida contra los parámetros declarados y devuelve los pares en el
    /// orden de declaración.
    pub(crate) fn bind(self, story: &str, declared: &[String]) -> Result<Vec<(String, Value)>, ContextContractError> {
        if !self.positional.is_empty() && !self.keyword.is_empty() {
            return Err(ContextContractError::MixedArguments { story: story.to_string() });
        }
        if !self.repeated.is_empty() {
            return Err(ContextContractError::RepeatedArguments { story: story.to_string(),
                                                                 names: self.repeated });
        }

        if !self.positional.is_empty() {
            if self.positional.len() != declared.len() {
                return Err(ContextContractError::PositionalCount { story: story.to_string(),
                                                                   expected: declared.len(),
                                                                   found: self.positional.len() });
            }
            return Ok(declared.iter().cloned().zip(self.positional).collect());
        }

        let mut keyword = self.keyword;
        let missing: Vec<String> = declared.iter().filter(|n| !keyword.contains_key(*n)).cloned().collect();
        let unexpected: Vec<String> = keyword.keys().filter(|k| !declared.contains(k)).cloned().collect();
        if !missing.is_empty() || !unexpected.is_empty() {
            return Err(ContextContractError::ArgumentMismatch { story: story.to_string(),
                                                                missing,
                                                                unexpected });
        }
        Ok(declared.iter()
                   .filter_map(|name| keyword.shift_remove(name).map(|v| (name.clone(), v)))
                   .collect())
    }
}
