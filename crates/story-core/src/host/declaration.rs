use std::fmt;
use std::sync::Arc;

use crate::contract::Contract;
use crate::errors::FailureProtocolError;

/// Declaración de una historia: parámetros, cuerpo y protocolo opcional.
#[derive(Clone)]
pub struct StoryDeclaration {
    name: String,
    arguments: Vec<String>,
    body: Vec<String>,
    failures: Option<Vec<String>>,
    contract: Option<Arc<dyn Contract>>,
}

impl StoryDeclaration {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(),
               arguments: Vec::new(),
               body: Vec::new(),
               failures: None,
               contract: None }
    }

    /// Parámetros declarados, en orden posicional.
    pub fn arguments<I, S>(mut self, names: I) -> Self
        where I: IntoIterator<Item = S>,
              S: Into<String>
    {
        self.arguments = names.into_iter().map(Into::into).collect();
        self
    }

    /// Nombres de steps o sub-historias, en orden de ejecución.
    pub fn body<I, S>(mut self, names: I) -> Self
        where I: IntoIterator<Item = S>,
              S: Into<String>
    {
        self.body = names.into_iter().map(Into::into).collect();
        self
    }

    /// Conjunto cerrado de razones de fallo admitidas.
    pub fn failures<I, S>(mut self, reasons: I) -> Self
        where I: IntoIterator<Item = S>,
              S: Into<String>
    {
        self.failures = Some(reasons.into_iter().map(Into::into).collect());
        self
    }

    pub fn contract(mut self, contract: Arc<dyn Contract>) -> Self {
        self.contract = Some(contract);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn argument_names(&self) -> &[String] {
        &self.arguments
    }

    pub fn steps(&self) -> &[String] {
        &self.body
    }

    pub fn contract_ref(&self) -> Option<&dyn Contract> {
        self.contract.as_deref()
    }

    /// Verifica la razón de un `Failure` contra el protocolo declarado.
    /// Un fallo sin razón siempre es válido.
    pub fn check_reason(&self, step: &str, story: &str, reason: Option<&str>) -> Result<(), FailureProtocolError> {
        let Some(reason) = reason else {
            return Ok(());
        };
        match &self.failures {
            None => Err(FailureProtocolError::NoProtocol { step: step.to_string(),
                                                           story: story.to_string(),
                                                           reason: reason.to_string() }),
            Some(declared) if declared.iter().any(|r| r == reason) => Ok(()),
            Some(declared) => Err(FailureProtocolError::UndeclaredReason { step: step.to_string(),
                                                                           story: story.to_string(),
                                                                           reason: reason.to_string(),
                                                                           declared: declared.clone() }),
        }
    }
}

impl fmt::Debug for StoryDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoryDeclaration")
         .field("name", &self.name)
         .field("arguments", &self.arguments)
         .field("body", &self.body)
         .field("failures", &self.failures)
         .field("contract", &self.contract.is_some())
         .finish()
    }
}
