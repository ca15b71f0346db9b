//! Validación externa de variables (contrato de contexto).
//!
//! El motor no valida reglas de negocio: delega en un `Contract` opcional
//! declarado por cada historia. Se consulta con los argumentos de la llamada,
//! con cada conjunto de salidas de `Success` y con las variables visibles al
//! entrar a una sub-historia.
//!
//! Las salidas de un step pasan por los contratos de todas las historias
//! activas: cada contrato valida las variables que declara, y una variable
//! que ningún contrato declara se rechaza.

use std::fmt;

use serde_json::Value;

use crate::errors::ContractViolation;

pub trait Contract: Send + Sync + fmt::Debug {
    /// Valida las variables dadas. Devuelve todas las violaciones encontradas.
    fn check(&self, variables: &[(&str, &Value)]) -> Result<(), Vec<ContractViolation>>;

    /// Si el contrato conoce la variable. Por defecto las conoce todas.
    fn declares(&self, _name: &str) -> bool {
        true
    }
}
