//! Constantes del motor core.
//!
//! `ENGINE_VERSION` forma parte del input del fingerprint de cada `Trace`:
//! un cambio de versión del motor produce fingerprints distintos aunque la
//! declaración de la historia no cambie.

/// Versión lógica del motor. Mantener estable mientras no cambie la forma
/// en que se compila una historia.
pub const ENGINE_VERSION: &str = "S1.0";

/// Etiqueta usada en los diagnósticos para el error de contexto.
pub const CONTEXT_CONTRACT_ERROR: &str = "ContextContractError";
/// Etiqueta usada en los diagnósticos para violaciones del protocolo.
pub const FAILURE_PROTOCOL_ERROR: &str = "FailureProtocolError";
/// Etiqueta usada en los diagnósticos para intentos de mutación.
pub const MUTATION_ERROR: &str = "MutationError";
/// Etiqueta del fallo de negocio.
pub const FAILURE_ERROR: &str = "FailureError";
