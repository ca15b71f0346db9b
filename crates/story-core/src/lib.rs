//! story-core: compilador + intérprete de historias declarativas.
//!
//! Una historia es una lista ordenada de nombres de steps (o sub-historias)
//! declarada por un `Host`. `BoundStory::bind` la compila a una `Trace` lineal
//! y cada invocación la recorre contra un `Context` inmutable nuevo.
pub mod constants;
pub mod context;
pub mod contract;
pub mod engine;
pub mod errors;
pub mod event;
pub mod hashing;
pub mod host;
pub mod step;
pub mod trace;

pub use context::{Arguments, Context, ContextView, Provenance, StepIdentity, VariableError};
pub use contract::Contract;
pub use engine::{BoundStory, Execution, Summary, Termination};
pub use errors::{CompileError, ContextContractError, ContractViolation, FailureError, FailureProtocolError,
                 MutationError, StepError, StoryError};
pub use event::{EventStore, InMemoryEventStore, StoryEvent, StoryEventKind};
pub use host::{Host, Registry, StoryDeclaration};
pub use step::{Outcome, Outputs, RunStatus, StepResult};
pub use trace::Trace;
