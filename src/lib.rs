//! Storyline
//!
//! Este crate actúa como fachada del motor de historias:
//! - Re-exporta `story_core` (compilador + intérprete) y `story_adapters`
//!   (presentación, contratos, configuración).
//! - Expone `errors` con el error de aplicación.
//! - Expone `demo` con historias de ejemplo usadas por el binario
//!   `storyline-demo`.

pub mod demo;
pub mod errors;

pub use errors::AppError;
pub use story_adapters::{present, Presenter, PresenterConfig, SchemaContract};
pub use story_core::{kwargs, outputs, Arguments, BoundStory, ContextView, Execution, Host, Outcome, Registry,
                     StepResult, StoryDeclaration, StoryError, Summary};
