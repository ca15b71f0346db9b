use story_core::{CompileError, StoryError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Error al compilar la historia: {0}")]
    Compile(#[from] CompileError),
    #[error("Error al ejecutar la historia: {0}")]
    Story(#[from] StoryError),
    #[error("Error en IO: {0}")]
    Io(#[from] std::io::Error),
}
