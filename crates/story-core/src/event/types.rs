//! Tipos de evento de una ejecución y estructura `StoryEvent`.
//!
//! Rol en el motor:
//! - Cada ejecución de una historia emite, en orden, los eventos que
//!   describen qué instrucciones corrieron, cuáles se omitieron y cómo
//!   terminó.
//! - Son el registro observable que consumen los presentadores externos; el
//!   motor no formatea nada.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::step::RunStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StoryEventKind {
    /// Primer evento de toda ejecución. Fija la forma de la traza usada.
    StoryStarted { story: String, trace_fingerprint: String },
    /// Se cruzó un marcador de entrada. `name` es el nombre en el cuerpo
    /// padre, `story` la etiqueta `Host.story` real.
    SubstoryEntered {
        name: String,
        story: String,
        injected: bool,
        depth: usize,
    },
    StepStarted { step: String, host: String, depth: usize },
    /// El step terminó sin cortar la ejecución (`Success` o ausencia de
    /// resultado). `outputs` lista las variables agregadas.
    StepFinished {
        step: String,
        outputs: Vec<String>,
        depth: usize,
    },
    StepFailed {
        step: String,
        reason: Option<String>,
        depth: usize,
    },
    StepSkipped { step: String, depth: usize },
    StepReturned { step: String, value: Value, depth: usize },
    /// Instrucción no ejecutada por estar dentro de una región omitida.
    InstructionBypassed { label: String, depth: usize },
    SubstoryExited { story: String, depth: usize },
    /// Error que interrumpe la ejecución. `kind` es `StoryError::kind_name`.
    Errored {
        kind: String,
        message: String,
        depth: usize,
    },
    /// Evento de cierre.
    StoryFinished { status: RunStatus },
}

impl StoryEventKind {
    /// Código compacto de una letra, útil para aserciones de secuencia.
    pub fn code(&self) -> &'static str {
        match self {
            StoryEventKind::StoryStarted { .. } => "I",
            StoryEventKind::SubstoryEntered { .. } => ">",
            StoryEventKind::StepStarted { .. } => "S",
            StoryEventKind::StepFinished { .. } => "F",
            StoryEventKind::StepFailed { .. } => "X",
            StoryEventKind::StepSkipped { .. } => "K",
            StoryEventKind::StepReturned { .. } => "R",
            StoryEventKind::InstructionBypassed { .. } => "-",
            StoryEventKind::SubstoryExited { .. } => "<",
            StoryEventKind::Errored { .. } => "E",
            StoryEventKind::StoryFinished { .. } => "C",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryEvent {
    pub seq: u64,
    pub run_id: Uuid,
    pub kind: StoryEventKind,
    pub ts: DateTime<Utc>, // metadato, no entra en ningún fingerprint
}
