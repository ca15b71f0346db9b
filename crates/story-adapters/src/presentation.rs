//! Presentación textual de una ejecución.
//!
//! Formato:
//!
//! ```text
//! SubstoryDI.y
//!   start
//!   before
//!   x (Simple.x)
//!     one
//!     two (failed)
//!
//! Context:
//!   spam: 3  # Story argument
//!   foo: 2   # Set by SubstoryDI.start
//!   bar: 4   # Set by SubstoryDI.before
//! ```
//!
//! Las instrucciones omitidas por una región de `Skip` no se listan. Las
//! anotaciones (`failed`, `skipped`, `returned`, `errored`) se agregan a la
//! última línea emitida; un error de argumentos anota la cabecera.

use serde_json::Value;
use story_core::{Context, Execution, StoryEventKind};

use crate::config::PresenterConfig;

#[derive(Debug, Clone, Copy, Default)]
pub struct Presenter {
    config: PresenterConfig,
}

impl Presenter {
    pub fn new(config: PresenterConfig) -> Self {
        Self { config }
    }

    pub fn from_env() -> Self {
        Self::new(PresenterConfig::from_env())
    }

    pub fn render(&self, execution: &Execution) -> String {
        let mut lines = vec![execution.story.clone()];
        for event in &execution.events {
            match &event.kind {
                StoryEventKind::SubstoryEntered { name, story, injected, depth } => {
                    let mut line = format!("{}{}", self.pad(*depth), name);
                    if *injected {
                        line.push_str(&format!(" ({story})"));
                    }
                    lines.push(line);
                }
                StoryEventKind::StepStarted { step, depth, .. } => {
                    lines.push(format!("{}{}", self.pad(*depth), step));
                }
                StoryEventKind::StepFailed { reason, .. } => {
                    let note = match reason {
                        Some(reason) => format!(" (failed: {reason:?})"),
                        None => " (failed)".to_string(),
                    };
                    annotate(&mut lines, &note);
                }
                StoryEventKind::StepSkipped { .. } => annotate(&mut lines, " (skipped)"),
                StoryEventKind::StepReturned { value, .. } => annotate(&mut lines, &format!(" (returned: {value})")),
                StoryEventKind::Errored { kind, .. } => annotate(&mut lines, &format!(" (errored: {kind})")),
                _ => {}
            }
        }
        log::debug!("present:render story={} lines={}", execution.story, lines.len());

        let mut out = lines.join("\n");
        out.push_str("\n\n");
        out.push_str(&self.render_context(&execution.context));
        out
    }

    /// Bloque de contexto con la procedencia de cada variable.
    pub fn render_context(&self, context: &Context) -> String {
        if context.is_empty() {
            return "Context()".to_string();
        }
        let pad = self.pad(1);
        let rows: Vec<(String, Option<String>, String)> =
            context.iter()
                   .map(|(name, value, provenance)| {
                       let repr = repr(value);
                       let inline = format!("{name}: {repr}");
                       if repr.contains('\n') || pad.len() + inline.len() > self.config.max_line_width {
                           (format!("{name}:"), Some(repr), provenance.to_string())
                       } else {
                           (inline, None, provenance.to_string())
                       }
                   })
                   .collect();
        let width = rows.iter().map(|(head, _, _)| head.len()).max().unwrap_or(0);

        let mut out = vec!["Context:".to_string()];
        for (head, long, provenance) in rows {
            out.push(format!("{pad}{head:<width$}  # {provenance}"));
            if let Some(long) = long {
                let deep = self.pad(2);
                for line in long.lines() {
                    out.push(format!("{deep}{line}"));
                }
            }
        }
        out.join("\n")
    }

    fn pad(&self, depth: usize) -> String {
        " ".repeat(depth * self.config.indent)
    }
}

/// Presenta con la configuración por defecto.
pub fn present(execution: &Execution) -> String {
    Presenter::default().render(execution)
}

fn annotate(lines: &mut [String], note: &str) {
    if let Some(last) = lines.last_mut() {
        last.push_str(note);
    }
}

fn repr(value: &Value) -> String {
    value.to_string()
}
