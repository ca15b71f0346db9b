//! Traza de instrucciones compilada.
//!
//! Una `Trace` es la secuencia lineal que produce el `Collector` a partir del
//! cuerpo declarativo de una historia. Las sub-historias quedan en línea,
//! delimitadas por marcadores `Enter`/`Exit` (balanceados como una pila). La
//! traza es inmutable una vez compilada y se comparte entre ejecuciones.

mod collector;

pub(crate) use collector::Collector;

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde_json::json;

use crate::constants::ENGINE_VERSION;
use crate::context::ContextView;
use crate::hashing::hash_value;
use crate::host::StoryDeclaration;
use crate::step::StepResult;

/// Cuerpo de un step ya ligado a su instancia dueña.
pub type StepCall = Arc<dyn Fn(&ContextView<'_>) -> StepResult + Send + Sync>;

/// Instancia sobre la que se ejecuta una instrucción.
#[derive(Clone)]
pub struct Owner {
    pub name: &'static str,
    pub instance: Arc<dyn Any + Send + Sync>,
}

impl Owner {
    pub fn downcast<H: Any + Send + Sync>(&self) -> Option<Arc<H>> {
        Arc::clone(&self.instance).downcast::<H>().ok()
    }
}

impl fmt::Debug for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Declaración de historia a la que pertenece una instrucción.
#[derive(Debug)]
pub struct Origin {
    pub host: &'static str,
    pub declaration: Arc<StoryDeclaration>,
}

impl Origin {
    pub fn new(host: &'static str, declaration: Arc<StoryDeclaration>) -> Self {
        Self { host, declaration }
    }

    pub fn name(&self) -> &str {
        self.declaration.name()
    }

    /// `Host.story`
    pub fn label(&self) -> String {
        format!("{}.{}", self.host, self.declaration.name())
    }
}

#[derive(Clone)]
pub enum Action {
    Step { name: String, call: StepCall },
    /// Entrada a una sub-historia. `alias` es el nombre usado en el cuerpo
    /// padre; `injected` indica que fue provista por la instancia.
    Enter {
        story: Arc<Origin>,
        alias: String,
        injected: bool,
    },
    Exit { story: Arc<Origin> },
}

#[derive(Clone)]
pub struct Instruction {
    pub owner: Owner,
    pub action: Action,
    pub origin: Arc<Origin>,
}

impl Instruction {
    /// Etiqueta estable (entra en el fingerprint).
    pub fn label(&self) -> String {
        match &self.action {
            Action::Step { name, .. } => format!("{}.{}", self.owner.name, name),
            Action::Enter { story, .. } => format!("enter:{}", story.label()),
            Action::Exit { story } => format!("exit:{}", story.label()),
        }
    }

    pub fn is_step(&self) -> bool {
        matches!(self.action, Action::Step { .. })
    }
}

impl fmt::Debug for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instruction")
         .field("owner", &self.owner)
         .field("action", &self.label())
         .field("origin", &self.origin.label())
         .finish()
    }
}

#[derive(Debug)]
pub struct Trace {
    instructions: Vec<Instruction>,
    root: Arc<Origin>,
    fingerprint: String,
}

impl Trace {
    pub(crate) fn new(root: Arc<Origin>, instructions: Vec<Instruction>) -> Self {
        let labels: Vec<String> = instructions.iter().map(Instruction::label).collect();
        let fingerprint = hash_value(&json!({
                                         "engine_version": ENGINE_VERSION,
                                         "story": root.label(),
                                         "arguments": root.declaration.argument_names(),
                                         "instructions": labels,
                                     }));
        Self { instructions,
               root,
               fingerprint }
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn root(&self) -> &Arc<Origin> {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Hash determinista de la forma de la traza (no de los datos).
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn labels(&self) -> Vec<String> {
        self.instructions.iter().map(Instruction::label).collect()
    }

    /// Cada `Enter` tiene exactamente un `Exit` de la misma declaración, en
    /// orden de pila.
    pub fn is_balanced(&self) -> bool {
        let mut open: Vec<&Arc<Origin>> = Vec::new();
        for instruction in &self.instructions {
            match &instruction.action {
                Action::Enter { story, .. } => open.push(story),
                Action::Exit { story } => match open.pop() {
                    Some(top) if Arc::ptr_eq(top, story) => {}
                    _ => return false,
                },
                Action::Step { .. } => {}
            }
        }
        open.is_empty()
    }
}
