use std::sync::Arc;

use log::{debug, trace};

use super::{Action, Instruction, Origin, Owner, StepCall, Trace};
use crate::context::ContextView;
use crate::errors::CompileError;
use crate::host::{Capability, Host, Registry};

/// Expande el cuerpo declarativo de una historia en una `Trace` lineal.
pub(crate) struct Collector<'r, H: Host> {
    host: Arc<H>,
    registry: &'r Registry<H>,
    active: Vec<String>,
    instructions: Vec<Instruction>,
}

impl<'r, H: Host> Collector<'r, H> {
    pub(crate) fn new(host: Arc<H>, registry: &'r Registry<H>) -> Self {
        Self { host,
               registry,
               active: Vec::new(),
               instructions: Vec::new() }
    }

    fn owner(&self) -> Owner {
        let instance: Arc<dyn std::any::Any + Send + Sync> = self.host.clone();
        Owner { name: H::host_name(),
                instance }
    }

    /// Compila la historia `name` del host.
    pub(crate) fn compile(mut self, name: &str) -> Result<Trace, CompileError> {
        let declaration = self.registry
                              .declaration(name)
                              .cloned()
                              .ok_or_else(|| CompileError::UnknownStory { host: H::host_name(),
                                                                          name: name.to_string() })?;
        let root = Arc::new(Origin::new(H::host_name(), declaration));
        debug!("collect:start story={}", root.label());
        self.active.push(root.name().to_string());
        self.collect(&root)?;
        self.active.pop();
        let trace = Trace::new(root, self.instructions);
        debug!("collect:finish story={} instructions={} fingerprint={}",
               trace.root().label(),
               trace.len(),
               trace.fingerprint());
        Ok(trace)
    }

    fn collect(&mut self, origin: &Arc<Origin>) -> Result<(), CompileError> {
        let registry = self.registry;
        for name in origin.declaration.steps() {
            match registry.resolve(name) {
                Some(Capability::Step(f)) => {
                    trace!("collect:step {}.{}", H::host_name(), name);
                    let host = Arc::clone(&self.host);
                    let call: StepCall = Arc::new(move |ctx: &ContextView<'_>| f(&host, ctx));
                    let owner = self.owner();
                    self.instructions.push(Instruction { owner,
                                                         action: Action::Step { name: name.clone(), call },
                                                         origin: Arc::clone(origin) });
                }
                Some(Capability::Story(declaration)) => {
                    if self.active.iter().any(|active| active == declaration.name()) {
                        let mut path: Vec<String> =
                            self.active.iter().map(|s| format!("{}.{}", H::host_name(), s)).collect();
                        path.push(format!("{}.{}", H::host_name(), declaration.name()));
                        return Err(CompileError::RecursiveStory { story: origin.label(),
                                                                  path });
                    }
                    let sub = Arc::new(Origin::new(H::host_name(), Arc::clone(declaration)));
                    trace!("collect:substory {} in {}", sub.label(), origin.label());
                    self.push_marker(origin,
                                     Action::Enter { story: Arc::clone(&sub),
                                                     alias: name.clone(),
                                                     injected: false });
                    self.active.push(sub.name().to_string());
                    self.collect(&sub)?;
                    self.active.pop();
                    self.push_marker(origin, Action::Exit { story: sub });
                }
                Some(Capability::Injected(inject)) => {
                    let bound = inject(self.host.as_ref());
                    let sub = Arc::clone(bound.trace().root());
                    trace!("collect:injected {} as {} in {}", sub.label(), name, origin.label());
                    self.push_marker(origin,
                                     Action::Enter { story: Arc::clone(&sub),
                                                     alias: name.clone(),
                                                     injected: true });
                    self.instructions.extend(bound.trace().instructions().iter().cloned());
                    self.push_marker(origin, Action::Exit { story: sub });
                }
                None => {
                    return Err(CompileError::UnknownCapability { host: H::host_name(),
                                                                 story: origin.label(),
                                                                 name: name.clone() })
                }
            }
        }
        Ok(())
    }

    fn push_marker(&mut self, origin: &Arc<Origin>, action: Action) {
        let owner = self.owner();
        self.instructions.push(Instruction { owner,
                                             action,
                                             origin: Arc::clone(origin) });
    }
}
