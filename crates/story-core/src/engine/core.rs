//! Intérprete de trazas.
//!
//! Recorre una `Trace` una vez por invocación aplicando el protocolo de
//! resultados. Mantiene la pila de historias activas (la raíz primero) y, a
//! lo sumo, una región de omisión abierta identificada por la profundidad de
//! la historia que la abrió.

use std::sync::Arc;

use chrono::Utc;
use log::{debug, trace, warn};
use serde_json::Value;
use uuid::Uuid;

use super::Termination;
use crate::context::{Context, ContextView, StepIdentity};
use crate::contract::Contract;
use crate::errors::{ContextContractError, ContractViolation, FailureError, StoryError};
use crate::event::{StoryEvent, StoryEventKind};
use crate::host::StoryDeclaration;
use crate::step::Outcome;
use crate::trace::{Action, Instruction, Origin, StepCall, Trace};

/// Acumula los eventos de una ejecución asignando `seq`.
pub(crate) struct Recorder {
    run_id: Uuid,
    events: Vec<StoryEvent>,
}

impl Recorder {
    pub(crate) fn new(run_id: Uuid) -> Self {
        Self { run_id,
               events: Vec::new() }
    }

    pub(crate) fn emit(&mut self, kind: StoryEventKind) {
        let seq = self.events.len() as u64;
        self.events.push(StoryEvent { seq,
                                      run_id: self.run_id,
                                      kind,
                                      ts: Utc::now() });
    }

    pub(crate) fn into_events(self) -> Vec<StoryEvent> {
        self.events
    }
}

enum Flow {
    Next,
    Extend(Context),
    Stop(Termination),
}

pub(crate) struct Interpreter<'a> {
    trace: &'a Trace,
    recorder: &'a mut Recorder,
    stack: Vec<Arc<Origin>>,
    skipping: Option<usize>,
    line_depth: usize,
}

impl<'a> Interpreter<'a> {
    pub(crate) fn new(trace: &'a Trace, recorder: &'a mut Recorder) -> Self {
        Self { stack: vec![Arc::clone(trace.root())],
               trace,
               recorder,
               skipping: None,
               line_depth: 0 }
    }

    /// Recorre la traza completa. Siempre devuelve el último contexto
    /// alcanzado, también cuando la ejecución se interrumpe.
    pub(crate) fn walk(mut self, initial: Context) -> (Context, Result<Termination, StoryError>) {
        let trace = self.trace;
        let story = trace.root().label();
        debug!("walk:start story={} instructions={}", story, trace.len());
        let mut ctx = initial;
        for instruction in trace.instructions() {
            match self.visit(instruction, &ctx) {
                Ok(Flow::Next) => {}
                Ok(Flow::Extend(next)) => ctx = next,
                Ok(Flow::Stop(termination)) => {
                    debug!("walk:stop story={} termination={:?}", story, termination);
                    return (ctx, Ok(termination));
                }
                Err(err) => {
                    warn!("walk:error story={} kind={} error={}", story, err.kind_name(), err);
                    self.recorder.emit(StoryEventKind::Errored { kind: err.kind_name().to_string(),
                                                                 message: err.to_string(),
                                                                 depth: self.line_depth });
                    return (ctx, Err(err));
                }
            }
        }
        if self.skipping.is_some() {
            debug!("walk:finish story={} (skipped at root level)", story);
        } else {
            debug!("walk:finish story={}", story);
        }
        (ctx, Ok(Termination::Completed))
    }

    fn visit(&mut self, instruction: &Instruction, ctx: &Context) -> Result<Flow, StoryError> {
        if let Some(depth) = self.skipping {
            return Ok(self.bypass(instruction, depth));
        }
        match &instruction.action {
            Action::Step { name, call } => self.run_step(instruction, name, call, ctx),
            Action::Enter { story, alias, injected } => {
                self.enter(story, alias, *injected, ctx)?;
                Ok(Flow::Next)
            }
            Action::Exit { story } => {
                self.stack.pop();
                trace!("exit {}", story.label());
                self.recorder.emit(StoryEventKind::SubstoryExited { story: story.label(),
                                                                    depth: self.stack.len() });
                Ok(Flow::Next)
            }
        }
    }

    /// Avanza sin ejecutar hasta el `Exit` de la historia que abrió la región.
    fn bypass(&mut self, instruction: &Instruction, depth: usize) -> Flow {
        match &instruction.action {
            Action::Exit { story } => {
                let leaving = self.stack.len();
                self.stack.pop();
                if leaving == depth {
                    trace!("skip:closed at exit {}", story.label());
                    self.skipping = None;
                }
            }
            Action::Enter { story, .. } => {
                self.recorder.emit(StoryEventKind::InstructionBypassed { label: instruction.label(),
                                                                         depth: self.stack.len() });
                self.stack.push(Arc::clone(story));
            }
            Action::Step { .. } => {
                trace!("skip:bypass {}", instruction.label());
                self.recorder.emit(StoryEventKind::InstructionBypassed { label: instruction.label(),
                                                                         depth: self.stack.len() });
            }
        }
        Flow::Next
    }

    fn enter(&mut self, story: &Arc<Origin>, alias: &str, injected: bool, ctx: &Context) -> Result<(), StoryError> {
        let depth = self.stack.len();
        trace!("enter {} as {} depth={}", story.label(), alias, depth);
        self.line_depth = depth;
        self.recorder.emit(StoryEventKind::SubstoryEntered { name: alias.to_string(),
                                                             story: story.label(),
                                                             injected,
                                                             depth });
        self.stack.push(Arc::clone(story));

        let declared = story.declaration.argument_names();
        let missing = ctx.missing(declared);
        if !missing.is_empty() {
            return Err(ContextContractError::MissingVariables { story: story.label(),
                                                                missing: missing.into_iter().map(String::from).collect() }.into());
        }
        let visible: Vec<(&str, &Value)> =
            declared.iter().filter_map(|name| ctx.get(name).map(|v| (name.as_str(), v))).collect();
        check_contract(&story.declaration, &story.label(), &visible)
    }

    fn run_step(&mut self,
                instruction: &Instruction,
                name: &str,
                call: &StepCall,
                ctx: &Context)
                -> Result<Flow, StoryError> {
        let depth = self.stack.len();
        let origin = &instruction.origin;
        let step_label = format!("{}.{}", instruction.owner.name, name);
        trace!("step:start {} depth={}", step_label, depth);
        self.line_depth = depth;
        self.recorder.emit(StoryEventKind::StepStarted { step: name.to_string(),
                                                         host: instruction.owner.name.to_string(),
                                                         depth });

        let view = ContextView::new(ctx);
        let outcome = call(&view).map_err(|err| err.into_story_error(name))?;
        trace!("step:outcome {} code={}", step_label, outcome.as_ref().map_or("-", Outcome::code));

        match outcome {
            None => {
                self.recorder.emit(StoryEventKind::StepFinished { step: name.to_string(),
                                                                  outputs: Vec::new(),
                                                                  depth });
                Ok(Flow::Next)
            }
            Some(Outcome::Success(outputs)) => {
                let produced: Vec<(&str, &Value)> = outputs.iter().map(|(k, v)| (k.as_str(), v)).collect();
                check_outputs(&self.stack, &produced)?;
                let names: Vec<String> = outputs.keys().cloned().collect();
                let next = ctx.extend(outputs, &StepIdentity::new(instruction.owner.name, name))?;
                self.recorder.emit(StoryEventKind::StepFinished { step: name.to_string(),
                                                                  outputs: names,
                                                                  depth });
                Ok(Flow::Extend(next))
            }
            Some(Outcome::Failure(reason)) => {
                origin.declaration
                      .check_reason(&step_label, &origin.label(), reason.as_deref())?;
                self.recorder.emit(StoryEventKind::StepFailed { step: name.to_string(),
                                                                reason: reason.clone(),
                                                                depth });
                let chain = self.stack.iter().rev().map(|o| o.label()).collect();
                Ok(Flow::Stop(Termination::Failed(FailureError { step: name.to_string(),
                                                                 reason,
                                                                 chain })))
            }
            Some(Outcome::Skip) => {
                trace!("skip:open in {} depth={}", origin.label(), depth);
                self.recorder.emit(StoryEventKind::StepSkipped { step: name.to_string(),
                                                                 depth });
                self.skipping = Some(depth);
                Ok(Flow::Next)
            }
            Some(Outcome::Result(value)) => {
                self.recorder.emit(StoryEventKind::StepReturned { step: name.to_string(),
                                                                  value: value.clone(),
                                                                  depth });
                Ok(Flow::Stop(Termination::Returned(value)))
            }
        }
    }
}

/// Valida salidas contra los contratos de la pila, de la historia más interna
/// a la raíz. Cada contrato ve sólo las variables que declara; las que
/// ninguno declara se reportan contra el contrato más interno.
pub(crate) fn check_outputs(stack: &[Arc<Origin>], outputs: &[(&str, &Value)]) -> Result<(), StoryError> {
    let contracted: Vec<(&Arc<Origin>, &dyn Contract)> =
        stack.iter()
             .rev()
             .filter_map(|origin| origin.declaration.contract_ref().map(|contract| (origin, contract)))
             .collect();
    let Some((innermost, _)) = contracted.first() else {
        return Ok(());
    };

    for (origin, contract) in &contracted {
        let known: Vec<(&str, &Value)> = outputs.iter().filter(|(name, _)| contract.declares(name)).copied().collect();
        if known.is_empty() {
            continue;
        }
        contract.check(&known).map_err(|violations| {
                                   warn!("contract:rejected story={} stage=outputs", origin.label());
                                   StoryError::from(ContextContractError::InvalidVariables { story: origin.label(),
                                                                                            violations })
                               })?;
    }

    let unknown: Vec<ContractViolation> =
        outputs.iter()
               .filter(|(name, _)| !contracted.iter().any(|(_, contract)| contract.declares(name)))
               .map(|(name, _)| ContractViolation { variable: name.to_string(),
                                                    message: "unknown variable".to_string() })
               .collect();
    if unknown.is_empty() {
        Ok(())
    } else {
        Err(ContextContractError::InvalidVariables { story: innermost.label(),
                                                     violations: unknown }.into())
    }
}

/// Consulta el contrato de la declaración, si lo tiene.
pub(crate) fn check_contract(declaration: &StoryDeclaration,
                             story: &str,
                             variables: &[(&str, &Value)])
                             -> Result<(), StoryError> {
    let Some(contract) = declaration.contract_ref() else {
        return Ok(());
    };
    contract.check(variables).map_err(|violations| {
                                  ContextContractError::InvalidVariables { story: story.to_string(),
                                                                           violations }.into()
                              })
}
