use std::fmt;
use std::sync::Arc;

use log::{debug, warn};
use serde_json::Value;
use uuid::Uuid;

use super::core::{check_contract, Interpreter, Recorder};
use super::{Execution, Summary};
use crate::context::{Arguments, Context};
use crate::errors::{CompileError, StoryError};
use crate::event::{EventStore, StoryEventKind};
use crate::host::{Host, Registry};
use crate::trace::{Collector, Trace};

/// Historia compilada y ligada a una instancia de host.
///
/// La traza se compila una sola vez en `bind`; los clones comparten la misma
/// `Arc<Trace>`. Cada invocación crea su propio contexto, por lo que un
/// `BoundStory` puede usarse desde varios hilos a la vez.
#[derive(Clone)]
pub struct BoundStory {
    trace: Arc<Trace>,
    event_store: Option<Arc<dyn EventStore>>,
}

impl BoundStory {
    pub fn bind<H: Host>(host: Arc<H>, name: &str) -> Result<Self, CompileError> {
        let registry = Registry::<H>::collect();
        if let Some(duplicate) = registry.duplicates().first() {
            return Err(CompileError::DuplicateCapability { host: H::host_name(),
                                                           name: duplicate.clone() });
        }
        let trace = Collector::new(host, &registry).compile(name)?;
        Ok(Self { trace: Arc::new(trace),
                  event_store: None })
    }

    /// Adjunta un sumidero que recibe los eventos de cada ejecución.
    pub fn with_event_store(mut self, store: Arc<dyn EventStore>) -> Self {
        self.event_store = Some(store);
        self
    }

    pub fn name(&self) -> &str {
        self.trace.root().name()
    }

    /// `Host.story`
    pub fn label(&self) -> String {
        self.trace.root().label()
    }

    pub fn arguments(&self) -> &[String] {
        self.trace.root().declaration.argument_names()
    }

    pub fn trace(&self) -> &Arc<Trace> {
        &self.trace
    }

    /// Ejecuta la historia y devuelve el registro completo.
    pub fn execute(&self, arguments: Arguments) -> Execution {
        let run_id = Uuid::new_v4();
        let story = self.label();
        debug!("execute:start story={} run_id={}", story, run_id);

        let mut recorder = Recorder::new(run_id);
        recorder.emit(StoryEventKind::StoryStarted { story: story.clone(),
                                                     trace_fingerprint: self.trace.fingerprint().to_string() });

        let (context, result) = match self.initial_context(arguments) {
            Ok(initial) => Interpreter::new(&self.trace, &mut recorder).walk(initial),
            Err(err) => {
                warn!("execute:arguments story={} error={}", story, err);
                recorder.emit(StoryEventKind::Errored { kind: err.kind_name().to_string(),
                                                        message: err.to_string(),
                                                        depth: 0 });
                (Context::empty(), Err(err))
            }
        };

        let mut execution = Execution { run_id,
                                        story,
                                        events: Vec::new(),
                                        context,
                                        result };
        let status = execution.status();
        recorder.emit(StoryEventKind::StoryFinished { status });
        execution.events = recorder.into_events();

        if let Some(store) = &self.event_store {
            for event in &execution.events {
                store.append(event.clone());
            }
        }
        debug!("execute:finish story={} run_id={} status={:?} events={}",
               execution.story,
               run_id,
               status,
               execution.events.len());
        execution
    }

    /// Punto de entrada que lanza: un `Failure` llega como
    /// `StoryError::Failure`.
    pub fn call(&self, arguments: Arguments) -> Result<Option<Value>, StoryError> {
        self.execute(arguments).into_value()
    }

    /// Punto de entrada que no lanza: un `Failure` llega como
    /// `Summary::Failure`.
    pub fn run(&self, arguments: Arguments) -> Result<Summary, StoryError> {
        self.execute(arguments).into_summary()
    }

    fn initial_context(&self, arguments: Arguments) -> Result<Context, StoryError> {
        let root = self.trace.root();
        let bound = arguments.bind(&root.label(), root.declaration.argument_names())?;
        let variables: Vec<(&str, &Value)> = bound.iter().map(|(k, v)| (k.as_str(), v)).collect();
        check_contract(&root.declaration, &root.label(), &variables)?;
        Ok(Context::from_arguments(bound))
    }
}

impl fmt::Debug for BoundStory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundStory")
         .field("story", &self.label())
         .field("instructions", &self.trace.len())
         .field("event_store", &self.event_store.is_some())
         .finish()
    }
}
