use std::sync::Mutex;

use indexmap::IndexMap;
use uuid::Uuid;

use super::StoryEvent;

/// Almacenamiento de eventos append-only.
///
/// Recibe `&self`: una misma historia compilada puede ejecutarse desde varios
/// hilos a la vez.
pub trait EventStore: Send + Sync {
    fn append(&self, event: StoryEvent);
    /// Eventos de una ejecución (orden ascendente por seq).
    fn list(&self, run_id: Uuid) -> Vec<StoryEvent>;
    /// Ejecuciones registradas, en orden de llegada.
    fn runs(&self) -> Vec<Uuid>;
}

#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    inner: Mutex<IndexMap<Uuid, Vec<StoryEvent>>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventStore for InMemoryEventStore {
    fn append(&self, event: StoryEvent) {
        let mut inner = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        inner.entry(event.run_id).or_default().push(event);
    }

    fn list(&self, run_id: Uuid) -> Vec<StoryEvent> {
        let inner = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        inner.get(&run_id).cloned().unwrap_or_default()
    }

    fn runs(&self) -> Vec<Uuid> {
        let inner = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        inner.keys().copied().collect()
    }
}
