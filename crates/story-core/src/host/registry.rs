use std::sync::Arc;

use indexmap::IndexMap;

use super::{Host, StoryDeclaration};
use crate::engine::BoundStory;
use crate::step::StepFn;

/// Obtiene una historia compilada inyectada en la instancia del host.
pub type Injector<H> = fn(&H) -> BoundStory;

/// Capacidad resuelta por nombre.
pub enum Capability<'r, H> {
    Step(StepFn<H>),
    Story(&'r Arc<StoryDeclaration>),
    Injected(Injector<H>),
}

/// Conjunto de capacidades de un host.
///
/// Steps, historias de clase e historias inyectadas comparten un único
/// espacio de nombres; registrar un nombre dos veces queda en `duplicates`.
pub struct Registry<H> {
    steps: IndexMap<String, StepFn<H>>,
    stories: IndexMap<String, Arc<StoryDeclaration>>,
    injected: IndexMap<String, Injector<H>>,
    duplicates: Vec<String>,
}

impl<H: Host> Registry<H> {
    /// Registro poblado por `H::register`.
    pub fn collect() -> Self {
        let mut registry = Self { steps: IndexMap::new(),
                                  stories: IndexMap::new(),
                                  injected: IndexMap::new(),
                                  duplicates: Vec::new() };
        H::register(&mut registry);
        registry
    }

    pub fn step(&mut self, name: impl Into<String>, f: StepFn<H>) -> &mut Self {
        let name = name.into();
        if self.is_taken(&name) {
            self.duplicates.push(name.clone());
        }
        self.steps.insert(name, f);
        self
    }

    pub fn story(&mut self, declaration: StoryDeclaration) -> &mut Self {
        let name = declaration.name().to_string();
        if self.is_taken(&name) {
            self.duplicates.push(name.clone());
        }
        self.stories.insert(name, Arc::new(declaration));
        self
    }

    pub fn inject(&mut self, name: impl Into<String>, f: Injector<H>) -> &mut Self {
        let name = name.into();
        if self.is_taken(&name) {
            self.duplicates.push(name.clone());
        }
        self.injected.insert(name, f);
        self
    }

    fn is_taken(&self, name: &str) -> bool {
        self.steps.contains_key(name) || self.stories.contains_key(name) || self.injected.contains_key(name)
    }

    /// Resolución: step, luego historia de clase, luego historia inyectada.
    pub fn resolve(&self, name: &str) -> Option<Capability<'_, H>> {
        if let Some(f) = self.steps.get(name) {
            return Some(Capability::Step(*f));
        }
        if let Some(declaration) = self.stories.get(name) {
            return Some(Capability::Story(declaration));
        }
        self.injected.get(name).map(|f| Capability::Injected(*f))
    }

    pub fn declaration(&self, name: &str) -> Option<&Arc<StoryDeclaration>> {
        self.stories.get(name)
    }

    pub fn duplicates(&self) -> &[String] {
        &self.duplicates
    }
}
