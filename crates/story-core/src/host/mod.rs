//! Hosts: tipos que exponen steps e historias por nombre.
//!
//! Cada host implementa `Host::register`, donde declara de forma explícita su
//! conjunto de capacidades. El `Collector` resuelve los nombres del cuerpo de
//! una historia contra ese registro en tiempo de compilación.

mod declaration;
mod registry;

pub use declaration::StoryDeclaration;
pub use registry::{Capability, Injector, Registry};

use crate::errors::short_type_name;

pub trait Host: Send + Sync + Sized + 'static {
    /// Nombre usado en etiquetas (`Host.story`) y procedencia.
    fn host_name() -> &'static str {
        short_type_name::<Self>()
    }

    fn register(registry: &mut Registry<Self>);
}
