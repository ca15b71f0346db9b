//! Macros para construir salidas y argumentos sin boilerplate.
//!
//!   use story_core::{kwargs, outputs};
//!   Ok(Outcome::Success(outputs! { "baz" => 4 }).into())

#[doc(hidden)]
pub use serde_json as __serde_json;

/// Construye un `Outputs` (`IndexMap<String, Value>`) preservando el orden.
#[macro_export]
macro_rules! outputs {
    () => { $crate::step::Outputs::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::step::Outputs::new();
        $( map.insert(::std::string::String::from($key), $crate::step::macros::__serde_json::json!($value)); )+
        map
    }};
}

/// Construye `Arguments` por nombre.
#[macro_export]
macro_rules! kwargs {
    () => { $crate::context::Arguments::none() };
    ($($key:expr => $value:expr),+ $(,)?) => {
        $crate::context::Arguments::none()
            $( .kwarg($key, $crate::step::macros::__serde_json::json!($value)) )+
    };
}
