//! IBus engine adapter for the m17n input method library.
//!
//! The conversion backend and the IBus host are both reached through traits
//! (`m17n_core::backend::Backend`, `m17n_session::EngineHost`); this crate
//! ties them together per engine class and owns the preferences model.

pub mod api;
mod trace_init;

pub use api::{EngineClass, EngineError, EngineRegistry, SetupForm, VariableField};
pub use m17n_core::{EngineId, KeySymbol, Modifiers};
pub use m17n_session::{EngineAdapter, EngineHost, EngineInfo};
