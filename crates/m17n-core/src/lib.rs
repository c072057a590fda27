//! Key translation, engine identity, configuration values and the backend
//! contract shared by the session layer and the engine registry.

pub mod backend;
pub mod engine_id;
pub mod keymap;
pub mod keysym;
pub mod settings;
pub mod symbol;
pub mod translate;
pub mod variables;

pub use engine_id::{EngineId, EngineNameError};
pub use keysym::Modifiers;
pub use symbol::KeySymbol;
pub use translate::{translate, KeyEvent};
