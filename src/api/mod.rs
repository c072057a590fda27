//! Host-facing entry points: the engine registry, the setup form and a few
//! process-wide helpers.

mod registry;
mod setup;
mod types;


pub use registry::{EngineClass, EngineRegistry};
pub use setup::{SetupForm, VariableField};
pub use types::EngineError;

use std::path::Path;

use m17n_core::settings::SettingsStore;

// ---------------------------------------------------------------------------
// Top-level functions
// ---------------------------------------------------------------------------

pub fn engine_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Replace the built-in defaults with the TOML file at `path`. Must run
/// before the first registry is built.
pub fn settings_load_config(path: &Path) -> Result<(), EngineError> {
    let content = std::fs::read_to_string(path).map_err(|e| EngineError::Io {
        msg: format!("{}: {e}", path.display()),
    })?;
    m17n_core::settings::init_custom(content)?;
    Ok(())
}

pub fn settings_default_config() -> String {
    m17n_core::settings::DEFAULT_SETTINGS_TOML.to_string()
}

pub fn settings_store_open(path: &Path) -> Result<SettingsStore, EngineError> {
    Ok(SettingsStore::load(path)?)
}

pub fn trace_init(log_dir: &Path) {
    crate::trace_init::init_tracing(log_dir);
}
