use m17n_core::backend::BackendError;
use m17n_core::settings::SettingsError;
use m17n_core::variables::VariableError;
use m17n_core::EngineNameError;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Name(#[from] EngineNameError),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("variable {key}: {source}")]
    Variable {
        key: String,
        #[source]
        source: VariableError,
    },
    #[error("IO error: {msg}")]
    Io { msg: String },
}
