//! Per-client input session on top of the conversion backend.
//!
//! `EngineAdapter` receives host lifecycle calls and key events, turns keys
//! into backend symbols and feeds them to a `ConversionSession`; the backend
//! reports state changes through the `CallbackDispatcher`, which drives the
//! host's preedit, candidate table and status property.

pub mod adapter;
pub mod dispatcher;
pub mod host;
pub mod session;
pub mod types;

#[cfg(test)]
mod tests;

pub use adapter::{EngineAdapter, EngineInfo, SETUP_PROPERTY};
pub use dispatcher::{CallbackDispatcher, Dispatch, STATUS_PROPERTY};
pub use host::EngineHost;
pub use session::ConversionSession;
pub use types::{
    Capabilities, CandidatePage, FeedResult, InputHints, InputPurpose, LookupTable, NavDirection,
    PreeditState, PreeditText, Property, StatusIndicator, SurroundingText,
};
