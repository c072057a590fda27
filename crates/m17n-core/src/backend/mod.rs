//! Contract with the conversion backend.
//!
//! The backend owns all conversion state. The adapter drives it through
//! [`InputContext::filter`], [`InputContext::lookup`] and
//! [`InputContext::reset`]; the backend reports every state change back
//! synchronously through [`Callbacks`], possibly before the caller has
//! received the context handle.

mod text;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub use text::{CandidateGroup, DecodeError, MText};

use crate::engine_id::EngineId;
use crate::symbol::KeySymbol;
use crate::variables::{Variable, VariableError, VariableValue};

/// Identity of one backend input context. Fresh ids never repeat within a
/// process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(u64);

impl ContextId {
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Callback kinds the backend emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    PreeditStart,
    PreeditDraw,
    PreeditDone,
    StatusStart,
    StatusDraw,
    StatusDone,
    CandidatesStart,
    CandidatesDraw,
    CandidatesDone,
    SetSpot,
    Toggle,
    Reset,
    GetSurroundingText,
    DeleteSurroundingText,
}

impl Command {
    pub const ALL: [Command; 14] = [
        Self::PreeditStart,
        Self::PreeditDraw,
        Self::PreeditDone,
        Self::StatusStart,
        Self::StatusDraw,
        Self::StatusDone,
        Self::CandidatesStart,
        Self::CandidatesDraw,
        Self::CandidatesDone,
        Self::SetSpot,
        Self::Toggle,
        Self::Reset,
        Self::GetSurroundingText,
        Self::DeleteSurroundingText,
    ];

    /// The backend's own name for the callback.
    pub fn name(self) -> &'static str {
        match self {
            Self::PreeditStart => "input-preedit-start",
            Self::PreeditDraw => "input-preedit-draw",
            Self::PreeditDone => "input-preedit-done",
            Self::StatusStart => "input-status-start",
            Self::StatusDraw => "input-status-draw",
            Self::StatusDone => "input-status-done",
            Self::CandidatesStart => "input-candidates-start",
            Self::CandidatesDraw => "input-candidates-draw",
            Self::CandidatesDone => "input-candidates-done",
            Self::SetSpot => "input-set-spot",
            Self::Toggle => "input-toggle",
            Self::Reset => "input-reset",
            Self::GetSurroundingText => "input-get-surrounding-text",
            Self::DeleteSurroundingText => "input-delete-surrounding-text",
        }
    }
}

/// Argument/result slot shared between the backend and the surrounding-text
/// callbacks. The backend puts a signed span length in; the get handler
/// replaces it with the fetched text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestSlot {
    #[default]
    Empty,
    Span(i32),
    Text(MText),
}

impl RequestSlot {
    /// Signed length requested by the backend; anything other than a span
    /// counts as zero.
    pub fn span(&self) -> i32 {
        match self {
            Self::Span(n) => *n,
            _ => 0,
        }
    }

    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

/// Live conversion state of one input context, readable from callbacks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextState {
    pub preedit: MText,
    /// Cursor position within `preedit`, in code points.
    pub cursor_pos: usize,
    pub status: MText,
    pub candidate_list: Vec<CandidateGroup>,
    /// Absolute index over all groups.
    pub candidate_index: usize,
    pub candidate_show: bool,
    pub request: RequestSlot,
}

/// Receiver for backend state-change notifications.
pub trait Callbacks {
    fn callback(&mut self, context: ContextId, command: Command, state: &mut ContextState);
}

/// One conversion context. Dropping it destroys the backend context.
pub trait InputContext: Send {
    fn id(&self) -> ContextId;

    fn state(&self) -> &ContextState;

    fn state_mut(&mut self) -> &mut ContextState;

    /// Offer `key` to the context. `true` means the key was consumed and no
    /// text is ready.
    fn filter(&mut self, key: &KeySymbol, callbacks: &mut dyn Callbacks) -> bool;

    /// Collect the text produced by `key`, possibly empty.
    fn lookup(&mut self, key: &KeySymbol, callbacks: &mut dyn Callbacks) -> MText;

    fn reset(&mut self, callbacks: &mut dyn Callbacks);
}

/// An opened input method, shared by every context created from it.
pub trait InputMethod: Send + Sync {
    fn create_context(&self, callbacks: &mut dyn Callbacks) -> Box<dyn InputContext>;
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TitleIcon {
    pub title: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("cannot open input method {0}")]
    Open(EngineId),
    #[error("no variable {key} in {engine}")]
    UnknownVariable { engine: EngineId, key: String },
    #[error(transparent)]
    Variable(#[from] VariableError),
    #[error("saving backend configuration failed: {0}")]
    Save(String),
}

/// Entry point into the conversion library.
pub trait Backend: Send + Sync {
    fn open(&self, id: &EngineId) -> Result<Arc<dyn InputMethod>, BackendError>;

    /// Title and icon registered for the input method, without retries.
    fn title_icon(&self, id: &EngineId) -> Option<TitleIcon>;

    fn variables(&self, id: &EngineId) -> Result<Vec<Variable>, BackendError>;

    fn config_variable(
        &self,
        id: &EngineId,
        key: &str,
        value: &VariableValue,
    ) -> Result<(), BackendError>;

    fn save_config(&self) -> Result<(), BackendError>;
}

/// Title and icon for `id`, retrying the upper-case variant spelling for the
/// engines that need it. Returns the id the data was found under.
pub fn resolve_title_icon(backend: &dyn Backend, id: &EngineId) -> (EngineId, TitleIcon) {
    if let Some(found) = backend.title_icon(id) {
        return (id.clone(), found);
    }
    if let Some(retry) = id.metadata_retry() {
        if let Some(found) = backend.title_icon(&retry) {
            return (retry, found);
        }
    }
    (id.clone(), TitleIcon::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_ids_are_unique() {
        let a = ContextId::next();
        let b = ContextId::next();
        assert_ne!(a, b);
        assert!(b.raw() > a.raw());
    }

    #[test]
    fn request_slot_span() {
        assert_eq!(RequestSlot::Span(-4).span(), -4);
        assert_eq!(RequestSlot::Empty.span(), 0);
        let mut slot = RequestSlot::Text(MText::from("x"));
        assert_eq!(slot.span(), 0);
        assert_eq!(slot.take(), RequestSlot::Text(MText::from("x")));
        assert_eq!(slot, RequestSlot::Empty);
    }

    #[test]
    fn command_names_distinct() {
        let mut names: Vec<_> = Command::ALL.iter().map(|c| c.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Command::ALL.len());
    }

    struct Meta;

    impl Backend for Meta {
        fn open(&self, id: &EngineId) -> Result<Arc<dyn InputMethod>, BackendError> {
            Err(BackendError::Open(id.clone()))
        }

        fn title_icon(&self, id: &EngineId) -> Option<TitleIcon> {
            (id.variant() == "IAST").then(|| TitleIcon {
                title: Some("IAST".into()),
                icon: None,
            })
        }

        fn variables(&self, _: &EngineId) -> Result<Vec<Variable>, BackendError> {
            Ok(Vec::new())
        }

        fn config_variable(
            &self,
            _: &EngineId,
            _: &str,
            _: &VariableValue,
        ) -> Result<(), BackendError> {
            Ok(())
        }

        fn save_config(&self) -> Result<(), BackendError> {
            Ok(())
        }
    }

    #[test]
    fn title_retry_for_exception_only() {
        let (found, data) = resolve_title_icon(&Meta, &EngineId::new("sa", "iast"));
        assert_eq!(found.variant(), "IAST");
        assert_eq!(data.title.as_deref(), Some("IAST"));

        let (found, data) = resolve_title_icon(&Meta, &EngineId::new("hi", "iast"));
        assert_eq!(found.variant(), "iast");
        assert_eq!(data, TitleIcon::default());
    }
}
