mod dispatcher;

use std::sync::{Arc, Mutex};

use m17n_core::backend::{
    Callbacks, CandidateGroup, Command, ContextId, ContextState, InputContext, InputMethod, MText,
    RequestSlot,
};
use m17n_core::settings::{EngineConfig, PreeditFocusMode};
use m17n_core::{KeySymbol, Modifiers};

use crate::host::EngineHost;
use crate::types::{
    AttributeKind, Capabilities, LookupTable, PreeditText, Property, SurroundingText,
};

// --- Recording host ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum HostCall {
    Commit(String),
    UpdatePreedit {
        text: String,
        cursor: usize,
        visible: bool,
        mode: PreeditFocusMode,
        attributes: Vec<AttributeKind>,
    },
    HidePreedit,
    UpdateTable {
        candidates: Vec<String>,
        cursor: usize,
        page_size: usize,
    },
    HideTable,
    UpdateAux(String),
    HideAux,
    UpdateProperty {
        key: String,
        label: Option<String>,
        visible: bool,
    },
    RegisterProperties(Vec<String>),
    SurroundingQuery,
    Delete(i32, u32),
}

pub(super) struct RecordingHost {
    pub calls: Vec<HostCall>,
    pub capabilities: Capabilities,
    pub surrounding: SurroundingText,
    /// Whether the framework's built-in handling claims every key.
    pub builtin_consumes: bool,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            capabilities: Capabilities::all(),
            surrounding: SurroundingText::default(),
            builtin_consumes: false,
        }
    }

    pub fn take(&mut self) -> Vec<HostCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn commits(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HostCall::Commit(t) => Some(t.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn last_preedit(&self) -> Option<(String, usize, bool)> {
        self.calls.iter().rev().find_map(|c| match c {
            HostCall::UpdatePreedit {
                text,
                cursor,
                visible,
                ..
            } => Some((text.clone(), *cursor, *visible)),
            _ => None,
        })
    }
}

impl EngineHost for RecordingHost {
    fn commit_text(&mut self, text: &str) {
        self.calls.push(HostCall::Commit(text.to_string()));
    }

    fn update_preedit_text(
        &mut self,
        text: &PreeditText,
        cursor: usize,
        visible: bool,
        mode: PreeditFocusMode,
    ) {
        self.calls.push(HostCall::UpdatePreedit {
            text: text.text.clone(),
            cursor,
            visible,
            mode,
            attributes: text.attributes.iter().map(|a| a.kind).collect(),
        });
    }

    fn hide_preedit_text(&mut self) {
        self.calls.push(HostCall::HidePreedit);
    }

    fn update_lookup_table(&mut self, table: &LookupTable, _visible: bool) {
        self.calls.push(HostCall::UpdateTable {
            candidates: table.candidates.clone(),
            cursor: table.cursor_pos,
            page_size: table.page_size,
        });
    }

    fn hide_lookup_table(&mut self) {
        self.calls.push(HostCall::HideTable);
    }

    fn update_auxiliary_text(&mut self, text: &str, _visible: bool) {
        self.calls.push(HostCall::UpdateAux(text.to_string()));
    }

    fn hide_auxiliary_text(&mut self) {
        self.calls.push(HostCall::HideAux);
    }

    fn update_property(&mut self, property: &Property) {
        self.calls.push(HostCall::UpdateProperty {
            key: property.key.clone(),
            label: property.label.clone(),
            visible: property.visible,
        });
    }

    fn register_properties(&mut self, properties: &[Property]) {
        self.calls.push(HostCall::RegisterProperties(
            properties.iter().map(|p| p.key.clone()).collect(),
        ));
    }

    fn surrounding_text(&mut self) -> SurroundingText {
        self.calls.push(HostCall::SurroundingQuery);
        self.surrounding.clone()
    }

    fn delete_surrounding_text(&mut self, offset: i32, nchars: u32) {
        self.calls.push(HostCall::Delete(offset, nchars));
    }

    fn client_capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn builtin_process_key_event(&mut self, _: u32, _: u16, modifiers: Modifiers) -> bool {
        self.builtin_consumes && !modifiers.contains(Modifiers::RELEASE)
    }
}

// --- Scripted backend ---

/// What the fake contexts saw, shared with the test.
#[derive(Debug, Default)]
pub(super) struct BackendLog {
    pub keys: Vec<String>,
    pub resets: usize,
    pub destroyed: Vec<ContextId>,
    pub surrounding: Vec<String>,
}

/// A tiny input method:
/// - `a`..`z` accumulate in the preedit
/// - `BackSpace` deletes from a non-empty preedit
/// - ` `/`Return` commit the preedit through lookup
/// - `Tab` opens three candidate groups of five
/// - `Up`/`Down` move a group, `Left`/`Right` a candidate, while shown
/// - digits are produced directly by lookup
/// - `C-D` deletes two characters before the cursor, `C-G` fetches three
/// - `input-focus-in` redraws the status
pub(super) struct FakeIm {
    pub log: Arc<Mutex<BackendLog>>,
    /// Status drawn while the context is being created.
    pub status_on_create: Option<String>,
}

impl FakeIm {
    pub fn new() -> Self {
        Self {
            log: Arc::default(),
            status_on_create: None,
        }
    }
}

impl InputMethod for FakeIm {
    fn create_context(&self, callbacks: &mut dyn Callbacks) -> Box<dyn InputContext> {
        let mut ctx = FakeContext {
            id: ContextId::next(),
            state: ContextState::default(),
            pending_commit: MText::new(),
            log: Arc::clone(&self.log),
        };
        if let Some(status) = &self.status_on_create {
            ctx.state.status = MText::from(status.as_str());
            callbacks.callback(ctx.id, Command::StatusDraw, &mut ctx.state);
        }
        Box::new(ctx)
    }
}

pub(super) struct FakeContext {
    id: ContextId,
    state: ContextState,
    pending_commit: MText,
    log: Arc<Mutex<BackendLog>>,
}

const GROUP_TEXT: [&str; 3] = ["abcde", "fghij", "klmno"];

impl FakeContext {
    fn fire(&mut self, cb: &mut dyn Callbacks, command: Command) {
        cb.callback(self.id, command, &mut self.state);
    }

    fn move_candidate(&mut self, cb: &mut dyn Callbacks, delta: isize) {
        let total: usize = self.state.candidate_list.iter().map(|g| g.len()).sum();
        let index = self.state.candidate_index as isize + delta;
        self.state.candidate_index = index.rem_euclid(total as isize) as usize;
        self.fire(cb, Command::CandidatesDraw);
    }
}

impl InputContext for FakeContext {
    fn id(&self) -> ContextId {
        self.id
    }

    fn state(&self) -> &ContextState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ContextState {
        &mut self.state
    }

    fn filter(&mut self, key: &KeySymbol, cb: &mut dyn Callbacks) -> bool {
        let name = key.name().to_string();
        self.log.lock().unwrap().keys.push(name.clone());
        let shown = self.state.candidate_show;
        match name.as_str() {
            "input-focus-in" => {
                self.fire(cb, Command::StatusDraw);
                true
            }
            k if k.len() == 1 && k.as_bytes()[0].is_ascii_lowercase() => {
                if self.state.preedit.is_empty() {
                    self.fire(cb, Command::PreeditStart);
                }
                self.state.preedit.push(k.chars().next().unwrap());
                self.state.cursor_pos = self.state.preedit.len();
                self.fire(cb, Command::PreeditDraw);
                true
            }
            "BackSpace" if !self.state.preedit.is_empty() => {
                let len = self.state.preedit.len();
                self.state.preedit = self.state.preedit.slice(0, len - 1);
                self.state.cursor_pos = len - 1;
                self.fire(cb, Command::PreeditDraw);
                true
            }
            " " | "Return" if !self.state.preedit.is_empty() => {
                self.pending_commit = std::mem::take(&mut self.state.preedit);
                self.state.cursor_pos = 0;
                if shown {
                    self.state.candidate_show = false;
                    self.fire(cb, Command::CandidatesDone);
                }
                self.fire(cb, Command::PreeditDone);
                false
            }
            "Tab" if !self.state.preedit.is_empty() => {
                self.state.candidate_list = GROUP_TEXT
                    .iter()
                    .map(|t| CandidateGroup::Text(MText::from(*t)))
                    .collect();
                self.state.candidate_index = 0;
                self.state.candidate_show = true;
                self.fire(cb, Command::CandidatesStart);
                self.fire(cb, Command::CandidatesDraw);
                true
            }
            "Up" if shown => {
                self.move_candidate(cb, -5);
                true
            }
            "Down" if shown => {
                self.move_candidate(cb, 5);
                true
            }
            "Left" if shown => {
                self.move_candidate(cb, -1);
                true
            }
            "Right" if shown => {
                self.move_candidate(cb, 1);
                true
            }
            "C-D" => {
                self.state.request = RequestSlot::Span(-2);
                self.fire(cb, Command::DeleteSurroundingText);
                true
            }
            "C-G" => {
                self.state.request = RequestSlot::Span(-3);
                self.fire(cb, Command::GetSurroundingText);
                if let RequestSlot::Text(t) = self.state.request.take() {
                    self.log.lock().unwrap().surrounding.push(t.to_utf8_lossy());
                }
                true
            }
            _ => false,
        }
    }

    fn lookup(&mut self, key: &KeySymbol, _cb: &mut dyn Callbacks) -> MText {
        if !self.pending_commit.is_empty() {
            return std::mem::take(&mut self.pending_commit);
        }
        match key.name() {
            k if k.len() == 1 && k.as_bytes()[0].is_ascii_digit() => MText::from(k),
            _ => MText::new(),
        }
    }

    fn reset(&mut self, cb: &mut dyn Callbacks) {
        self.log.lock().unwrap().resets += 1;
        self.pending_commit.clear();
        self.state.preedit.clear();
        self.state.cursor_pos = 0;
        self.fire(cb, Command::PreeditDraw);
        if self.state.candidate_show {
            self.state.candidate_show = false;
            self.state.candidate_list.clear();
            self.fire(cb, Command::CandidatesDone);
        }
    }
}

impl Drop for FakeContext {
    fn drop(&mut self) {
        if let Ok(mut log) = self.log.lock() {
            log.destroyed.push(self.id);
        }
    }
}

pub(super) fn plain_config() -> EngineConfig {
    EngineConfig::default()
}

pub(super) fn status_property() -> Property {
    Property {
        label: Some("m17n:si:wijesekara".to_string()),
        ..Property::new("status")
    }
}
