//! Backend callbacks → host UI updates.

use tracing::{debug, debug_span, warn};

use m17n_core::backend::{Callbacks, Command, ContextId, ContextState, MText, RequestSlot};
use m17n_core::settings::EngineConfig;

use crate::host::EngineHost;
use crate::types::{
    delete_arguments, rebuild_candidates, surrounding_span, AttributeKind, Capabilities,
    LookupTable, PreeditState, PreeditText, Property, StatusIndicator, TextAttribute,
};

pub const STATUS_PROPERTY: &str = "status";

/// UI state one session shows through the host.
///
/// The backend may call back before the session holds its context handle,
/// so the owning context is learned from the first callback and later
/// callbacks from any other context are dropped.
#[derive(Debug)]
pub struct CallbackDispatcher {
    bound: Option<ContextId>,
    title: Option<String>,
    preedit: PreeditState,
    status: Property,
    table: LookupTable,
}

impl CallbackDispatcher {
    /// `title` is compared against status text; `status` is the initial
    /// status property.
    pub fn new(title: Option<String>, status: Property) -> Self {
        Self {
            bound: None,
            title,
            preedit: PreeditState::default(),
            status,
            table: LookupTable::default(),
        }
    }

    pub fn bound(&self) -> Option<ContextId> {
        self.bound
    }

    /// Bind to `context` unless a callback already did.
    pub fn bind(&mut self, context: ContextId) {
        if self.bound.is_none() {
            self.bound = Some(context);
        }
    }

    pub fn preedit(&self) -> &PreeditState {
        &self.preedit
    }

    pub fn status_property(&self) -> &Property {
        &self.status
    }

    pub fn lookup_table(&self) -> &LookupTable {
        &self.table
    }

    /// Pair the dispatcher with a host for the duration of one backend call.
    pub fn with_host<'a>(
        &'a mut self,
        host: &'a mut dyn EngineHost,
        config: EngineConfig,
    ) -> Dispatch<'a> {
        Dispatch {
            dispatcher: self,
            host,
            config,
        }
    }
}

/// A dispatcher borrowed together with the host and a configuration
/// snapshot; this is what the backend calls into.
pub struct Dispatch<'a> {
    dispatcher: &'a mut CallbackDispatcher,
    host: &'a mut dyn EngineHost,
    config: EngineConfig,
}

impl Callbacks for Dispatch<'_> {
    fn callback(&mut self, context: ContextId, command: Command, state: &mut ContextState) {
        let _span = debug_span!("callback", command = command.name()).entered();
        match self.dispatcher.bound {
            None => {
                debug!(context = context.raw(), "bound to context");
                self.dispatcher.bound = Some(context);
            }
            Some(own) if own != context => {
                warn!(
                    context = context.raw(),
                    own = own.raw(),
                    "ignoring callback from foreign context"
                );
                return;
            }
            Some(_) => {}
        }

        match command {
            Command::PreeditStart | Command::PreeditDone | Command::StatusStart => {
                self.host.hide_preedit_text();
            }
            Command::PreeditDraw => self.update_preedit(state),
            Command::StatusDraw => self.update_status(&state.status),
            Command::CandidatesStart | Command::CandidatesDone => {
                self.host.hide_lookup_table();
                self.host.hide_auxiliary_text();
            }
            Command::CandidatesDraw => self.update_lookup_table(state),
            Command::GetSurroundingText => {
                if self.surrounding_text_enabled() {
                    self.fetch_surrounding_text(&mut state.request);
                }
            }
            Command::DeleteSurroundingText => {
                if self.surrounding_text_enabled() {
                    self.delete_surrounding_text(&state.request);
                }
            }
            Command::StatusDone | Command::SetSpot | Command::Toggle | Command::Reset => {}
        }
    }
}

impl Dispatch<'_> {
    pub fn commit(&mut self, text: &str) {
        debug!(text, "commit");
        self.host.commit_text(text);
    }

    fn update_preedit(&mut self, state: &ContextState) {
        let text = match state.preedit.to_utf8() {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "preedit not decodable; keeping previous");
                return;
            }
        };
        let len = state.preedit.len();
        let cfg = self.config;
        let mut attributes = Vec::with_capacity(3);
        let mut span = |kind| attributes.push(TextAttribute { kind, start: 0, end: len });
        if let Some(fg) = cfg.preedit_foreground {
            span(AttributeKind::Foreground(fg));
        }
        if let Some(bg) = cfg.preedit_background {
            span(AttributeKind::Background(bg));
        }
        span(AttributeKind::Underline(cfg.preedit_underline));

        let visible = len > 0;
        debug!(preedit = %text, cursor = state.cursor_pos, "preedit draw");
        self.host.update_preedit_text(
            &PreeditText {
                text: text.clone(),
                attributes,
            },
            state.cursor_pos,
            visible,
            cfg.preedit_focus_mode,
        );
        self.dispatcher.preedit = PreeditState {
            text,
            cursor: state.cursor_pos,
            visible,
        };
    }

    fn update_status(&mut self, status: &MText) {
        let indicator = StatusIndicator::from_status(
            status.to_utf8_lossy(),
            self.dispatcher.title.as_deref(),
        );
        let prop = &mut self.dispatcher.status;
        prop.label = indicator.label;
        prop.visible = indicator.visible;
        self.host.update_property(prop);
    }

    fn update_lookup_table(&mut self, state: &ContextState) {
        let table = &mut self.dispatcher.table;
        table.clear();

        let page = if state.candidate_show && !state.candidate_list.is_empty() {
            let page = rebuild_candidates(&state.candidate_list, state.candidate_index);
            if page.is_none() {
                warn!(
                    index = state.candidate_index,
                    groups = state.candidate_list.len(),
                    "candidate index past last group"
                );
            }
            page
        } else {
            None
        };

        match page {
            Some(page) => {
                table.load(&page, self.config.lookup_table_orientation);
                debug!(page = page.page, total = page.total, cursor = page.cursor, "candidates draw");
                self.host.update_lookup_table(table, true);
                self.host.update_auxiliary_text(&page.auxiliary_text(), true);
            }
            None => {
                self.host.hide_lookup_table();
                self.host.hide_auxiliary_text();
            }
        }
    }

    fn surrounding_text_enabled(&self) -> bool {
        let enabled = self
            .host
            .client_capabilities()
            .contains(Capabilities::SURROUNDING_TEXT);
        if !enabled {
            debug!("client lacks surrounding text");
        }
        enabled
    }

    fn fetch_surrounding_text(&mut self, request: &mut RequestSlot) {
        let surrounding = self.host.surrounding_text();
        let text = MText::from(surrounding.text.as_str());
        let span = surrounding_span(surrounding.cursor_pos, text.len(), request.span());
        debug!(start = span.start, end = span.end, "surrounding text");
        *request = RequestSlot::Text(text.slice(span.start, span.end));
    }

    fn delete_surrounding_text(&mut self, request: &RequestSlot) {
        if let Some((offset, nchars)) = delete_arguments(request.span()) {
            debug!(offset, nchars, "delete surrounding text");
            self.host.delete_surrounding_text(offset, nchars);
        }
    }
}
