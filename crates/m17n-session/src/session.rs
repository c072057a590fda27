//! One backend input context and the UI state it drives.

use tracing::{debug, debug_span, warn};

use m17n_core::backend::{Callbacks, Command, InputContext, InputMethod};
use m17n_core::settings::EngineConfig;
use m17n_core::KeySymbol;

use crate::dispatcher::CallbackDispatcher;
use crate::host::EngineHost;
use crate::types::{FeedResult, InputHints, InputPurpose, NavDirection, Property};

/// Wraps the backend's filter/lookup/reset calls for a single client.
///
/// Every operation takes the host and a configuration snapshot; callbacks
/// the backend fires during the call are handled before it returns.
pub struct ConversionSession {
    context: Box<dyn InputContext>,
    dispatcher: CallbackDispatcher,
    purpose: InputPurpose,
    hints: InputHints,
}

impl ConversionSession {
    /// Create the backend context. Callbacks fired while the backend builds
    /// it are already routed to this session.
    pub fn new(
        im: &dyn InputMethod,
        title: Option<String>,
        status: Property,
        host: &mut dyn EngineHost,
        config: EngineConfig,
    ) -> Self {
        let mut dispatcher = CallbackDispatcher::new(title, status);
        let context = im.create_context(&mut dispatcher.with_host(host, config));
        dispatcher.bind(context.id());
        debug!(context = context.id().raw(), "session created");
        Self {
            context,
            dispatcher,
            purpose: InputPurpose::default(),
            hints: InputHints::empty(),
        }
    }

    pub fn dispatcher(&self) -> &CallbackDispatcher {
        &self.dispatcher
    }

    pub fn purpose(&self) -> InputPurpose {
        self.purpose
    }

    pub fn hints(&self) -> InputHints {
        self.hints
    }

    /// True when key processing is suspended for a password or PIN field.
    pub fn is_suppressed(&self) -> bool {
        self.purpose.is_private()
    }

    pub fn has_pending_preedit(&self) -> bool {
        !self.context.state().preedit.is_empty()
    }

    pub fn feed_key(
        &mut self,
        host: &mut dyn EngineHost,
        config: EngineConfig,
        key: &KeySymbol,
    ) -> FeedResult {
        let _span = debug_span!("feed_key", key = %key).entered();
        let mut cb = self.dispatcher.with_host(host, config);
        if self.context.filter(key, &mut cb) {
            return FeedResult::Consumed;
        }
        let produced = self.context.lookup(key, &mut cb);
        let text = match produced.to_utf8() {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "produced text not decodable");
                return FeedResult::Passthrough;
            }
        };
        if text.is_empty() {
            return FeedResult::Passthrough;
        }
        self.commit(host, config, &text);
        FeedResult::Committed(text)
    }

    /// Commit `text` and redraw the preedit from the backend's state.
    pub fn commit(&mut self, host: &mut dyn EngineHost, config: EngineConfig, text: &str) {
        let id = self.context.id();
        let mut cb = self.dispatcher.with_host(host, config);
        cb.commit(text);
        cb.callback(id, Command::PreeditDraw, self.context.state_mut());
    }

    /// Commit whatever the backend has in its preedit verbatim, then reset.
    /// Returns false when there was nothing pending.
    pub fn commit_pending_preedit(
        &mut self,
        host: &mut dyn EngineHost,
        config: EngineConfig,
    ) -> bool {
        if !self.has_pending_preedit() {
            return false;
        }
        match self.context.state().preedit.to_utf8() {
            Ok(text) => self.dispatcher.with_host(host, config).commit(&text),
            Err(e) => warn!(error = %e, "pending preedit not decodable; dropped"),
        }
        self.reset(host, config);
        true
    }

    pub fn reset(&mut self, host: &mut dyn EngineHost, config: EngineConfig) {
        debug!("reset");
        self.context
            .reset(&mut self.dispatcher.with_host(host, config));
    }

    pub fn focus_in(&mut self, host: &mut dyn EngineHost, config: EngineConfig) {
        self.feed_key(host, config, &KeySymbol::focus_in());
    }

    /// Focus loss resets the context rather than forwarding focus-out, so the
    /// host's preedit focus mode decides what happens to pending text.
    pub fn focus_out(&mut self, host: &mut dyn EngineHost, config: EngineConfig) {
        self.reset(host, config);
    }

    pub fn navigate(
        &mut self,
        host: &mut dyn EngineHost,
        config: EngineConfig,
        direction: NavDirection,
    ) -> FeedResult {
        self.feed_key(host, config, &KeySymbol::intern(direction.key_name()))
    }

    pub fn set_content_type(
        &mut self,
        host: &mut dyn EngineHost,
        config: EngineConfig,
        purpose: InputPurpose,
        hints: InputHints,
    ) {
        debug!(?purpose, ?hints, "content type");
        self.purpose = purpose;
        self.hints = hints;
        if purpose.is_private() {
            self.focus_out(host, config);
        } else {
            self.focus_in(host, config);
        }
    }

    /// Tear down: UI state first, then the backend context.
    pub fn destroy(self) {
        let Self {
            context,
            dispatcher,
            ..
        } = self;
        debug!(context = context.id().raw(), "session destroyed");
        drop(dispatcher);
        drop(context);
    }
}
