//! Host engine lifecycle bridged onto a [`ConversionSession`].

use std::process::Command;

use tracing::{debug, debug_span, warn};

use m17n_core::backend::InputMethod;
use m17n_core::keymap::{Keymap, UsKeymap};
use m17n_core::keysym;
use m17n_core::settings::{ConfigHandle, EngineConfig};
use m17n_core::{translate, Modifiers};

use crate::dispatcher::STATUS_PROPERTY;
use crate::host::EngineHost;
use crate::session::ConversionSession;
use crate::types::{InputHints, InputPurpose, NavDirection, Property};

pub const SETUP_PROPERTY: &str = "setup";

/// Per-class data every adapter of that class shares.
#[derive(Debug, Clone, Default)]
pub struct EngineInfo {
    /// `m17n:<lang>:<variant>`.
    pub engine_name: String,
    pub title: Option<String>,
    pub icon: Option<String>,
    /// Preferences program, run as `<command> --name <engine_name>`.
    pub setup_command: Option<String>,
}

/// One engine instance serving one client.
pub struct EngineAdapter<H: EngineHost> {
    info: EngineInfo,
    host: H,
    config: ConfigHandle,
    session: ConversionSession,
    setup: Option<Property>,
    keymap: UsKeymap,
}

impl<H: EngineHost> EngineAdapter<H> {
    pub fn new(info: EngineInfo, im: &dyn InputMethod, config: ConfigHandle, mut host: H) -> Self {
        let status = Property {
            label: Some(info.engine_name.clone()),
            icon: info.icon.clone(),
            tooltip: Some(info.engine_name.clone()),
            ..Property::new(STATUS_PROPERTY)
        };
        let setup = info.setup_command.as_ref().map(|_| Property {
            label: Some("Setup".to_string()),
            icon: Some("gtk-preferences".to_string()),
            tooltip: Some("Configure M17N engine".to_string()),
            ..Property::new(SETUP_PROPERTY)
        });
        let session =
            ConversionSession::new(im, info.title.clone(), status, &mut host, config.snapshot());
        debug!(engine = %info.engine_name, "engine created");
        Self {
            info,
            host,
            config,
            session,
            setup,
            keymap: UsKeymap::new(),
        }
    }

    pub fn engine_name(&self) -> &str {
        &self.info.engine_name
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn session(&self) -> &ConversionSession {
        &self.session
    }

    pub fn config(&self) -> EngineConfig {
        self.config.snapshot()
    }

    /// Status property followed by the setup entry, if any.
    pub fn properties(&self) -> Vec<Property> {
        std::iter::once(self.session.dispatcher().status_property().clone())
            .chain(self.setup.clone())
            .collect()
    }

    /// Returns true when the key was handled and must not reach the client.
    pub fn process_key_event(&mut self, keyval: u32, keycode: u16, modifiers: Modifiers) -> bool {
        let _span = debug_span!("process_key_event", keyval, keycode, ?modifiers).entered();
        let config = self.config.snapshot();

        if self.session.is_suppressed() {
            return false;
        }

        if self
            .host
            .builtin_process_key_event(keyval, keycode, modifiers)
        {
            self.session.commit_pending_preedit(&mut self.host, config);
            return true;
        }

        if modifiers.contains(Modifiers::RELEASE) {
            return false;
        }

        let resolved = if config.use_us_layout {
            self.keymap.lookup_keysym(keycode, modifiers)
        } else {
            keyval
        };

        if let Some(symbol) = translate(keycode, resolved, modifiers, &self.keymap) {
            if self
                .session
                .feed_key(&mut self.host, config, &symbol)
                .is_handled()
            {
                return true;
            }
        }

        // Keys the US layout remapped still produce the remapped character.
        if resolved != keyval && keysym::is_printable_ascii(resolved) {
            let c = resolved as u8 as char;
            self.session
                .commit(&mut self.host, config, c.encode_utf8(&mut [0; 4]));
            return true;
        }

        false
    }

    pub fn focus_in(&mut self) {
        let properties = self.properties();
        self.host.register_properties(&properties);
        self.session.focus_in(&mut self.host, self.config.snapshot());
    }

    pub fn focus_out(&mut self) {
        self.session.focus_out(&mut self.host, self.config.snapshot());
    }

    pub fn reset(&mut self) {
        self.session.reset(&mut self.host, self.config.snapshot());
    }

    /// Query surrounding text once so the client knows the engine uses it.
    pub fn enable(&mut self) {
        let _ = self.host.surrounding_text();
    }

    pub fn disable(&mut self) {
        self.focus_out();
    }

    pub fn page_up(&mut self) {
        self.navigate(NavDirection::PageUp);
    }

    pub fn page_down(&mut self) {
        self.navigate(NavDirection::PageDown);
    }

    pub fn cursor_up(&mut self) {
        self.navigate(NavDirection::CursorLeft);
    }

    pub fn cursor_down(&mut self) {
        self.navigate(NavDirection::CursorRight);
    }

    fn navigate(&mut self, direction: NavDirection) {
        self.session
            .navigate(&mut self.host, self.config.snapshot(), direction);
    }

    pub fn set_content_type(&mut self, purpose: InputPurpose, hints: InputHints) {
        if !purpose.is_private() {
            let properties = self.properties();
            self.host.register_properties(&properties);
        }
        self.session
            .set_content_type(&mut self.host, self.config.snapshot(), purpose, hints);
    }

    pub fn property_activate(&mut self, name: &str, _state: u32) {
        if name != SETUP_PROPERTY {
            return;
        }
        let Some(command) = self.info.setup_command.as_deref() else {
            return;
        };
        launch_setup(command, &self.info.engine_name);
    }

    /// Ordered teardown: UI objects, backend context, keymap. Hands the host
    /// back to the caller.
    pub fn destroy(self) -> H {
        let Self {
            info,
            host,
            session,
            setup,
            keymap,
            ..
        } = self;
        drop(setup);
        session.destroy();
        drop(keymap);
        debug!(engine = %info.engine_name, "engine destroyed");
        host
    }
}

/// Start the preferences program without waiting for it. A thread reaps it
/// when it exits.
fn launch_setup(command: &str, engine_name: &str) {
    match Command::new(command).arg("--name").arg(engine_name).spawn() {
        Ok(mut child) => {
            debug!(command, engine = engine_name, pid = child.id(), "setup launched");
            std::thread::spawn(move || {
                let _ = child.wait();
            });
        }
        Err(e) => warn!(command, error = %e, "cannot launch setup"),
    }
}
