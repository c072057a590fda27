use m17n_core::settings::PreeditFocusMode;
use m17n_core::Modifiers;

use crate::types::{Capabilities, LookupTable, PreeditText, Property, SurroundingText};

/// Outbound half of the host engine protocol: everything the adapter asks
/// the input-method framework to show or do.
pub trait EngineHost {
    fn commit_text(&mut self, text: &str);

    /// `cursor` is in characters; `visible` is false for an empty preedit.
    fn update_preedit_text(
        &mut self,
        text: &PreeditText,
        cursor: usize,
        visible: bool,
        mode: PreeditFocusMode,
    );

    fn hide_preedit_text(&mut self);

    fn update_lookup_table(&mut self, table: &LookupTable, visible: bool);

    fn hide_lookup_table(&mut self);

    fn update_auxiliary_text(&mut self, text: &str, visible: bool);

    fn hide_auxiliary_text(&mut self);

    fn update_property(&mut self, property: &Property);

    fn register_properties(&mut self, properties: &[Property]);

    /// Text around the client's cursor. Calling this also tells the client
    /// that the engine uses surrounding text.
    fn surrounding_text(&mut self) -> SurroundingText;

    /// Delete `nchars` characters starting `offset` characters from the
    /// cursor.
    fn delete_surrounding_text(&mut self, offset: i32, nchars: u32);

    fn client_capabilities(&self) -> Capabilities;

    /// The framework's own key handling (compose sequences and the like),
    /// run before the backend sees the key.
    fn builtin_process_key_event(&mut self, keyval: u32, keycode: u16, modifiers: Modifiers) -> bool {
        let _ = (keyval, keycode, modifiers);
        false
    }
}
