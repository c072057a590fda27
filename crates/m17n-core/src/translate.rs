//! Host key event → backend key symbol.

use tracing::trace;

use crate::keymap::Keymap;
use crate::keysym::{self, Modifiers};
use crate::symbol::KeySymbol;

/// Tags in the order they appear in a rendered symbol. The backend's parser
/// only accepts this order.
const PREFIX_TAGS: [(Modifiers, &str); 7] = [
    (Modifiers::SHIFT, "S-"),
    (Modifiers::CONTROL, "C-"),
    (Modifiers::META, "M-"),
    (Modifiers::MOD1, "A-"),
    (Modifiers::MOD5, "G-"),
    (Modifiers::SUPER, "s-"),
    (Modifiers::HYPER, "H-"),
];

/// Modifiers carried onto every symbol regardless of the base key.
const CARRIED: Modifiers = Modifiers::MOD1
    .union(Modifiers::MOD5)
    .union(Modifiers::META)
    .union(Modifiers::SUPER)
    .union(Modifiers::HYPER);

/// One physical key transition as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub keyval: u32,
    pub keycode: u16,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(keyval: u32, keycode: u16, modifiers: Modifiers) -> Self {
        Self {
            keyval,
            keycode,
            modifiers,
        }
    }

    pub fn is_release(&self) -> bool {
        self.modifiers.contains(Modifiers::RELEASE)
    }

    pub fn translate(&self, layout: &(impl Keymap + ?Sized)) -> Option<KeySymbol> {
        translate(self.keycode, self.keyval, self.modifiers, layout)
    }
}

/// Map a key event to the backend's symbol, or `None` when the key should
/// fall through to the next handler (modifier presses, releases, keys
/// without a name).
///
/// With the level-3 bit set, `keyval` is re-resolved from `keycode` under
/// `layout` with that bit cleared, so the backend sees the layout-independent
/// character rather than the AltGr glyph.
pub fn translate(
    keycode: u16,
    keyval: u32,
    modifiers: Modifiers,
    layout: &(impl Keymap + ?Sized),
) -> Option<KeySymbol> {
    if modifiers.contains(Modifiers::RELEASE) || keysym::is_modifier(keyval) {
        return None;
    }

    let keyval = if modifiers.contains(Modifiers::MOD5) {
        layout.lookup_keysym(keycode, modifiers - Modifiers::MOD5)
    } else {
        keyval
    };

    let mut mask = Modifiers::empty();
    let base = if keysym::is_printable_ascii(keyval) {
        let mut c = keyval as u8 as char;
        // Space is the only printable key where Shift is not already folded
        // into the keyval.
        if keyval == keysym::SPACE && modifiers.contains(Modifiers::SHIFT) {
            mask |= Modifiers::SHIFT;
        }
        if modifiers.contains(Modifiers::CONTROL) {
            c = c.to_ascii_uppercase();
            mask |= Modifiers::CONTROL;
        }
        c.to_string()
    } else {
        let name = keysym::keyval_name(keyval)?;
        mask |= modifiers & (Modifiers::CONTROL | Modifiers::SHIFT);
        name
    };

    mask |= modifiers & CARRIED;

    let mut name = String::with_capacity(base.len() + 2 * mask.bits().count_ones() as usize);
    for (flag, tag) in PREFIX_TAGS {
        if mask.contains(flag) {
            name.push_str(tag);
        }
    }
    name.push_str(&base);
    trace!(keyval, keycode, symbol = %name, "translated key");
    Some(KeySymbol::intern(&name))
}
