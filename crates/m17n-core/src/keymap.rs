//! Reference keyboard layout used to recover layout-independent keysyms.
//!
//! Keycodes are the host's evdev codes; xkb numbers the same keys 8 higher.

use tracing::warn;
use xkbcommon::xkb;

use crate::keysym::{self, Modifiers};

const EVDEV_OFFSET: u32 = 8;

/// Resolves a physical keycode under some layout.
pub trait Keymap {
    /// Keysym produced by `keycode` with `state`, or [`keysym::VOID_SYMBOL`]
    /// when the key is not part of the layout.
    fn lookup_keysym(&self, keycode: u16, state: Modifiers) -> u32;
}

/// The `us` layout compiled by xkbcommon. Lookups honour the eight core
/// modifiers; Caps Lock and Num Lock act as locks.
pub struct UsKeymap {
    keymap: Option<xkb::Keymap>,
}

impl UsKeymap {
    pub fn new() -> Self {
        let context = xkb::Context::new(xkb::CONTEXT_NO_FLAGS);
        let keymap = xkb::Keymap::new_from_names(
            &context,
            "evdev",
            "pc105",
            "us",
            "",
            None,
            xkb::KEYMAP_COMPILE_NO_FLAGS,
        );
        if keymap.is_none() {
            warn!("cannot compile the us keymap; layout lookups yield VoidSymbol");
        }
        Self { keymap }
    }

    pub fn is_available(&self) -> bool {
        self.keymap.is_some()
    }
}

impl Default for UsKeymap {
    fn default() -> Self {
        Self::new()
    }
}

impl Keymap for UsKeymap {
    fn lookup_keysym(&self, keycode: u16, state: Modifiers) -> u32 {
        let Some(keymap) = &self.keymap else {
            return keysym::VOID_SYMBOL;
        };
        let core = state.bits() & 0xff;
        let locks = Modifiers::LOCK | Modifiers::MOD2;
        let mut xkb_state = xkb::State::new(keymap);
        xkb_state.update_mask(
            core & !locks.bits(),
            0,
            core & locks.bits(),
            0,
            0,
            0,
        );
        let code = xkb::Keycode::from(u32::from(keycode) + EVDEV_OFFSET);
        match xkb_state.key_get_one_sym(code).raw() {
            0 => keysym::VOID_SYMBOL,
            sym => sym,
        }
    }
}
