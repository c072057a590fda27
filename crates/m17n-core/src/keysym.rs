//! Host key values (X11 keysyms), modifier masks and key names.

use bitflags::bitflags;
use xkbcommon::xkb::{self, keysyms};

bitflags! {
    /// Modifier state delivered with every host key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u32 {
        const SHIFT = 1 << 0;
        const LOCK = 1 << 1;
        const CONTROL = 1 << 2;
        /// Usually Alt.
        const MOD1 = 1 << 3;
        /// Usually Num Lock.
        const MOD2 = 1 << 4;
        const MOD3 = 1 << 5;
        const MOD4 = 1 << 6;
        /// Level-3 shift (AltGr).
        const MOD5 = 1 << 7;
        const SUPER = 1 << 26;
        const HYPER = 1 << 27;
        const META = 1 << 28;
        const RELEASE = 1 << 30;
    }
}

impl Modifiers {
    pub const ALT: Self = Self::MOD1;
    pub const LEVEL3: Self = Self::MOD5;

    /// Parse a comma-separated list such as `"shift,control"`.
    /// Accepts the flag names case-insensitively plus `alt` and `altgr`.
    pub fn parse_list(list: &str) -> Option<Self> {
        let mut mods = Self::empty();
        for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let upper = name.to_ascii_uppercase();
            let flag = match upper.as_str() {
                "ALT" => Self::ALT,
                "ALTGR" | "LEVEL3" => Self::LEVEL3,
                "CTRL" => Self::CONTROL,
                other => Self::from_name(other)?,
            };
            mods |= flag;
        }
        Some(mods)
    }
}

pub const VOID_SYMBOL: u32 = keysyms::KEY_VoidSymbol;

pub const SPACE: u32 = keysyms::KEY_space;
pub const ASCIITILDE: u32 = keysyms::KEY_asciitilde;

pub const ISO_LEVEL3_SHIFT: u32 = keysyms::KEY_ISO_Level3_Shift;
pub const ISO_LEFT_TAB: u32 = keysyms::KEY_ISO_Left_Tab;
pub const BACKSPACE: u32 = keysyms::KEY_BackSpace;
pub const TAB: u32 = keysyms::KEY_Tab;
pub const RETURN: u32 = keysyms::KEY_Return;
pub const ESCAPE: u32 = keysyms::KEY_Escape;
pub const LEFT: u32 = keysyms::KEY_Left;
pub const MENU: u32 = keysyms::KEY_Menu;
pub const KP_1: u32 = keysyms::KEY_KP_1;
pub const KP_END: u32 = keysyms::KEY_KP_End;
pub const F1: u32 = keysyms::KEY_F1;
pub const SHIFT_L: u32 = keysyms::KEY_Shift_L;
pub const CONTROL_L: u32 = keysyms::KEY_Control_L;
pub const CONTROL_R: u32 = keysyms::KEY_Control_R;
pub const CAPS_LOCK: u32 = keysyms::KEY_Caps_Lock;
pub const ALT_R: u32 = keysyms::KEY_Alt_R;
pub const SUPER_L: u32 = keysyms::KEY_Super_L;
pub const HYPER_R: u32 = keysyms::KEY_Hyper_R;
pub const DELETE: u32 = keysyms::KEY_Delete;

const UNICODE_KEYSYM_FLAG: u32 = 0x0100_0000;

/// Shift, Control, Caps/Shift Lock, Meta, Alt, Super and Hyper keys.
pub fn is_modifier(keyval: u32) -> bool {
    (SHIFT_L..=HYPER_R).contains(&keyval)
}

/// `space` through `asciitilde`.
pub fn is_printable_ascii(keyval: u32) -> bool {
    (SPACE..=ASCIITILDE).contains(&keyval)
}

/// Canonical host name of a keysym.
///
/// Directly encoded Unicode keysyms render as `U+XXXX` and values xkb has no
/// name for as hex. Only `0` has no name.
pub fn keyval_name(keyval: u32) -> Option<String> {
    if keyval == 0 {
        return None;
    }
    if keyval & 0xff00_0000 == UNICODE_KEYSYM_FLAG {
        return Some(format!("U+{:04X}", keyval & 0x00ff_ffff));
    }
    let name = xkb::keysym_get_name(xkb::Keysym::new(keyval));
    if name.is_empty() || name.starts_with("0x") {
        return Some(format!("{keyval:#x}"));
    }
    Some(name)
}

/// Inverse of [`keyval_name`]. A single printable ASCII character maps to
/// itself.
pub fn keyval_from_name(name: &str) -> Option<u32> {
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if is_printable_ascii(c as u32) {
            return Some(c as u32);
        }
    }
    if let Some(hex) = name.strip_prefix("U+") {
        return u32::from_str_radix(hex, 16)
            .ok()
            .map(|v| v | UNICODE_KEYSYM_FLAG);
    }
    if let Some(hex) = name.strip_prefix("0x") {
        return u32::from_str_radix(hex, 16).ok();
    }
    let sym = xkb::keysym_from_name(name, xkb::KEYSYM_NO_FLAGS).raw();
    (sym != keysyms::KEY_NoSymbol).then_some(sym)
}
