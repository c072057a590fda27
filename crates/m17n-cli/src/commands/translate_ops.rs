use std::process;

use serde::Serialize;

use m17n_core::keymap::{Keymap, UsKeymap};
use m17n_core::keysym;
use m17n_core::{translate, Modifiers};

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Translation {
    pub keyval: u32,
    pub keycode: u16,
    pub modifiers: Vec<String>,
    /// `None` when the key falls through to the client.
    pub symbol: Option<String>,
}

/// Resolve `key` (a single character or a host key name) and translate it
/// the way the engine does, optionally re-reading the key through the US
/// layout first.
pub fn translate_key(
    key: &str,
    keycode: u16,
    mods: &str,
    us_layout: bool,
) -> Result<Translation, String> {
    let keyval = keysym::keyval_from_name(key).ok_or_else(|| format!("unknown key name {key:?}"))?;
    let modifiers = Modifiers::parse_list(mods).ok_or_else(|| format!("bad modifier list {mods:?}"))?;
    let keymap = UsKeymap::new();
    let keyval = if us_layout {
        keymap.lookup_keysym(keycode, modifiers)
    } else {
        keyval
    };
    let symbol = translate(keycode, keyval, modifiers, &keymap).map(|s| s.name().to_string());
    Ok(Translation {
        keyval,
        keycode,
        modifiers: modifiers
            .iter_names()
            .map(|(name, _)| name.to_ascii_lowercase())
            .collect(),
        symbol,
    })
}

pub fn translate_cmd(key: &str, keycode: u16, mods: &str, us_layout: bool, json: bool) {
    let t = die!(translate_key(key, keycode, mods, us_layout), "Error: {}");
    if json {
        let out = die!(serde_json::to_string_pretty(&t), "Error: {}");
        println!("{out}");
        return;
    }
    match &t.symbol {
        Some(symbol) => println!("{symbol:?}"),
        None => println!("(passthrough)"),
    }
}
