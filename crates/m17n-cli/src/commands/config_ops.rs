use std::fs;
use std::path::Path;
use std::process;

use m17n_core::settings::{self, ConfigKey, SettingsStore};
use m17n_core::EngineId;

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

fn open(engine_name: &str, file: &Path) -> (EngineId, SettingsStore) {
    let id = die!(EngineId::parse(engine_name), "Error: {}");
    let store = die!(SettingsStore::load(file), "Error opening settings store: {}");
    (id, store)
}

/// Effective configuration of one engine; stored values are marked `*`.
pub fn config_show(engine_name: &str, file: &Path) {
    let (id, store) = open(engine_name, file);
    let config = store.overlay(&id, settings::settings().engine_defaults(&id));
    println!("[{}]", id.settings_path());
    for key in ConfigKey::ALL {
        let mark = if store.get(&id, key).is_some() { "*" } else { " " };
        println!("{mark} {key} = {}", config.value_of(key));
    }
    println!(
        "  preedit-focus-mode = {}",
        config.preedit_focus_mode.ordinal()
    );
}

pub fn config_set(engine_name: &str, key: &str, value: &str, file: &Path) {
    let (id, mut store) = open(engine_name, file);
    let key: ConfigKey = die!(key.parse(), "Error: {}");
    let value = die!(key.parse_value(value), "Error: {}");
    die!(store.set(&id, key, value.clone()), "Error: {}");
    die!(store.save(), "Error saving settings store: {}");
    println!("{id}: {key} = {value}");
}

pub fn config_unset(engine_name: &str, key: &str, file: &Path) {
    let (id, mut store) = open(engine_name, file);
    let key: ConfigKey = die!(key.parse(), "Error: {}");
    match store.unset(&id, key) {
        Some(old) => {
            die!(store.save(), "Error saving settings store: {}");
            println!("{id}: {key} unset (was {old})");
        }
        None => println!("{id}: {key} not set"),
    }
}

pub fn settings_export() {
    print!("{}", settings::default_toml());
}

pub fn settings_validate(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let s = die!(settings::parse_settings_toml(&content), "Error: {}");
    println!(
        "OK: {} engine overrides, setup_command={}",
        s.engine.len(),
        s.setup_command().unwrap_or("(none)")
    );
}
