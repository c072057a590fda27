//! Engine defaults loaded from TOML, plus the persisted per-engine store.
//!
//! - `init_custom(toml_content)` sets a custom TOML before the first
//!   `settings()` call
//! - `settings()` returns `&'static Settings` (lazy-init singleton)
//! - Default values are embedded via `include_str!("default_settings.toml")`

mod config;
mod store;

use std::sync::OnceLock;

use serde::Deserialize;

pub use config::{
    Color, ConfigHandle, ConfigKey, EngineConfig, Orientation, PreeditFocusMode, SettingValue,
    UnderlineStyle,
};
pub use store::SettingsStore;

use crate::engine_id::EngineId;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

/// Set custom TOML before the first `settings()` call.
pub fn init_custom(toml_content: String) -> Result<(), SettingsError> {
    parse_settings_toml(&toml_content)?;
    CUSTOM_TOML
        .set(toml_content)
        .map_err(|_| SettingsError::AlreadyInitialized)
}

/// Get or initialize the global settings singleton.
pub fn settings() -> &'static Settings {
    static INSTANCE: OnceLock<Settings> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        let toml_str = CUSTOM_TOML
            .get()
            .map(|s| s.as_str())
            .unwrap_or(DEFAULT_SETTINGS_TOML);
        parse_settings_toml(toml_str).expect("settings TOML must be valid")
    })
}

/// Returns the embedded default settings TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("unknown setting key: {0}")]
    UnknownKey(String),
    #[error("settings already initialized")]
    AlreadyInitialized,
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub defaults: DefaultSettings,
    pub highlight: HighlightSettings,
    #[serde(default)]
    pub engine: Vec<EngineOverride>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DefaultSettings {
    pub preedit_highlight: bool,
    pub preedit_underline: i64,
    pub lookup_table_orientation: i64,
    pub preedit_focus_mode: i64,
    pub use_us_layout: bool,
    #[serde(default)]
    pub setup_command: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HighlightSettings {
    pub foreground: String,
    pub background: String,
}

/// Overrides for engines whose name matches `pattern`.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineOverride {
    pub pattern: String,
    pub preedit_highlight: Option<bool>,
    pub preedit_underline: Option<i64>,
    pub lookup_table_orientation: Option<i64>,
    pub preedit_focus_mode: Option<i64>,
    pub use_us_layout: Option<bool>,
}

impl Settings {
    /// Configuration an engine starts with before any stored values are
    /// applied. Highlighting selects the `[highlight]` colors; otherwise both
    /// colors are unset.
    pub fn engine_defaults(&self, id: &EngineId) -> EngineConfig {
        let name = id.engine_name();
        let d = &self.defaults;
        let mut highlight = d.preedit_highlight;
        let mut underline = d.preedit_underline;
        let mut orientation = d.lookup_table_orientation;
        let mut focus_mode = d.preedit_focus_mode;
        let mut use_us_layout = d.use_us_layout;
        let matching = self.engine.iter().filter(|o| {
            glob::Pattern::new(&o.pattern).is_ok_and(|p| p.matches(&name))
        });
        for o in matching {
            highlight = o.preedit_highlight.unwrap_or(highlight);
            underline = o.preedit_underline.unwrap_or(underline);
            orientation = o.lookup_table_orientation.unwrap_or(orientation);
            focus_mode = o.preedit_focus_mode.unwrap_or(focus_mode);
            use_us_layout = o.use_us_layout.unwrap_or(use_us_layout);
        }

        // Ordinals were range-checked by `validate`.
        let fallback = EngineConfig::default();
        EngineConfig {
            preedit_foreground: highlight
                .then(|| Color::parse(&self.highlight.foreground))
                .flatten(),
            preedit_background: highlight
                .then(|| Color::parse(&self.highlight.background))
                .flatten(),
            preedit_underline: UnderlineStyle::from_ordinal(underline)
                .unwrap_or(fallback.preedit_underline),
            lookup_table_orientation: Orientation::from_ordinal(orientation)
                .unwrap_or(fallback.lookup_table_orientation),
            preedit_focus_mode: PreeditFocusMode::from_ordinal(focus_mode)
                .unwrap_or(fallback.preedit_focus_mode),
            use_us_layout,
        }
    }

    pub fn setup_command(&self) -> Option<&str> {
        self.defaults
            .setup_command
            .as_deref()
            .filter(|c| !c.is_empty())
    }
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let s: Settings = toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    Ok(s)
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    macro_rules! check_ordinal {
        ($ty:ident, $value:expr, $field:expr) => {
            if $ty::from_ordinal($value).is_none() {
                return Err(SettingsError::InvalidValue {
                    field: $field.to_string(),
                    reason: format!("{} is not a valid {}", $value, stringify!($ty)),
                });
            }
        };
    }
    macro_rules! check_color {
        ($field:ident) => {
            let value = &s.highlight.$field;
            if Color::parse(value).is_none() {
                return Err(SettingsError::InvalidValue {
                    field: concat!("highlight.", stringify!($field)).to_string(),
                    reason: format!("{value:?} is not #rrggbb"),
                });
            }
        };
    }

    check_ordinal!(UnderlineStyle, s.defaults.preedit_underline, "defaults.preedit_underline");
    check_ordinal!(
        Orientation,
        s.defaults.lookup_table_orientation,
        "defaults.lookup_table_orientation"
    );
    check_ordinal!(
        PreeditFocusMode,
        s.defaults.preedit_focus_mode,
        "defaults.preedit_focus_mode"
    );
    check_color!(foreground);
    check_color!(background);

    for (i, o) in s.engine.iter().enumerate() {
        if o.pattern.is_empty() {
            return Err(SettingsError::InvalidValue {
                field: format!("engine[{i}].pattern"),
                reason: "must not be empty".to_string(),
            });
        }
        glob::Pattern::new(&o.pattern).map_err(|e| SettingsError::InvalidValue {
            field: format!("engine[{i}].pattern"),
            reason: e.to_string(),
        })?;
        if let Some(v) = o.preedit_underline {
            check_ordinal!(UnderlineStyle, v, format!("engine[{i}].preedit_underline"));
        }
        if let Some(v) = o.lookup_table_orientation {
            check_ordinal!(
                Orientation,
                v,
                format!("engine[{i}].lookup_table_orientation")
            );
        }
        if let Some(v) = o.preedit_focus_mode {
            check_ordinal!(PreeditFocusMode, v, format!("engine[{i}].preedit_focus_mode"));
        }
    }

    Ok(())
}
