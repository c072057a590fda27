//! Per-engine configuration values and the change-notification protocol.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use super::SettingsError;

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub u32);

impl Color {
    /// Parse `#rrggbb`. `none`, the empty string and malformed input all
    /// yield `None` (attribute unset).
    pub fn parse(s: &str) -> Option<Self> {
        let hex = s.trim().strip_prefix('#')?;
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        u32::from_str_radix(hex, 16).ok().map(Self)
    }

    pub fn rgb(self) -> u32 {
        self.0 & 0x00ff_ffff
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.rgb())
    }
}

fn format_color(c: Option<Color>) -> String {
    c.map_or_else(|| "none".to_string(), |c| c.to_string())
}

macro_rules! ordinal_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $n:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant = $n),+
        }

        impl $name {
            pub fn from_ordinal(n: i64) -> Option<Self> {
                match n {
                    $($n => Some(Self::$variant),)+
                    _ => None,
                }
            }

            pub fn ordinal(self) -> i64 {
                self as i64
            }
        }
    };
}

ordinal_enum!(
    /// Host underline attribute values.
    UnderlineStyle { None = 0, Single = 1, Double = 2, Low = 3, Error = 4 }
);

ordinal_enum!(
    /// Candidate window layout.
    Orientation { Horizontal = 0, Vertical = 1, System = 2 }
);

ordinal_enum!(
    /// What the host does with a pending preedit when focus moves away.
    PreeditFocusMode { Clear = 0, Commit = 1 }
);

/// Display and key-handling options shared by every session of one engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub preedit_foreground: Option<Color>,
    pub preedit_background: Option<Color>,
    pub preedit_underline: UnderlineStyle,
    pub lookup_table_orientation: Orientation,
    pub preedit_focus_mode: PreeditFocusMode,
    pub use_us_layout: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            preedit_foreground: None,
            preedit_background: None,
            preedit_underline: UnderlineStyle::None,
            lookup_table_orientation: Orientation::System,
            preedit_focus_mode: PreeditFocusMode::Commit,
            use_us_layout: false,
        }
    }
}

/// Keys of the change-notification protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConfigKey {
    PreeditForeground,
    PreeditBackground,
    PreeditUnderline,
    LookupTableOrientation,
    UseUsLayout,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 5] = [
        Self::PreeditForeground,
        Self::PreeditBackground,
        Self::PreeditUnderline,
        Self::LookupTableOrientation,
        Self::UseUsLayout,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::PreeditForeground => "preedit-foreground",
            Self::PreeditBackground => "preedit-background",
            Self::PreeditUnderline => "preedit-underline",
            Self::LookupTableOrientation => "lookup-table-orientation",
            Self::UseUsLayout => "use-us-layout",
        }
    }

    /// Parse `text` into a value of the type this key expects.
    pub fn parse_value(self, text: &str) -> Result<SettingValue, SettingsError> {
        let invalid = |reason: &str| SettingsError::InvalidValue {
            field: self.as_str().to_string(),
            reason: reason.to_string(),
        };
        match self {
            Self::PreeditForeground | Self::PreeditBackground => {
                Ok(SettingValue::String(text.trim().to_string()))
            }
            Self::PreeditUnderline | Self::LookupTableOrientation => text
                .trim()
                .parse()
                .map(SettingValue::Int)
                .map_err(|_| invalid("expected an integer")),
            Self::UseUsLayout => text
                .trim()
                .parse()
                .map(SettingValue::Bool)
                .map_err(|_| invalid("expected true or false")),
        }
    }
}

impl FromStr for ConfigKey {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| SettingsError::UnknownKey(s.to_string()))
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored setting value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    String(String),
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl EngineConfig {
    /// Apply one change notification.
    pub fn apply(&mut self, key: ConfigKey, value: &SettingValue) -> Result<(), SettingsError> {
        let invalid = |reason: String| SettingsError::InvalidValue {
            field: key.as_str().to_string(),
            reason,
        };
        match (key, value) {
            (ConfigKey::PreeditForeground, SettingValue::String(s)) => {
                self.preedit_foreground = Color::parse(s);
            }
            (ConfigKey::PreeditBackground, SettingValue::String(s)) => {
                self.preedit_background = Color::parse(s);
            }
            (ConfigKey::PreeditUnderline, SettingValue::Int(n)) => {
                self.preedit_underline = UnderlineStyle::from_ordinal(*n)
                    .ok_or_else(|| invalid(format!("no underline style {n}")))?;
            }
            (ConfigKey::LookupTableOrientation, SettingValue::Int(n)) => {
                self.lookup_table_orientation = Orientation::from_ordinal(*n)
                    .ok_or_else(|| invalid(format!("no orientation {n}")))?;
            }
            (ConfigKey::UseUsLayout, SettingValue::Bool(b)) => {
                self.use_us_layout = *b;
            }
            (_, other) => return Err(invalid(format!("unexpected value {other:?}"))),
        }
        Ok(())
    }

    /// Current value of `key` in its stored form.
    pub fn value_of(&self, key: ConfigKey) -> SettingValue {
        match key {
            ConfigKey::PreeditForeground => {
                SettingValue::String(format_color(self.preedit_foreground))
            }
            ConfigKey::PreeditBackground => {
                SettingValue::String(format_color(self.preedit_background))
            }
            ConfigKey::PreeditUnderline => SettingValue::Int(self.preedit_underline.ordinal()),
            ConfigKey::LookupTableOrientation => {
                SettingValue::Int(self.lookup_table_orientation.ordinal())
            }
            ConfigKey::UseUsLayout => SettingValue::Bool(self.use_us_layout),
        }
    }
}

/// Shared, replaceable configuration for one engine class. Readers take a
/// snapshot per operation.
#[derive(Debug, Clone, Default)]
pub struct ConfigHandle(Arc<RwLock<EngineConfig>>);

impl ConfigHandle {
    pub fn new(config: EngineConfig) -> Self {
        Self(Arc::new(RwLock::new(config)))
    }

    pub fn snapshot(&self) -> EngineConfig {
        *self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn replace(&self, config: EngineConfig) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = config;
    }

    pub fn apply(&self, key: ConfigKey, value: &SettingValue) -> Result<(), SettingsError> {
        let mut next = self.snapshot();
        next.apply(key, value)?;
        self.replace(next);
        Ok(())
    }
}
