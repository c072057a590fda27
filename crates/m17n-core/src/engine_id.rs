//! Engine identity: `m17n:<lang>:<variant>` names, class names and the
//! per-engine settings path.

use std::fmt;

pub const ENGINE_PREFIX: &str = "m17n";
pub const CLASS_PREFIX: &str = "IBusM17N";
pub const CLASS_SUFFIX: &str = "Engine";
const SETTINGS_ROOT: &str = "/org/freedesktop/ibus/engine/m17n";

/// Input methods whose backend metadata is registered under an upper-case
/// variant name (the `sa-IAST` data file). Title and icon lookup retries
/// these in upper case; no other engine gets the retry.
const UPPERCASE_VARIANT_EXCEPTIONS: &[(&str, &str)] = &[("sa", "iast")];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EngineNameError {
    #[error("engine name must start with \"{ENGINE_PREFIX}:\": {0}")]
    BadPrefix(String),
    #[error("engine name needs {ENGINE_PREFIX}:<lang>:<variant>: {0}")]
    TooFewFields(String),
    #[error("empty language or variant: {0}")]
    EmptyField(String),
    #[error("not an engine class name: {0}")]
    BadClassName(String),
}

/// A backend language/variant pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EngineId {
    lang: String,
    variant: String,
}

impl EngineId {
    pub fn new(lang: impl Into<String>, variant: impl Into<String>) -> Self {
        Self {
            lang: lang.into(),
            variant: variant.into(),
        }
    }

    /// Parse `m17n:<lang>:<variant>[:...]`. Fields after the third are
    /// ignored.
    pub fn parse(engine_name: &str) -> Result<Self, EngineNameError> {
        let mut fields = engine_name.split(':');
        if fields.next() != Some(ENGINE_PREFIX) {
            return Err(EngineNameError::BadPrefix(engine_name.to_string()));
        }
        let (Some(lang), Some(variant)) = (fields.next(), fields.next()) else {
            return Err(EngineNameError::TooFewFields(engine_name.to_string()));
        };
        Self::checked(lang, variant)
            .map_err(|_| EngineNameError::EmptyField(engine_name.to_string()))
    }

    /// Like [`EngineId::new`], but rejects an empty language or variant.
    pub fn checked(lang: &str, variant: &str) -> Result<Self, EngineNameError> {
        if lang.is_empty() || variant.is_empty() {
            return Err(EngineNameError::EmptyField(format!(
                "{ENGINE_PREFIX}:{lang}:{variant}"
            )));
        }
        Ok(Self::new(lang, variant))
    }

    /// Recover the pair from a generated class name such as
    /// `IBusM17NSiWijesekaraEngine`.
    ///
    /// The variant starts at the last upper-case letter before the `Engine`
    /// suffix and the language at the upper-case letter before that; anything
    /// in front of the language is treated as the class prefix. Only the first
    /// letter of each part is folded back to lower case.
    pub fn from_class_name(class_name: &str) -> Result<Self, EngineNameError> {
        let bad = || EngineNameError::BadClassName(class_name.to_string());
        let body = class_name.strip_suffix(CLASS_SUFFIX).ok_or_else(bad)?;
        let variant_start = body
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_ascii_uppercase())
            .map(|(i, _)| i)
            .filter(|&i| i > 0)
            .ok_or_else(bad)?;
        let lang_start = body[..variant_start]
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_ascii_uppercase())
            .map(|(i, _)| i)
            .ok_or_else(bad)?;
        Ok(Self::new(
            lower_first(&body[lang_start..variant_start]),
            lower_first(&body[variant_start..]),
        ))
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    pub fn variant(&self) -> &str {
        &self.variant
    }

    pub fn engine_name(&self) -> String {
        format!("{ENGINE_PREFIX}:{}:{}", self.lang, self.variant)
    }

    /// `IBusM17N<Lang><Variant>Engine`, each part lower-cased with its first
    /// letter upper-cased.
    pub fn class_name(&self) -> String {
        format!(
            "{CLASS_PREFIX}{}{}{CLASS_SUFFIX}",
            capitalize(&self.lang),
            capitalize(&self.variant)
        )
    }

    /// Settings namespace for this engine, with a trailing slash.
    pub fn settings_path(&self) -> String {
        format!("{SETTINGS_ROOT}/{}/{}/", self.lang, self.variant)
    }

    /// Variant spelling to retry when backend metadata lookup fails, if this
    /// engine is listed as an exception.
    pub fn metadata_retry(&self) -> Option<Self> {
        UPPERCASE_VARIANT_EXCEPTIONS
            .iter()
            .any(|&(lang, variant)| lang == self.lang && variant == self.variant)
            .then(|| Self::new(self.lang.clone(), self.variant.to_ascii_uppercase()))
    }
}

impl fmt::Display for EngineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{ENGINE_PREFIX}:{}:{}", self.lang, self.variant)
    }
}

fn capitalize(s: &str) -> String {
    let lower = s.to_ascii_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}
