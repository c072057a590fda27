//! Persisted per-engine setting values.
//!
//! The on-disk form is a TOML table per engine settings path:
//!
//! ```toml
//! ["/org/freedesktop/ibus/engine/m17n/si/wijesekara/"]
//! preedit-foreground = "#ff0000"
//! use-us-layout = true
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::config::{ConfigKey, EngineConfig, SettingValue};
use super::SettingsError;
use crate::engine_id::EngineId;

type Document = BTreeMap<String, BTreeMap<String, SettingValue>>;

#[derive(Debug, Clone, Default)]
pub struct SettingsStore {
    path: Option<PathBuf>,
    values: Document,
}

impl SettingsStore {
    /// An empty store that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load from `path`. A missing file is an empty store that will be
    /// created on the first `save`.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(text) => Self::parse(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Document::new(),
            Err(source) => return Err(io_error(&path, source)),
        };
        debug!(path = %path.display(), engines = values.len(), "settings store loaded");
        Ok(Self {
            path: Some(path),
            values,
        })
    }

    fn parse(text: &str) -> Result<Document, SettingsError> {
        let doc: Document = toml::from_str(text).map_err(|e| SettingsError::Parse(e.to_string()))?;
        for (section, entries) in &doc {
            for (key, value) in entries {
                let key: ConfigKey = key.parse()?;
                EngineConfig::default()
                    .apply(key, value)
                    .map_err(|e| SettingsError::InvalidValue {
                        field: format!("{section}{key}"),
                        reason: e.to_string(),
                    })?;
            }
        }
        Ok(doc)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Write the store back to the file it was loaded from. In-memory
    /// stores are left alone.
    pub fn save(&self) -> Result<(), SettingsError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let text = self.to_toml()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
        }
        fs::write(path, text).map_err(|e| io_error(path, e))?;
        debug!(path = %path.display(), "settings store saved");
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, SettingsError> {
        toml::to_string(&self.values).map_err(|e| SettingsError::Parse(e.to_string()))
    }

    pub fn get(&self, id: &EngineId, key: ConfigKey) -> Option<&SettingValue> {
        self.values.get(&id.settings_path())?.get(key.as_str())
    }

    /// Store `value` for `key` after checking that the key accepts it.
    pub fn set(
        &mut self,
        id: &EngineId,
        key: ConfigKey,
        value: SettingValue,
    ) -> Result<(), SettingsError> {
        EngineConfig::default().apply(key, &value)?;
        self.values
            .entry(id.settings_path())
            .or_default()
            .insert(key.as_str().to_string(), value);
        Ok(())
    }

    /// Remove a stored value; returns what was stored.
    pub fn unset(&mut self, id: &EngineId, key: ConfigKey) -> Option<SettingValue> {
        let path = id.settings_path();
        let entries = self.values.get_mut(&path)?;
        let removed = entries.remove(key.as_str());
        if entries.is_empty() {
            self.values.remove(&path);
        }
        removed
    }

    /// Every stored value for `id`, in key order.
    pub fn entries(&self, id: &EngineId) -> Vec<(ConfigKey, SettingValue)> {
        let Some(entries) = self.values.get(&id.settings_path()) else {
            return Vec::new();
        };
        entries
            .iter()
            .filter_map(|(k, v)| Some((k.parse().ok()?, v.clone())))
            .collect()
    }

    /// `defaults` with every stored value for `id` applied.
    pub fn overlay(&self, id: &EngineId, defaults: EngineConfig) -> EngineConfig {
        let mut config = defaults;
        for (key, value) in self.entries(id) {
            if let Err(e) = config.apply(key, &value) {
                warn!(engine = %id, %key, error = %e, "ignoring stored value");
            }
        }
        config
    }
}

fn io_error(path: &Path, source: std::io::Error) -> SettingsError {
    SettingsError::Io {
        path: path.display().to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Color, UnderlineStyle};

    fn si() -> EngineId {
        EngineId::new("si", "wijesekara")
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::load(dir.path().join("absent.toml")).unwrap();
        assert!(store.entries(&si()).is_empty());
    }

    #[test]
    fn set_save_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.toml");
        let mut store = SettingsStore::load(&path).unwrap();
        store
            .set(&si(), ConfigKey::PreeditUnderline, SettingValue::Int(2))
            .unwrap();
        store
            .set(
                &si(),
                ConfigKey::PreeditForeground,
                SettingValue::String("#ff0000".into()),
            )
            .unwrap();
        store.save().unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("/org/freedesktop/ibus/engine/m17n/si/wijesekara/"));

        let loaded = SettingsStore::load(&path).unwrap();
        assert_eq!(
            loaded.get(&si(), ConfigKey::PreeditUnderline),
            Some(&SettingValue::Int(2))
        );
        let config = loaded.overlay(&si(), EngineConfig::default());
        assert_eq!(config.preedit_underline, UnderlineStyle::Double);
        assert_eq!(config.preedit_foreground, Some(Color(0xff0000)));
    }

    #[test]
    fn set_rejects_mistyped_value() {
        let mut store = SettingsStore::in_memory();
        assert!(store
            .set(&si(), ConfigKey::UseUsLayout, SettingValue::String("yes".into()))
            .is_err());
        assert!(store.entries(&si()).is_empty());
    }

    #[test]
    fn unset_drops_empty_sections() {
        let mut store = SettingsStore::in_memory();
        store
            .set(&si(), ConfigKey::UseUsLayout, SettingValue::Bool(true))
            .unwrap();
        assert_eq!(
            store.unset(&si(), ConfigKey::UseUsLayout),
            Some(SettingValue::Bool(true))
        );
        assert_eq!(store.unset(&si(), ConfigKey::UseUsLayout), None);
        assert_eq!(store.to_toml().unwrap().trim(), "");
    }

    #[test]
    fn load_rejects_unknown_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.toml");
        fs::write(&path, "[\"/x/\"]\nsymbol-file = \"a\"\n").unwrap();
        assert!(matches!(
            SettingsStore::load(&path),
            Err(SettingsError::UnknownKey(_))
        ));
    }

    #[test]
    fn overlay_skips_bad_stored_value() {
        let mut store = SettingsStore::in_memory();
        store
            .set(&si(), ConfigKey::UseUsLayout, SettingValue::Bool(true))
            .unwrap();
        store
            .values
            .get_mut(&si().settings_path())
            .unwrap()
            .insert("preedit-underline".into(), SettingValue::Int(9));

        let config = store.overlay(&si(), EngineConfig::default());
        assert!(config.use_us_layout);
        assert_eq!(config.preedit_underline, UnderlineStyle::None);
    }

    #[test]
    fn in_memory_save_is_noop() {
        let store = SettingsStore::in_memory();
        assert!(store.path().is_none());
        store.save().unwrap();
    }
}
