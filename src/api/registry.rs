//! Engine classes keyed by engine id, and the factory that builds adapters
//! from them.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use tracing::{debug, warn};

use m17n_core::backend::{resolve_title_icon, Backend, InputMethod};
use m17n_core::settings::{
    ConfigHandle, ConfigKey, EngineConfig, SettingValue, Settings, SettingsStore,
};
use m17n_core::EngineId;
use m17n_session::{EngineAdapter, EngineHost, EngineInfo};

use super::EngineError;

/// Everything shared by the adapters of one engine: identity, title and
/// icon, live configuration, and the backend input method (opened on first
/// use, then reused).
///
/// `id` is the identity the host asked for and the one the backend opens.
/// `settings_id` is the spelling the backend metadata was found under; it
/// names the engine towards the user and keys its stored settings.
pub struct EngineClass {
    id: EngineId,
    settings_id: EngineId,
    info: EngineInfo,
    config: ConfigHandle,
    im: Mutex<Option<Arc<dyn InputMethod>>>,
}

impl EngineClass {
    pub fn id(&self) -> &EngineId {
        &self.id
    }

    pub fn settings_id(&self) -> &EngineId {
        &self.settings_id
    }

    fn answers_to(&self, id: &EngineId) -> bool {
        self.id == *id || self.settings_id == *id
    }

    pub fn info(&self) -> &EngineInfo {
        &self.info
    }

    pub fn class_name(&self) -> String {
        self.id.class_name()
    }

    pub fn config(&self) -> &ConfigHandle {
        &self.config
    }

    fn input_method(&self, backend: &dyn Backend) -> Result<Arc<dyn InputMethod>, EngineError> {
        let mut im = self.im.lock().unwrap();
        if let Some(im) = im.as_ref() {
            return Ok(Arc::clone(im));
        }
        let opened = backend.open(&self.id)?;
        debug!(engine = %self.id, "input method opened");
        *im = Some(Arc::clone(&opened));
        Ok(opened)
    }
}

pub struct EngineRegistry {
    backend: Arc<dyn Backend>,
    settings: Settings,
    store: RwLock<SettingsStore>,
    classes: Mutex<HashMap<EngineId, Arc<EngineClass>>>,
}

impl EngineRegistry {
    pub fn new(backend: Arc<dyn Backend>, settings: Settings, store: SettingsStore) -> Self {
        Self {
            backend,
            settings,
            store: RwLock::new(store),
            classes: Mutex::new(HashMap::new()),
        }
    }

    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Built-in configuration for `id`, ignoring stored values.
    pub fn default_config(&self, id: &EngineId) -> EngineConfig {
        self.settings.engine_defaults(id)
    }

    /// Built-in configuration with stored values applied.
    pub fn resolve_config(&self, id: &EngineId) -> EngineConfig {
        self.store
            .read()
            .unwrap()
            .overlay(id, self.default_config(id))
    }

    pub fn with_store<R>(&self, f: impl FnOnce(&mut SettingsStore) -> R) -> R {
        f(&mut self.store.write().unwrap())
    }

    /// The class for `id`, created on first request.
    pub fn class(&self, id: &EngineId) -> Arc<EngineClass> {
        let mut classes = self.classes.lock().unwrap();
        if let Some(class) = classes.get(id) {
            return Arc::clone(class);
        }
        let (settings_id, meta) = resolve_title_icon(self.backend.as_ref(), id);
        let class = Arc::new(EngineClass {
            id: id.clone(),
            info: EngineInfo {
                engine_name: settings_id.engine_name(),
                title: meta.title,
                icon: meta.icon,
                setup_command: self.settings.setup_command().map(str::to_string),
            },
            config: ConfigHandle::new(self.resolve_config(&settings_id)),
            settings_id,
            im: Mutex::new(None),
        });
        debug!(
            engine = %id,
            settings = %class.settings_id.settings_path(),
            class = %class.class_name(),
            "engine class registered"
        );
        classes.insert(id.clone(), Arc::clone(&class));
        class
    }

    pub fn make_engine<H: EngineHost>(
        &self,
        lang: &str,
        variant: &str,
        host: H,
    ) -> Result<EngineAdapter<H>, EngineError> {
        let id = EngineId::checked(lang, variant)
            .inspect_err(|e| warn!(error = %e, "rejected engine id"))?;
        let class = self.class(&id);
        let im = class
            .input_method(self.backend.as_ref())
            .inspect_err(|e| warn!(engine = %id, error = %e, "cannot create engine"))?;
        Ok(EngineAdapter::new(
            class.info.clone(),
            im.as_ref(),
            class.config.clone(),
            host,
        ))
    }

    /// Build an adapter from an `m17n:<lang>:<variant>` name.
    pub fn make_engine_by_name<H: EngineHost>(
        &self,
        engine_name: &str,
        host: H,
    ) -> Result<EngineAdapter<H>, EngineError> {
        let id = EngineId::parse(engine_name)
            .inspect_err(|e| warn!(engine_name, error = %e, "rejected engine name"))?;
        self.make_engine(id.lang(), id.variant(), host)
    }

    /// Change notification for one key of one engine, addressed by either
    /// its requested or its settings identity. Running adapters see the new
    /// value from their next operation on.
    pub fn config_changed(
        &self,
        id: &EngineId,
        key: ConfigKey,
        value: &SettingValue,
    ) -> Result<(), EngineError> {
        let class = self
            .classes
            .lock()
            .unwrap()
            .values()
            .find(|c| c.answers_to(id))
            .cloned();
        match class {
            Some(class) => {
                class.config.apply(key, value)?;
                debug!(engine = %id, %key, %value, "config changed");
            }
            None => debug!(engine = %id, %key, "config change for unused engine"),
        }
        Ok(())
    }

    /// Change notification addressed by settings path and raw key name, as
    /// a settings backend delivers them. Unknown paths and keys are ignored.
    pub fn settings_changed(
        &self,
        section: &str,
        name: &str,
        value: &SettingValue,
    ) -> Result<(), EngineError> {
        let Ok(key) = name.parse::<ConfigKey>() else {
            debug!(section, name, "ignoring unknown setting");
            return Ok(());
        };
        let class = self
            .classes
            .lock()
            .unwrap()
            .values()
            .find(|c| c.settings_id.settings_path() == section)
            .cloned();
        match class {
            Some(class) => self.config_changed(&class.settings_id, key, value),
            None => Ok(()),
        }
    }
}
