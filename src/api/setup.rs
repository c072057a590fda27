//! Preferences model: load an engine's settings and backend variables into
//! an editable form, and write them back.

use tracing::debug;

use m17n_core::settings::{ConfigKey, EngineConfig};
use m17n_core::variables::{Variable, VariableValue};
use m17n_core::EngineId;

use super::{EngineError, EngineRegistry};

/// One backend variable with the text currently in its editor field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableField {
    pub variable: Variable,
    pub text: String,
}

impl VariableField {
    fn new(variable: Variable) -> Self {
        let text = variable.value.format();
        Self { variable, text }
    }

    pub fn is_edited(&self) -> bool {
        self.text != self.variable.value.format()
    }

    pub fn parse(&self) -> Result<VariableValue, EngineError> {
        VariableValue::parse_as(&self.variable.value, &self.text).map_err(|source| {
            EngineError::Variable {
                key: self.variable.key.clone(),
                source,
            }
        })
    }
}

#[derive(Debug, Clone)]
pub struct SetupForm {
    id: EngineId,
    pub config: EngineConfig,
    pub variables: Vec<VariableField>,
}

impl SetupForm {
    /// Stored values where present, built-in defaults otherwise, plus the
    /// backend's variables for the engine.
    pub fn load(registry: &EngineRegistry, id: &EngineId) -> Result<Self, EngineError> {
        let variables = registry
            .backend()
            .variables(id)?
            .into_iter()
            .map(VariableField::new)
            .collect();
        Ok(Self {
            id: id.clone(),
            config: registry.resolve_config(id),
            variables,
        })
    }

    pub fn id(&self) -> &EngineId {
        &self.id
    }

    /// Set the editor text of variable `key`. Returns false when the engine
    /// has no such variable.
    pub fn set_variable_text(&mut self, key: &str, text: impl Into<String>) -> bool {
        match self.variables.iter_mut().find(|f| f.variable.key == key) {
            Some(field) => {
                field.text = text.into();
                true
            }
            None => false,
        }
    }

    /// Write every setting to the store and persist it, notify running
    /// engines, then push edited variables to the backend and save its
    /// configuration.
    ///
    /// Variables are all parsed before anything is written, so a malformed
    /// entry leaves both the store and the backend untouched.
    pub fn save(&self, registry: &EngineRegistry) -> Result<(), EngineError> {
        let edited = self
            .variables
            .iter()
            .filter(|f| f.is_edited())
            .map(|f| Ok((f.variable.key.as_str(), f.parse()?)))
            .collect::<Result<Vec<_>, EngineError>>()?;

        registry.with_store(|store| {
            for key in ConfigKey::ALL {
                store.set(&self.id, key, self.config.value_of(key))?;
            }
            store.save()
        })?;
        for key in ConfigKey::ALL {
            registry.config_changed(&self.id, key, &self.config.value_of(key))?;
        }

        if edited.is_empty() {
            return Ok(());
        }
        let backend = registry.backend();
        for (key, value) in &edited {
            backend.config_variable(&self.id, key, value)?;
            debug!(engine = %self.id, key, kind = value.kind(), %value, "variable configured");
        }
        backend.save_config()?;
        Ok(())
    }
}
