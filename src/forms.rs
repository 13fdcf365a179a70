//! Lookup of stored form definitions.

use crate::error::ConfigError;
use crate::schema::Form;
use ahash::AHashMap;
use async_trait::async_trait;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Loads a form, including its schema snapshot, by id.
#[async_trait]
pub trait FormSource: Send + Sync {
    async fn load(&self, form_id: &str) -> Option<Arc<Form>>;
}

/// Forms held in memory for the lifetime of the process.
#[derive(Default)]
pub struct MemoryFormSource {
    forms: AHashMap<String, Arc<Form>>,
}

impl MemoryFormSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_form(mut self, form: Form) -> Self {
        self.insert(form);
        self
    }

    pub fn insert(&mut self, form: Form) {
        self.forms.insert(form.id.clone(), Arc::new(form));
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    /// Loads a single form record from a JSON file.
    pub fn read_form(path: &Path) -> Result<Form, ConfigError> {
        let display = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display,
            source,
        })?;
        Ok(Form::from_json(&content)?)
    }

    /// Loads every `*.json` form record in `dir`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let dir = dir.as_ref();
        let entries = fs::read_dir(dir).map_err(|source| ConfigError::Io {
            path: dir.display().to_string(),
            source,
        })?;

        let mut source = Self::new();
        for entry in entries {
            let path = entry
                .map_err(|source| ConfigError::Io {
                    path: dir.display().to_string(),
                    source,
                })?
                .path();
            if path.extension().is_some_and(|ext| ext == "json") {
                let form = Self::read_form(&path)?;
                info!(form_id = %form.id, path = %path.display(), "loaded form");
                source.insert(form);
            }
        }
        Ok(source)
    }
}

#[async_trait]
impl FormSource for MemoryFormSource {
    async fn load(&self, form_id: &str) -> Option<Arc<Form>> {
        self.forms.get(form_id).cloned()
    }
}
