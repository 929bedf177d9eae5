//! User preferences that survive restarts: last city, calculation method, theme.
//!
//! Stored as `state.toml` in the configuration directory. Writes go through a
//! temporary file in the same directory followed by a rename, so a crash never
//! leaves a half-written file behind. There are no transactional guarantees
//! beyond that.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::schedule::method::CalculationMethod;

pub const PREFERENCES_FILE_NAME: &str = "state.toml";

/// Everything the preference store remembers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub last_city: Option<String>,
    pub calculation_method: Option<CalculationMethod>,
    pub dark_mode: bool,
}

/// Plain get/set access to persisted preferences.
pub trait PreferenceStore {
    fn load(&self) -> Result<Preferences>;
    fn save(&self, preferences: &Preferences) -> Result<()>;

    fn last_city(&self) -> Result<Option<String>> {
        Ok(self.load()?.last_city)
    }

    fn set_last_city(&self, city: &str) -> Result<()> {
        let mut preferences = self.load()?;
        preferences.last_city = Some(city.trim().to_string());
        self.save(&preferences)
    }

    fn calculation_method(&self) -> Result<Option<CalculationMethod>> {
        Ok(self.load()?.calculation_method)
    }

    fn set_calculation_method(&self, method: CalculationMethod) -> Result<()> {
        let mut preferences = self.load()?;
        preferences.calculation_method = Some(method);
        self.save(&preferences)
    }

    fn dark_mode(&self) -> Result<bool> {
        Ok(self.load()?.dark_mode)
    }

    fn set_dark_mode(&self, enabled: bool) -> Result<()> {
        let mut preferences = self.load()?;
        preferences.dark_mode = enabled;
        self.save(&preferences)
    }
}

/// `state.toml` on disk.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store next to the active `waqt.toml`.
    pub fn in_config_dir() -> Result<Self> {
        let dir = crate::config::get_config_dir()?;
        Ok(Self::new(dir.join(PREFERENCES_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn load(&self) -> Result<Preferences> {
        if !self.path.exists() {
            return Ok(Preferences::default());
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read preferences from {}", self.path.display()))?;
        match toml::from_str(&content) {
            Ok(preferences) => Ok(preferences),
            Err(e) => {
                log_warning!(
                    "Ignoring unreadable preferences at {}: {e}",
                    self.path.display()
                );
                Ok(Preferences::default())
            }
        }
    }

    fn save(&self, preferences: &Preferences) -> Result<()> {
        let dir = self
            .path
            .parent()
            .context("Preferences path has no parent directory")?;
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;

        let content =
            toml::to_string_pretty(preferences).context("Failed to serialize preferences")?;
        let mut temp = tempfile::NamedTempFile::new_in(dir)
            .context("Failed to create temporary preferences file")?;
        temp.write_all(content.as_bytes())
            .context("Failed to write preferences")?;
        temp.persist(&self.path)
            .with_context(|| format!("Failed to save preferences to {}", self.path.display()))?;

        log_debug!("Saved preferences to {}", self.path.display());
        Ok(())
    }
}

/// Process-lifetime store for tests and `--json` runs.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    inner: Mutex<Preferences>,
}

impl MemoryPreferenceStore {
    pub fn new(initial: Preferences) -> Self {
        Self {
            inner: Mutex::new(initial),
        }
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> Result<Preferences> {
        Ok(self
            .inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone())
    }

    fn save(&self, preferences: &Preferences) -> Result<()> {
        *self.inner.lock().unwrap_or_else(|e| e.into_inner()) = preferences.clone();
        Ok(())
    }
}

impl<P: PreferenceStore + ?Sized> PreferenceStore for Box<P> {
    fn load(&self) -> Result<Preferences> {
        (**self).load()
    }

    fn save(&self, preferences: &Preferences) -> Result<()> {
        (**self).save(preferences)
    }
}

impl<P: PreferenceStore + ?Sized> PreferenceStore for Arc<P> {
    fn load(&self) -> Result<Preferences> {
        (**self).load()
    }

    fn save(&self, preferences: &Preferences) -> Result<()> {
        (**self).save(preferences)
    }
}
