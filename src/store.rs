use crate::models::settings::SettingsRecord;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

const SETTINGS_FILE_NAME: &str = "settings.json";
const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("settings not found at {}", .0.display())]
    Missing(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("write rejected: {0}")]
    Rejected(String),
}

/// Durable home of the settings record.
///
/// `put` must apply all six fields or none of them.
pub trait SettingsStore {
    fn get(&self) -> Result<SettingsRecord, StoreError>;
    fn put(&self, settings: &SettingsRecord) -> Result<(), StoreError>;
}

impl<S: SettingsStore + ?Sized> SettingsStore for &S {
    fn get(&self) -> Result<SettingsRecord, StoreError> {
        (**self).get()
    }

    fn put(&self, settings: &SettingsRecord) -> Result<(), StoreError> {
        (**self).put(settings)
    }
}

/// Stores settings as pretty-printed JSON in `<dir>/settings.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(SETTINGS_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonFileStore {
    fn get(&self) -> Result<SettingsRecord, StoreError> {
        if !self.path.exists() {
            return Err(StoreError::Missing(self.path.clone()));
        }
        let raw = fs::read_to_string(&self.path)?;
        let value: Value =
            serde_json::from_str(&raw).map_err(|e| StoreError::Serde(e.to_string()))?;
        if !value.is_object() {
            return Err(StoreError::Serde(
                "settings.json must hold a JSON object".to_string(),
            ));
        }
        Ok(SettingsRecord::from_value(&value))
    }

    fn put(&self, settings: &SettingsRecord) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        // JSON has no NaN; serde_json would silently write null.
        if !all_finite(settings) {
            return Err(StoreError::Rejected(
                "settings contain non-numeric values".to_string(),
            ));
        }
        let raw = serde_json::to_string_pretty(settings)
            .map_err(|e| StoreError::Serde(e.to_string()))?;
        let tmp = tmp_path(&self.path);
        fs::write(&tmp, raw)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

fn all_finite(settings: &SettingsRecord) -> bool {
    [
        settings.threshold_under_budget,
        settings.threshold_on_track,
        settings.notify_approaching_percent,
        settings.notify_over_budget_percent,
    ]
    .iter()
    .all(|v| v.is_finite())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(".");
    os.push(TMP_SUFFIX);
    PathBuf::from(os)
}
