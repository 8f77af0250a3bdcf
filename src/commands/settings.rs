use crate::controller::SettingsController;
use crate::models::settings::SettingsRecord;
use crate::models::validation::{self, messages};
use crate::store::JsonFileStore;

/// Load the persisted settings for the dialog. Never fails; falls back to defaults.
pub async fn get_settings(config_dir: String) -> SettingsRecord {
    load_settings_from_disk(&config_dir)
}

/// Validate form values without persisting, for live feedback while editing.
pub async fn validate_settings(settings: SettingsRecord) -> Vec<String> {
    messages(&validation::validate(&settings))
}

pub async fn save_settings(
    config_dir: String,
    settings: SettingsRecord,
) -> Result<SettingsRecord, String> {
    save_settings_to_disk(&config_dir, settings)
}

pub async fn reset_settings() -> SettingsRecord {
    SettingsRecord::default()
}

pub fn load_settings_from_disk(config_dir: &str) -> SettingsRecord {
    SettingsController::new(JsonFileStore::in_dir(config_dir)).load()
}

pub fn save_settings_to_disk(
    config_dir: &str,
    settings: SettingsRecord,
) -> Result<SettingsRecord, String> {
    let mut controller =
        SettingsController::with_working(JsonFileStore::in_dir(config_dir), settings);
    controller
        .save()
        .map_err(|errors| messages(&errors).join(", "))?;
    Ok(controller.working().clone())
}
