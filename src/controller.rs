use crate::models::settings::{SettingsField, SettingsRecord};
use crate::models::validation::{self, ValidationError};
use crate::store::SettingsStore;
use log::{debug, info, warn};

/// Owns the settings being edited in one settings dialog.
///
/// `working` mirrors the form; `clean` is the last record known to match the
/// store. One controller per dialog, handed to the UI layer by its owner.
#[derive(Debug)]
pub struct SettingsController<S> {
    store: S,
    working: SettingsRecord,
    clean: Option<SettingsRecord>,
}

impl<S: SettingsStore> SettingsController<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            working: SettingsRecord::default(),
            clean: None,
        }
    }

    /// Starts editing from `working` without reading the store first.
    pub fn with_working(store: S, working: SettingsRecord) -> Self {
        Self {
            store,
            working,
            clean: None,
        }
    }

    /// Read the persisted record. Falls back to defaults on any failure.
    pub fn load(&mut self) -> SettingsRecord {
        let loaded = match self.store.get() {
            Ok(settings) => {
                let errors = validation::validate(&settings);
                if errors.is_empty() {
                    settings
                } else {
                    warn!(
                        "Invalid settings loaded, using defaults: {:?}",
                        validation::messages(&errors)
                    );
                    SettingsRecord::default()
                }
            }
            Err(e) => {
                warn!("Failed to load settings, using defaults: {e}");
                SettingsRecord::default()
            }
        };

        self.working = loaded.clone();
        self.clean = Some(loaded.clone());
        loaded
    }

    /// Apply raw form input to the working copy. Unknown names are ignored.
    pub fn update_field(&mut self, name: &str, raw_value: &str) {
        match name.parse::<SettingsField>() {
            Ok(field) => self.working.apply_raw(field, raw_value),
            Err(e) => warn!("Ignoring form update: {e}"),
        }
    }

    pub fn validate(&self) -> Vec<ValidationError> {
        validation::validate(&self.working)
    }

    /// Persist the working copy if it is valid.
    ///
    /// Nothing reaches the store while any rule is violated. A store failure
    /// leaves both `working` and `clean` untouched.
    pub fn save(&mut self) -> Result<(), Vec<ValidationError>> {
        let errors = self.validate();
        if !errors.is_empty() {
            debug!("Save blocked by {} validation error(s)", errors.len());
            return Err(errors);
        }

        self.store.put(&self.working).map_err(|e| {
            warn!("Failed to save settings: {e}");
            vec![ValidationError::persistence(e)]
        })?;

        info!("Settings saved");
        self.clean = Some(self.working.clone());
        Ok(())
    }

    /// Replace the working copy with defaults. The store and `clean` are untouched.
    pub fn reset(&mut self) -> SettingsRecord {
        self.working = SettingsRecord::default();
        self.working.clone()
    }

    /// Close without saving; unsaved edits are dropped with the controller.
    pub fn discard(self) {
        if self.is_dirty() {
            debug!("Discarding unsaved settings edits");
        }
    }

    pub fn is_notification_section_enabled(&self) -> bool {
        self.working.notifications_enabled
    }

    /// Notification percentages are greyed out, not hidden, when the section is off.
    pub fn is_field_editable(&self, field: SettingsField) -> bool {
        !field.is_notification_field() || self.is_notification_section_enabled()
    }

    pub fn is_dirty(&self) -> bool {
        self.clean.as_ref() != Some(&self.working)
    }

    pub fn working(&self) -> &SettingsRecord {
        &self.working
    }

    pub fn clean(&self) -> Option<&SettingsRecord> {
        self.clean.as_ref()
    }
}
