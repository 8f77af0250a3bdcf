pub mod commands;
pub mod controller;
pub mod models;
pub mod store;

pub use controller::SettingsController;
pub use models::settings::{SettingsField, SettingsRecord};
pub use models::validation::{ValidationError, ValidationRule};
pub use store::{JsonFileStore, SettingsStore, StoreError};

/// Install the `env_logger` backend for the `log` facade. Honours `RUST_LOG`.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
