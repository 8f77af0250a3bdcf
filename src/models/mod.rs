pub mod budget_status;
pub mod settings;
pub mod validation;
