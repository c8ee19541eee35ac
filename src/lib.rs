pub mod config;
pub mod forms;
pub mod i18n;
