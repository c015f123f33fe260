pub mod app;
pub mod compute;
pub mod db;
pub mod error;
pub mod format;
pub mod i18n;
pub mod model;
pub mod pdf;
pub mod preview;
pub mod template;
pub mod types;
pub mod ui;
