/// Bot configuration loading from config.toml
pub mod app;

pub use app::{AppConfig, load_app_configuration};
