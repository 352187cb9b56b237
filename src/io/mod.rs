pub mod cli;
pub mod config_loader;
pub mod scene_settings;
