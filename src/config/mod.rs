pub mod paths;
pub mod settings;

pub use settings::{MockDefaults, PluginSettings, SftpDefaults};
