use std::fs;
use std::path::PathBuf;

use color_eyre::eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};
use supplyfs_platform::sysfs::POWER_SUPPLY_PATH;
use supplyfs_property::{ExtensionProperty, ExtensionSet, Registry, RegistryBuilder};
use tracing::Level;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "off" => LogLevel::Off,
            "error" => LogLevel::Error,
            "info" => LogLevel::Info,
            "debug" => LogLevel::Debug,
            "trace" => LogLevel::Trace,
            _ => LogLevel::Warn,
        }
    }

    pub fn as_tracing_level(&self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn default_sysfs_root() -> PathBuf {
    PathBuf::from(POWER_SUPPLY_PATH)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    #[serde(default = "default_sysfs_root")]
    pub sysfs_root: PathBuf,
    pub log_level: LogLevel,
    /// Built-in vendor property sets to append to the registry.
    pub extensions: Vec<ExtensionSet>,
    /// Additional vendor properties, appended after the sets.
    #[serde(rename = "extension")]
    pub custom_extensions: Vec<ExtensionProperty>,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            sysfs_root: default_sysfs_root(),
            log_level: LogLevel::Warn,
            extensions: Vec::new(),
            custom_extensions: Vec::new(),
        }
    }
}

pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join("supplyfs")
}

pub fn runtime_dir() -> PathBuf {
    dirs::runtime_dir()
        .or_else(dirs::cache_dir)
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("supplyfs")
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

impl UserConfig {
    pub fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => Self::parse(&content).unwrap_or_else(|e| {
                eprintln!("Warning: ignoring invalid config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn save(&self) -> std::io::Result<()> {
        fs::create_dir_all(config_dir())?;
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        fs::write(config_path(), content)
    }

    pub fn merge_with_args(&mut self, root: Option<PathBuf>, extensions: &[ExtensionSet]) {
        if let Some(root) = root {
            self.sysfs_root = root;
        }
        for set in extensions {
            if !self.extensions.contains(set) {
                self.extensions.push(*set);
            }
        }
    }

    /// Builds the property registry with the configured extensions.
    pub fn registry(&self) -> Result<Registry> {
        let mut builder = RegistryBuilder::new();
        for set in &self.extensions {
            builder = builder.extension_set(*set);
        }
        for property in &self.custom_extensions {
            builder = builder.extension(property);
        }
        builder.build().wrap_err("invalid property extensions")
    }
}
