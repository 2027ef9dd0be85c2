pub mod attr;
pub mod config;
pub mod list;
pub mod props;
pub mod uevent;
pub mod watch;

use std::path::PathBuf;

use color_eyre::eyre::Result;
use supplyfs_property::Registry;

use crate::config::UserConfig;
use crate::source::Source;

/// The registry and supply source every supply command works against.
pub struct Context {
    pub registry: Registry,
    pub source: Source,
}

impl Context {
    pub fn new(config: &UserConfig, fixture: Option<PathBuf>) -> Result<Self> {
        let registry = config.registry()?;
        let source = match fixture {
            Some(path) => Source::Fixture(path),
            None => Source::Sysfs(config.sysfs_root.clone()),
        };
        tracing::debug!(?source, properties = registry.len(), "registry ready");
        Ok(Self { registry, source })
    }
}
