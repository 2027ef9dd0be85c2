use color_eyre::eyre::Result;
use supplyfs_property::{ExtensionSet, Registry};

use crate::config::{config_path, runtime_dir, UserConfig};

pub fn run(path: bool, reset: bool) -> Result<()> {
    let config_file = config_path();

    if path {
        println!("{}", config_file.display());
        return Ok(());
    }

    if reset {
        UserConfig::default().save()?;
        println!("Config reset to defaults at: {}", config_file.display());
        return Ok(());
    }

    let config = UserConfig::load();
    println!("Config file:   {}", config_file.display());
    println!("Log directory: {}", runtime_dir().display());
    println!();
    println!("{}", toml::to_string_pretty(&config)?);
    println!("{}", registry_summary(&config));
    println!("Extension sets: {}", extension_sets());

    Ok(())
}

/// Property count of the registry the config resolves to, or why it fails.
fn registry_summary(config: &UserConfig) -> String {
    match config.registry() {
        Ok(registry) => format!(
            "Registry: {} properties ({} standard, {} from extensions)",
            registry.len(),
            Registry::standard_len(),
            registry.len() - Registry::standard_len()
        ),
        Err(e) => format!("Registry: invalid extensions: {e:#}"),
    }
}

fn extension_sets() -> String {
    ExtensionSet::ALL
        .iter()
        .map(|set| format!("{} ({})", set.name(), set.properties().len()))
        .collect::<Vec<_>>()
        .join(", ")
}
