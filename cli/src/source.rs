use std::path::PathBuf;

use color_eyre::eyre::{eyre, Result};
use supplyfs_platform::{sysfs, SimulatedSupply};
use supplyfs_property::{PowerSupply, Registry};

pub type Supply = Box<dyn PowerSupply>;

/// Where supplies are loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Sysfs(PathBuf),
    Fixture(PathBuf),
}

impl Source {
    pub fn load_all(&self, registry: &Registry) -> Result<Vec<Supply>> {
        match self {
            Source::Sysfs(root) => Ok(sysfs::discover(registry, root)?
                .into_iter()
                .map(|s| Box::new(s) as Supply)
                .collect()),
            Source::Fixture(path) => Ok(SimulatedSupply::load(registry, path)?
                .into_iter()
                .map(|s| Box::new(s) as Supply)
                .collect()),
        }
    }

    pub fn find(&self, registry: &Registry, name: &str) -> Result<Supply> {
        match self {
            Source::Sysfs(root) => Ok(Box::new(sysfs::find(registry, root, name)?)),
            Source::Fixture(path) => SimulatedSupply::load(registry, path)?
                .into_iter()
                .find(|s| s.desc().name() == name)
                .map(|s| Box::new(s) as Supply)
                .ok_or_else(|| eyre!("no power supply named `{}` in {}", name, path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use supplyfs_property::{PropertyId, Value};

    use super::*;

    const FIXTURE: &str = r#"
[[supply]]
name = "batt0"
type = "Battery"
[supply.values]
capacity = 42

[[supply]]
name = "usb"
type = "USB"
[supply.values]
online = 1
"#;

    #[test]
    fn test_fixture_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("supplies.toml");
        fs::write(&path, FIXTURE).unwrap();

        let source = Source::Fixture(path);
        let registry = Registry::standard();
        let names: Vec<String> = source
            .load_all(registry)
            .unwrap()
            .iter()
            .map(|s| s.desc().name().to_string())
            .collect();
        assert_eq!(names, vec!["batt0", "usb"]);

        let usb = source.find(registry, "usb").unwrap();
        assert_eq!(usb.desc().name(), "usb");
        assert!(source.find(registry, "ac").is_err());
    }

    #[test]
    fn test_sysfs_source() {
        let root = tempfile::tempdir().unwrap();
        let bat = root.path().join("BAT0");
        fs::create_dir(&bat).unwrap();
        fs::write(bat.join("type"), "Battery\n").unwrap();
        fs::write(bat.join("capacity"), "88\n").unwrap();

        let source = Source::Sysfs(root.path().to_path_buf());
        let supply = source.find(Registry::standard(), "BAT0").unwrap();
        assert_eq!(
            supply.get_property(PropertyId::CAPACITY).unwrap(),
            Value::Int(88)
        );
    }
}
