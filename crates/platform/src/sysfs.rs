use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{eyre, Result, WrapErr};
use supplyfs_property::codec;
use supplyfs_property::{
    DeviceError, PowerSupply, PropertyDescriptor, PropertyId, Registry, SupplyDesc, SupplyType,
    Value, ValueKind,
};
use tracing::debug;

pub const POWER_SUPPLY_PATH: &str = "/sys/class/power_supply";

/// A supply backed by one `power_supply` class directory.
///
/// Every registry entry with a matching file is declared, in registry order.
/// Values are parsed from and written back to those files.
#[derive(Debug)]
pub struct SysfsSupply {
    dir: PathBuf,
    desc: SupplyDesc,
    attrs: HashMap<PropertyId, PropertyDescriptor>,
}

impl SysfsSupply {
    pub fn open(registry: &Registry, dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        let name = dir
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| eyre!("not a supply directory: {}", dir.display()))?
            .to_string();

        let supply_type = fs::read_to_string(dir.join("type"))
            .ok()
            .and_then(|text| SupplyType::from_label(&text))
            .unwrap_or_default();

        let attrs: HashMap<PropertyId, PropertyDescriptor> = registry
            .iter()
            .filter(|d| d.kind != ValueKind::DeviceType)
            .filter(|d| dir.join(&d.name).is_file())
            .map(|d| (d.id, d.clone()))
            .collect();

        let mut properties: Vec<PropertyId> = attrs.keys().copied().collect();
        properties.sort();

        let desc = SupplyDesc::new(registry, name, supply_type, properties)
            .wrap_err_with(|| format!("invalid supply at {}", dir.display()))?;
        debug!(
            supply = desc.name(),
            %supply_type,
            properties = desc.properties().len(),
            "opened sysfs supply"
        );

        Ok(Self { dir, desc, attrs })
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    fn attr(&self, id: PropertyId) -> Result<&PropertyDescriptor, DeviceError> {
        self.attrs.get(&id).ok_or(DeviceError::NotSupported)
    }
}

impl PowerSupply for SysfsSupply {
    fn desc(&self) -> &SupplyDesc {
        &self.desc
    }

    fn get_property(&self, id: PropertyId) -> Result<Value, DeviceError> {
        let attr = self.attr(id)?;
        let text = fs::read_to_string(self.dir.join(&attr.name)).map_err(device_error)?;
        match attr.kind {
            ValueKind::Text => Ok(Value::Text(text.trim_end_matches('\n').to_string())),
            kind => codec::decode(kind, &text).map_err(DeviceError::InvalidValue),
        }
    }

    fn set_property(&self, id: PropertyId, value: &Value) -> Result<(), DeviceError> {
        let attr = self.attr(id)?;
        let text = codec::encode(attr.kind, value).map_err(DeviceError::InvalidValue)?;
        fs::write(self.dir.join(&attr.name), text.trim_end_matches('\n')).map_err(device_error)
    }

    fn property_is_writeable(&self, id: PropertyId) -> bool {
        self.attrs
            .get(&id)
            .and_then(|attr| fs::metadata(self.dir.join(&attr.name)).ok())
            .is_some_and(|meta| !meta.permissions().readonly())
    }
}

/// Opens every supply below `root`, sorted by name.
pub fn discover(registry: &Registry, root: &Path) -> Result<Vec<SysfsSupply>> {
    let entries = fs::read_dir(root)
        .wrap_err_with(|| format!("failed to list {}", root.display()))?;

    let mut dirs: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();

    let mut supplies = Vec::with_capacity(dirs.len());
    for dir in dirs {
        match SysfsSupply::open(registry, &dir) {
            Ok(supply) => supplies.push(supply),
            Err(e) => debug!(path = %dir.display(), error = %e, "skipping supply"),
        }
    }
    Ok(supplies)
}

/// Finds the supply called `name` below `root`.
pub fn find(registry: &Registry, root: &Path, name: &str) -> Result<SysfsSupply> {
    let dir = root.join(name);
    if !dir.is_dir() {
        return Err(eyre!("no power supply named `{}` in {}", name, root.display()));
    }
    SysfsSupply::open(registry, dir)
}

#[cfg(unix)]
fn device_error(err: io::Error) -> DeviceError {
    match err.raw_os_error() {
        Some(libc::ENODATA) => DeviceError::NoData,
        Some(libc::ENODEV) => DeviceError::NotPresent,
        Some(libc::EAGAIN) => DeviceError::Busy,
        _ => DeviceError::Io(err),
    }
}

#[cfg(not(unix))]
fn device_error(err: io::Error) -> DeviceError {
    DeviceError::Io(err)
}
