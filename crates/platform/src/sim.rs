use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use color_eyre::eyre::{eyre, Result, WrapErr};
use serde::Deserialize;
use supplyfs_property::codec;
use supplyfs_property::{
    DeviceError, PowerSupply, PropertyId, Registry, SupplyDesc, SupplyType, Value, ValueKind,
};

/// Failure injected for a simulated property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fault {
    NoData,
    NotPresent,
    Busy,
    Failure,
}

impl Fault {
    fn to_error(self, property: &str) -> DeviceError {
        match self {
            Fault::NoData => DeviceError::NoData,
            Fault::NotPresent => DeviceError::NotPresent,
            Fault::Busy => DeviceError::Busy,
            Fault::Failure => DeviceError::Other(format!("simulated failure reading {property}")),
        }
    }
}

#[derive(Debug, Deserialize)]
struct FixtureFile {
    #[serde(default)]
    supply: Vec<SupplyFixture>,
}

#[derive(Debug, Deserialize)]
struct SupplyFixture {
    name: String,
    #[serde(default, rename = "type")]
    supply_type: SupplyType,
    /// Declaration order; defaults to registry order of everything named below.
    properties: Option<Vec<String>>,
    #[serde(default)]
    writeable: Vec<String>,
    #[serde(default)]
    values: toml::Table,
    #[serde(default)]
    errors: HashMap<String, Fault>,
}

#[derive(Debug)]
struct State {
    values: HashMap<PropertyId, Value>,
    faults: HashMap<PropertyId, Fault>,
}

/// An in-memory supply described by a TOML fixture.
///
/// ```toml
/// [[supply]]
/// name = "batt0"
/// type = "Battery"
/// writeable = ["charge_control_limit"]
///
/// [supply.values]
/// status = "Charging"
/// capacity = 57
///
/// [supply.errors]
/// temp = "no_data"
/// ```
#[derive(Debug)]
pub struct SimulatedSupply {
    desc: SupplyDesc,
    names: HashMap<PropertyId, String>,
    writeable: HashSet<PropertyId>,
    state: Mutex<State>,
}

impl SimulatedSupply {
    pub fn load(registry: &Registry, path: &Path) -> Result<Vec<SimulatedSupply>> {
        let content = fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read fixture {}", path.display()))?;
        Self::from_toml(registry, &content)
            .wrap_err_with(|| format!("invalid fixture {}", path.display()))
    }

    pub fn from_toml(registry: &Registry, content: &str) -> Result<Vec<SimulatedSupply>> {
        let file: FixtureFile = toml::from_str(content)?;
        file.supply
            .into_iter()
            .map(|fixture| Self::from_fixture(registry, fixture))
            .collect()
    }

    fn from_fixture(registry: &Registry, fixture: SupplyFixture) -> Result<Self> {
        let lookup = |name: &str| {
            registry
                .lookup(name)
                .ok_or_else(|| eyre!("{}: unknown property `{}`", fixture.name, name))
        };

        let mut values = HashMap::new();
        for (name, raw) in &fixture.values {
            let desc = lookup(name.as_str())?;
            let value = fixture_value(desc.kind, raw)
                .wrap_err_with(|| format!("{}: bad value for `{}`", fixture.name, name))?;
            values.insert(desc.id, value);
        }

        let mut faults = HashMap::new();
        for (name, fault) in &fixture.errors {
            faults.insert(lookup(name.as_str())?.id, *fault);
        }

        let properties: Vec<PropertyId> = match &fixture.properties {
            Some(names) => names
                .iter()
                .map(|name| lookup(name.as_str()).map(|d| d.id))
                .collect::<Result<_>>()?,
            None => {
                let mut ids: Vec<PropertyId> =
                    values.keys().chain(faults.keys()).copied().collect();
                ids.sort();
                ids.dedup();
                ids
            }
        };

        let writeable: HashSet<PropertyId> = fixture
            .writeable
            .iter()
            .map(|name| lookup(name.as_str()).map(|d| d.id))
            .collect::<Result<_>>()?;

        let names = properties
            .iter()
            .filter_map(|id| registry.get(*id).map(|d| (*id, d.name.clone())))
            .collect();

        let desc = SupplyDesc::new(registry, fixture.name, fixture.supply_type, properties)?;

        Ok(Self {
            desc,
            names,
            writeable,
            state: Mutex::new(State { values, faults }),
        })
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn property_name(&self, id: PropertyId) -> &str {
        self.names.get(&id).map_or("?", String::as_str)
    }
}

fn fixture_value(kind: ValueKind, raw: &toml::Value) -> Result<Value> {
    match (kind, raw) {
        (ValueKind::Text, toml::Value::String(s)) => Ok(Value::Text(s.clone())),
        (ValueKind::Int64, toml::Value::Integer(i)) => Ok(Value::Int64(*i)),
        (ValueKind::Int32, toml::Value::Integer(i)) => Ok(Value::Int(i32::try_from(*i)?)),
        (ValueKind::Enum(_) | ValueKind::DeviceType, toml::Value::Integer(i)) => {
            Ok(Value::Ordinal(i32::try_from(*i)?))
        }
        (kind, toml::Value::String(s)) => Ok(codec::decode(kind, s)?),
        (kind, other) => Err(eyre!("{} is not valid for a {} property", other.type_str(), kind)),
    }
}

impl PowerSupply for SimulatedSupply {
    fn desc(&self) -> &SupplyDesc {
        &self.desc
    }

    fn get_property(&self, id: PropertyId) -> Result<Value, DeviceError> {
        let state = self.state();
        if let Some(fault) = state.faults.get(&id) {
            return Err(fault.to_error(self.property_name(id)));
        }
        state.values.get(&id).cloned().ok_or(DeviceError::NoData)
    }

    fn set_property(&self, id: PropertyId, value: &Value) -> Result<(), DeviceError> {
        if !self.writeable.contains(&id) {
            return Err(DeviceError::NotSupported);
        }
        let mut state = self.state();
        state.faults.remove(&id);
        state.values.insert(id, value.clone());
        Ok(())
    }

    fn property_is_writeable(&self, id: PropertyId) -> bool {
        self.writeable.contains(&id)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use supplyfs_property::{AccessError, AttributeSet, Mode, SnapshotBuilder};

    use super::*;

    const FIXTURE: &str = r#"
[[supply]]
name = "batt0"
type = "Battery"
properties = ["status", "capacity", "temp", "charge_control_limit", "model_name"]
writeable = ["charge_control_limit"]

[supply.values]
status = "Charging"
capacity = 57
charge_control_limit = 80
model_name = "SIM-1000"

[supply.errors]
temp = "no_data"

[[supply]]
name = "ac"
type = "Mains"

[supply.values]
online = 1
"#;

    fn supplies() -> Vec<SimulatedSupply> {
        SimulatedSupply::from_toml(Registry::standard(), FIXTURE).unwrap()
    }

    #[test]
    fn test_fixture_declares_properties() {
        let supplies = supplies();
        assert_eq!(supplies.len(), 2);
        assert_eq!(supplies[0].desc().name(), "batt0");
        assert_eq!(
            supplies[0].desc().properties(),
            &[
                PropertyId::STATUS,
                PropertyId::CAPACITY,
                PropertyId::TEMP,
                PropertyId::CHARGE_CONTROL_LIMIT,
                PropertyId::MODEL_NAME,
            ]
        );
        assert_eq!(supplies[1].desc().supply_type(), SupplyType::Mains);
        assert_eq!(supplies[1].desc().properties(), &[PropertyId::ONLINE]);
    }

    #[test]
    fn test_fixture_snapshot_skips_no_data() {
        let supplies = supplies();
        let snapshot = SnapshotBuilder::new(Registry::standard())
            .build(&supplies[0])
            .unwrap();
        assert_eq!(
            snapshot.lines().collect::<Vec<_>>(),
            vec![
                "NAME=batt0",
                "STATUS=Charging",
                "CAPACITY=57",
                "CHARGE_CONTROL_LIMIT=80",
                "MODEL_NAME=SIM-1000",
            ]
        );
    }

    #[test]
    fn test_fixture_store() {
        let supplies = supplies();
        let attrs = AttributeSet::new(Registry::standard(), &supplies[0]);
        assert_eq!(attrs.mode("charge_control_limit"), Mode::ReadWrite);
        attrs.store("charge_control_limit", "60").unwrap();
        assert_eq!(attrs.show("charge_control_limit").unwrap(), "60\n");
        assert!(matches!(
            attrs.store("capacity", "10"),
            Err(AccessError::ReadOnly(_))
        ));
    }

    #[test]
    fn test_fixture_failure_aborts_snapshot() {
        let supplies = SimulatedSupply::from_toml(
            Registry::standard(),
            r#"
[[supply]]
name = "flaky"
[supply.values]
capacity = 10
[supply.errors]
voltage_now = "failure"
"#,
        )
        .unwrap();
        let err = SnapshotBuilder::new(Registry::standard())
            .build(&supplies[0])
            .unwrap_err();
        assert!(matches!(err, AccessError::DeviceFailure(_)));
    }

    #[test]
    fn test_fixture_rejects_unknown_property() {
        let err = SimulatedSupply::from_toml(
            Registry::standard(),
            "[[supply]]\nname = \"x\"\n[supply.values]\nwattage = 5\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("wattage"));
    }

    #[test]
    fn test_fixture_value_kinds() {
        assert_eq!(
            fixture_value(ValueKind::Int64, &toml::Value::Integer(-5_000_000_000)).unwrap(),
            Value::Int64(-5_000_000_000)
        );
        assert!(fixture_value(ValueKind::Int32, &toml::Value::Integer(5_000_000_000)).is_err());
        assert!(fixture_value(ValueKind::Int32, &toml::Value::Boolean(true)).is_err());
    }
}
