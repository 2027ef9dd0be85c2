use std::collections::HashMap;
use std::sync::Mutex;

use pretty_assertions::assert_eq;
use supplyfs_property::*;

struct Charger {
    desc: SupplyDesc,
    values: Mutex<HashMap<PropertyId, Value>>,
}

impl Charger {
    fn new(registry: &Registry, name: &str, values: Vec<(PropertyId, Value)>) -> Self {
        let desc = SupplyDesc::new(
            registry,
            name,
            SupplyType::UsbPd,
            values.iter().map(|(id, _)| *id),
        )
        .unwrap();
        Self {
            desc,
            values: Mutex::new(values.into_iter().collect()),
        }
    }
}

impl PowerSupply for Charger {
    fn desc(&self) -> &SupplyDesc {
        &self.desc
    }

    fn get_property(&self, id: PropertyId) -> Result<Value, DeviceError> {
        self.values
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(DeviceError::NoData)
    }

    fn set_property(&self, id: PropertyId, value: &Value) -> Result<(), DeviceError> {
        self.values.lock().unwrap().insert(id, value.clone());
        Ok(())
    }

    fn property_is_writeable(&self, id: PropertyId) -> bool {
        id == PropertyId::INPUT_CURRENT_LIMIT
    }
}

fn sample_charger(registry: &Registry) -> Charger {
    Charger::new(
        registry,
        "usb-pd0",
        vec![
            (PropertyId::ONLINE, Value::Int(1)),
            (PropertyId::HEALTH, Value::Ordinal(1)),
            (PropertyId::VOLTAGE_NOW, Value::Int(9_000_000)),
            (PropertyId::INPUT_CURRENT_LIMIT, Value::Int(3_000_000)),
            (PropertyId::MANUFACTURER, Value::Text("ACME Power".into())),
        ],
    )
}

#[test]
fn test_uevent_for_charger() {
    let registry = Registry::standard();
    let charger = sample_charger(registry);

    let snapshot = SnapshotBuilder::new(registry).build(&charger).unwrap();
    let env = UeventEnv::from_snapshot(&snapshot).unwrap();

    assert_eq!(
        env.vars().to_vec(),
        vec![
            "POWER_SUPPLY_NAME=usb-pd0".to_string(),
            "POWER_SUPPLY_ONLINE=1".to_string(),
            "POWER_SUPPLY_HEALTH=Good".to_string(),
            "POWER_SUPPLY_VOLTAGE_NOW=9000000".to_string(),
            "POWER_SUPPLY_INPUT_CURRENT_LIMIT=3000000".to_string(),
            "POWER_SUPPLY_MANUFACTURER=ACME Power".to_string(),
        ]
    );
}

#[test]
fn test_store_then_snapshot() {
    let registry = Registry::standard();
    let charger = sample_charger(registry);
    let attrs = AttributeSet::new(registry, &charger);

    assert_eq!(attrs.mode("input_current_limit"), Mode::ReadWrite);
    assert_eq!(attrs.mode("online"), Mode::ReadOnly);
    assert_eq!(attrs.store("input_current_limit", "1500000\n").unwrap(), 8);

    let snapshot = SnapshotBuilder::new(registry).build(&charger).unwrap();
    assert_eq!(snapshot.get("INPUT_CURRENT_LIMIT"), Some("1500000"));
    assert_eq!(attrs.show("type").unwrap(), "USB_PD\n");
}

#[test]
fn test_extension_properties_in_snapshot() {
    let registry = RegistryBuilder::new()
        .named_extension_set("oppo")
        .unwrap()
        .build()
        .unwrap();
    let chip_soc = registry.lookup("chip_soc").unwrap().id;
    let charger = Charger::new(
        &registry,
        "battery",
        vec![
            (PropertyId::CAPACITY, Value::Int(57)),
            (chip_soc, Value::Int(58)),
        ],
    );

    let snapshot = SnapshotBuilder::new(&registry).build(&charger).unwrap();
    assert_eq!(
        snapshot.lines().collect::<Vec<_>>(),
        vec!["NAME=battery", "CAPACITY=57", "CHIP_SOC=58"]
    );
}

#[test]
fn test_snapshot_into_entries() {
    let registry = Registry::standard();
    let charger = Charger::new(registry, "ac", vec![(PropertyId::ONLINE, Value::Int(0))]);
    let snapshot = SnapshotBuilder::new(registry).build(&charger).unwrap();
    let pairs: Vec<(String, String)> = snapshot.into_entries();
    assert_eq!(
        pairs,
        vec![
            ("NAME".to_string(), "ac".to_string()),
            ("ONLINE".to_string(), "0".to_string()),
        ]
    );
}
