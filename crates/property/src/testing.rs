//! In-memory supply used by the unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::registry::{PropertyId, Registry};
use crate::supply::{DeviceError, PowerSupply, SupplyDesc, SupplyType};
use crate::value::Value;

#[derive(Debug, Clone)]
pub(crate) enum Outcome {
    Value(Value),
    NoData,
    NotPresent,
    Busy,
    Failure,
}

pub(crate) struct FakeSupply {
    desc: SupplyDesc,
    outcomes: Mutex<HashMap<PropertyId, Outcome>>,
    writeable: Vec<PropertyId>,
    pub(crate) gets: AtomicUsize,
    pub(crate) sets: Mutex<Vec<(PropertyId, Value)>>,
}

impl FakeSupply {
    pub(crate) fn new(name: &str, properties: impl IntoIterator<Item = PropertyId>) -> Self {
        Self::with_type(name, SupplyType::Battery, properties)
    }

    pub(crate) fn with_type(
        name: &str,
        supply_type: SupplyType,
        properties: impl IntoIterator<Item = PropertyId>,
    ) -> Self {
        let desc = SupplyDesc::new(Registry::standard(), name, supply_type, properties).unwrap();
        Self {
            desc,
            outcomes: Mutex::new(HashMap::new()),
            writeable: Vec::new(),
            gets: AtomicUsize::new(0),
            sets: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn writeable(mut self, ids: impl IntoIterator<Item = PropertyId>) -> Self {
        self.writeable.extend(ids);
        self
    }

    pub(crate) fn with(self, id: PropertyId, outcome: Outcome) -> Self {
        self.outcomes.lock().unwrap().insert(id, outcome);
        self
    }

    pub(crate) fn value(self, id: PropertyId, value: Value) -> Self {
        self.with(id, Outcome::Value(value))
    }
}

impl PowerSupply for FakeSupply {
    fn desc(&self) -> &SupplyDesc {
        &self.desc
    }

    fn get_property(&self, id: PropertyId) -> Result<Value, DeviceError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        match self.outcomes.lock().unwrap().get(&id).cloned() {
            Some(Outcome::Value(value)) => Ok(value),
            Some(Outcome::NoData) | None => Err(DeviceError::NoData),
            Some(Outcome::NotPresent) => Err(DeviceError::NotPresent),
            Some(Outcome::Busy) => Err(DeviceError::Busy),
            Some(Outcome::Failure) => Err(DeviceError::Other("bus fault".into())),
        }
    }

    fn set_property(&self, id: PropertyId, value: &Value) -> Result<(), DeviceError> {
        self.sets.lock().unwrap().push((id, value.clone()));
        self.outcomes
            .lock()
            .unwrap()
            .insert(id, Outcome::Value(value.clone()));
        Ok(())
    }

    fn property_is_writeable(&self, id: PropertyId) -> bool {
        self.writeable.contains(&id)
    }
}
