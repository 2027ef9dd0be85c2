//! Single-property reads and writes.

use std::time::Duration;

use tracing::{debug, error};

use crate::codec;
use crate::error::AccessError;
use crate::ratelimit::RateLimit;
use crate::registry::{PropertyDescriptor, PropertyId, Registry};
use crate::supply::{DeviceError, PowerSupply};
use crate::value::{Value, ValueKind};

static FAILURE_LOG: RateLimit = RateLimit::new(Duration::from_secs(5), 10);

/// Routes reads and writes between a supply and the value codec.
#[derive(Debug, Clone, Copy)]
pub struct PropertyAccessor<'r> {
    registry: &'r Registry,
}

impl<'r> PropertyAccessor<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    pub fn descriptor(&self, id: PropertyId) -> Result<&'r PropertyDescriptor, AccessError> {
        self.registry
            .get(id)
            .ok_or(AccessError::UnknownProperty(id))
    }

    /// Reads and renders a property, newline terminated.
    pub fn read<S>(&self, supply: &S, id: PropertyId) -> Result<String, AccessError>
    where
        S: PowerSupply + ?Sized,
    {
        let mut buf = String::new();
        self.read_into(supply, id, &mut buf)?;
        Ok(buf)
    }

    /// Like [`read`](Self::read), appending to a caller-owned buffer.
    pub fn read_into<S>(
        &self,
        supply: &S,
        id: PropertyId,
        buf: &mut String,
    ) -> Result<(), AccessError>
    where
        S: PowerSupply + ?Sized,
    {
        let descriptor = self.descriptor(id)?;
        let result = fetch(supply, descriptor).and_then(|value| {
            codec::encode_into(descriptor.kind, &value, buf)
                .map_err(|err| AccessError::DeviceFailure(DeviceError::InvalidValue(err)))
        });
        if let Err(err) = &result {
            report(supply.desc().name(), descriptor, err);
        }
        result
    }

    /// Decodes `text` and hands the value to the supply's setter.
    ///
    /// Malformed text fails before the supply is touched.
    pub fn write<S>(&self, supply: &S, id: PropertyId, text: &str) -> Result<(), AccessError>
    where
        S: PowerSupply + ?Sized,
    {
        let descriptor = self.descriptor(id)?;
        let value = codec::decode(descriptor.kind, text)?;
        debug!(
            supply = supply.desc().name(),
            property = %descriptor.name,
            ?value,
            "storing property"
        );
        supply.set_property(id, &value).map_err(AccessError::from)
    }
}

fn fetch<S>(supply: &S, descriptor: &PropertyDescriptor) -> Result<Value, AccessError>
where
    S: PowerSupply + ?Sized,
{
    match descriptor.kind {
        ValueKind::DeviceType => Ok(Value::Ordinal(supply.desc().supply_type().ordinal())),
        _ => supply
            .get_property(descriptor.id)
            .map_err(AccessError::from),
    }
}

fn report(supply: &str, descriptor: &PropertyDescriptor, err: &AccessError) {
    match err {
        AccessError::NoData => {
            debug!(supply, "driver has no data for `{}` property", descriptor.name);
        }
        AccessError::TemporarilyUnavailable => {}
        _ => {
            if let Some(suppressed) = FAILURE_LOG.check() {
                error!(
                    supply,
                    suppressed,
                    "driver failed to report `{}` property: {}",
                    descriptor.name,
                    err
                );
            }
        }
    }
}
