//! Power supply property dispatch and value marshalling.
//!
//! This crate maps the typed properties of a power supply (status, voltage,
//! temperature, ...) to the text shown and accepted by its attributes, and
//! flattens a supply into the `POWER_SUPPLY_*` variables of a uevent.
//!
//! The device itself is reached through the [`PowerSupply`] trait; this
//! crate does no I/O and holds no mutable state beyond log throttling.
//!
//! # Example
//!
//! ```ignore
//! use supplyfs_property::{AttributeSet, Registry, SnapshotBuilder, UeventEnv};
//!
//! let registry = Registry::standard();
//! let attrs = AttributeSet::new(registry, &battery);
//! println!("{}", attrs.show("status")?);
//!
//! let snapshot = SnapshotBuilder::new(registry).build(&battery)?;
//! for var in UeventEnv::from_snapshot(&snapshot)?.vars() {
//!     println!("{var}");
//! }
//! ```

mod accessor;
mod attribute;
pub mod codec;
mod error;
mod extension;
mod ratelimit;
mod registry;
mod snapshot;
mod supply;
mod tables;
mod value;
mod visibility;

#[cfg(test)]
mod testing;

pub use accessor::PropertyAccessor;
pub use attribute::{Attribute, AttributeSet};
pub use codec::CodecError;
pub use error::AccessError;
pub use extension::{ExtensionKind, ExtensionProperty, ExtensionSet};
pub use registry::{PropertyDescriptor, PropertyId, Registry, RegistryBuilder, RegistryError};
pub use snapshot::{
    Snapshot, SnapshotBuilder, UeventEnv, UEVENT_BUFFER_SIZE, UEVENT_NUM_ENVP, UEVENT_PREFIX,
};
pub use supply::{DescError, DeviceError, PowerSupply, SupplyDesc, SupplyType};
pub use tables::EnumTable;
pub use value::{Value, ValueKind};
pub use visibility::{resolve, Mode};
