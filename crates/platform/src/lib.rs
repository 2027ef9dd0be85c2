//! Power supplies for supplyfs.
//!
//! This crate provides concrete [`PowerSupply`](supplyfs_property::PowerSupply)
//! implementations for the property core:
//!
//! - [`SysfsSupply`] - a supply backed by a `power_supply` class directory,
//!   such as `/sys/class/power_supply/BAT0`
//! - [`SimulatedSupply`] - an in-memory supply described by a TOML fixture,
//!   with optional injected failures
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use supplyfs_platform::sysfs;
//! use supplyfs_property::{Registry, SnapshotBuilder};
//!
//! let registry = Registry::standard();
//! let battery = sysfs::find(registry, Path::new(sysfs::POWER_SUPPLY_PATH), "BAT0")?;
//! let snapshot = SnapshotBuilder::new(registry).build(&battery)?;
//! ```

mod sim;
pub mod sysfs;

pub use sim::{Fault, SimulatedSupply};
pub use sysfs::SysfsSupply;
