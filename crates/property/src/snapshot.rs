//! Flattened `KEY=VALUE` snapshots of a supply, used for uevents.

use serde::Serialize;

use crate::accessor::PropertyAccessor;
use crate::codec::PAGE_SIZE;
use crate::error::AccessError;
use crate::registry::Registry;
use crate::supply::PowerSupply;

/// Prefix applied to every snapshot key in a uevent environment.
pub const UEVENT_PREFIX: &str = "POWER_SUPPLY_";
/// Maximum number of environment variables in one uevent.
pub const UEVENT_NUM_ENVP: usize = 64;
/// Size of the uevent environment buffer, separators included.
pub const UEVENT_BUFFER_SIZE: usize = 2048;

/// Ordered `(KEY, value)` pairs. The first entry is always `NAME`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    entries: Vec<(String, String)>,
}

impl Snapshot {
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<(String, String)> {
        self.entries
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `KEY=value` lines without the uevent prefix.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.entries.iter().map(|(k, v)| format!("{k}={v}"))
    }
}

/// Serializes the declared properties of a supply.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotBuilder<'r> {
    accessor: PropertyAccessor<'r>,
}

impl<'r> SnapshotBuilder<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            accessor: PropertyAccessor::new(registry),
        }
    }

    /// Reads every declared property in declaration order.
    ///
    /// Properties with no data, or whose device is absent or busy, are left
    /// out. Any other failure aborts the whole snapshot.
    pub fn build<S>(&self, supply: &S) -> Result<Snapshot, AccessError>
    where
        S: PowerSupply + ?Sized,
    {
        let desc = supply.desc();
        let mut entries = Vec::with_capacity(desc.properties().len() + 1);
        entries.push(("NAME".to_string(), desc.name().to_string()));

        let mut scratch = String::new();
        scratch
            .try_reserve(PAGE_SIZE)
            .map_err(|_| AccessError::AllocationFailure)?;

        for &id in desc.properties() {
            scratch.clear();
            match self.accessor.read_into(supply, id, &mut scratch) {
                Ok(()) => {}
                Err(err) if err.is_skippable() => continue,
                Err(err) => return Err(err),
            }

            let value = match scratch.find('\n') {
                Some(end) => &scratch[..end],
                None => scratch.as_str(),
            };
            let key = self.accessor.descriptor(id)?.name.to_ascii_uppercase();
            entries.push((key, value.to_string()));
        }

        Ok(Snapshot { entries })
    }
}

/// A bounded uevent environment of `KEY=value` variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UeventEnv {
    vars: Vec<String>,
    buflen: usize,
}

impl UeventEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefixes every snapshot key with [`UEVENT_PREFIX`].
    pub fn from_snapshot(snapshot: &Snapshot) -> Result<Self, AccessError> {
        let mut env = Self::new();
        for (key, value) in snapshot.entries() {
            env.add_var(&format!("{UEVENT_PREFIX}{key}={value}"))?;
        }
        Ok(env)
    }

    /// Appends one variable, failing once either limit would be exceeded.
    pub fn add_var(&mut self, var: &str) -> Result<(), AccessError> {
        if self.vars.len() >= UEVENT_NUM_ENVP - 1 {
            tracing::warn!(var, "too many uevent variables");
            return Err(AccessError::AllocationFailure);
        }
        if var.len() >= UEVENT_BUFFER_SIZE - self.buflen {
            tracing::warn!(var, "uevent buffer size too small");
            return Err(AccessError::AllocationFailure);
        }
        self.buflen += var.len() + 1;
        self.vars.push(var.to_string());
        Ok(())
    }

    pub fn vars(&self) -> &[String] {
        &self.vars
    }

    /// NUL-separated encoding as delivered to userspace listeners.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.buflen);
        for var in &self.vars {
            out.extend_from_slice(var.as_bytes());
            out.push(0);
        }
        out
    }
}
