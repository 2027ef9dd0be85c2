use color_eyre::eyre::Result;
use serde_json::{Map, Value};
use supplyfs_property::{Snapshot, SnapshotBuilder, UeventEnv};

use super::Context;

pub fn run(ctx: &Context, device: &str, json: bool) -> Result<()> {
    let supply = ctx.source.find(&ctx.registry, device)?;
    let snapshot = SnapshotBuilder::new(&ctx.registry).build(supply.as_ref())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot_map(&snapshot))?);
        return Ok(());
    }

    for var in UeventEnv::from_snapshot(&snapshot)?.vars() {
        println!("{var}");
    }
    Ok(())
}

/// Snapshot entries as a JSON object, in snapshot order.
pub fn snapshot_map(snapshot: &Snapshot) -> Map<String, Value> {
    snapshot
        .entries()
        .iter()
        .map(|(key, value)| (key.clone(), Value::String(value.clone())))
        .collect()
}
