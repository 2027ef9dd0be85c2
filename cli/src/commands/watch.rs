use std::time::Duration;

use color_eyre::eyre::Result;
use serde_json::json;
use supplyfs_property::SnapshotBuilder;
use tracing::warn;

use super::uevent::snapshot_map;
use super::Context;

pub fn run(
    ctx: &Context,
    device: &str,
    samples: u32,
    interval: Duration,
    compact: bool,
) -> Result<()> {
    let supply = ctx.source.find(&ctx.registry, device)?;
    let builder = SnapshotBuilder::new(&ctx.registry);
    let mut counter = 0u32;

    loop {
        let timestamp = chrono::Utc::now().to_rfc3339();
        let doc = match builder.build(supply.as_ref()) {
            Ok(snapshot) => json!({
                "timestamp": timestamp,
                "supply": device,
                "properties": snapshot_map(&snapshot),
            }),
            Err(e) => {
                warn!(device, error = %e, "snapshot failed");
                json!({
                    "timestamp": timestamp,
                    "supply": device,
                    "error": e.to_string(),
                })
            }
        };

        if compact {
            println!("{}", serde_json::to_string(&doc)?);
        } else {
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }

        counter += 1;
        if samples > 0 && counter >= samples {
            break;
        }

        std::thread::sleep(interval);
    }

    Ok(())
}
