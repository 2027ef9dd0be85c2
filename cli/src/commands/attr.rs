use color_eyre::eyre::{Result, WrapErr};
use supplyfs_property::AttributeSet;
use tracing::info;

use super::Context;

pub fn show(ctx: &Context, device: &str, property: &str) -> Result<()> {
    let supply = ctx.source.find(&ctx.registry, device)?;
    let attrs = AttributeSet::new(&ctx.registry, supply.as_ref());
    let text = attrs
        .show(property)
        .wrap_err_with(|| format!("failed to read {device}/{property}"))?;
    print!("{text}");
    Ok(())
}

pub fn store(ctx: &Context, device: &str, property: &str, value: &str) -> Result<()> {
    let supply = ctx.source.find(&ctx.registry, device)?;
    let attrs = AttributeSet::new(&ctx.registry, supply.as_ref());
    let written = attrs
        .store(property, value)
        .wrap_err_with(|| format!("failed to write {device}/{property}"))?;
    info!(device, property, written, "attribute stored");
    println!("{device}/{property}: {written} bytes written");
    Ok(())
}
