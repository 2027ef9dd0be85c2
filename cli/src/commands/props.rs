use color_eyre::eyre::Result;
use serde_json::json;
use supplyfs_property::AttributeSet;

use super::Context;

pub fn run(ctx: &Context, device: Option<&str>, json: bool) -> Result<()> {
    match device {
        Some(name) => device_attributes(ctx, name, json),
        None => registry(ctx, json),
    }
}

fn registry(ctx: &Context, json: bool) -> Result<()> {
    if json {
        let descriptors: Vec<_> = ctx.registry.iter().collect();
        println!("{}", serde_json::to_string_pretty(&descriptors)?);
        return Ok(());
    }

    for desc in ctx.registry.iter() {
        println!("{:>3}  {:<32} {}", desc.id.index(), desc.name, desc.kind);
    }
    Ok(())
}

fn device_attributes(ctx: &Context, name: &str, json: bool) -> Result<()> {
    let supply = ctx.source.find(&ctx.registry, name)?;
    let attrs = AttributeSet::new(&ctx.registry, supply.as_ref());

    if json {
        let listed: Vec<_> = attrs
            .attributes()
            .iter()
            .map(|a| {
                json!({
                    "name": a.descriptor.name,
                    "kind": a.descriptor.kind,
                    "mode": a.mode,
                    "permissions": format!("{:o}", a.mode.permissions()),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&listed)?);
        return Ok(());
    }

    for attr in attrs.attributes() {
        println!("{} {:<32} {}", attr.mode, attr.descriptor.name, attr.descriptor.kind);
    }
    Ok(())
}
