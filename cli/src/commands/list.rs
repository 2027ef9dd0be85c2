use color_eyre::eyre::Result;

use super::Context;

pub fn run(ctx: &Context) -> Result<()> {
    let supplies = ctx.source.load_all(&ctx.registry)?;
    if supplies.is_empty() {
        println!("No power supplies found");
        return Ok(());
    }

    println!("{:<20} {:<12} PROPERTIES", "NAME", "TYPE");
    for supply in &supplies {
        let desc = supply.desc();
        println!(
            "{:<20} {:<12} {}",
            desc.name(),
            desc.supply_type().label(),
            desc.properties().len()
        );
    }
    Ok(())
}
