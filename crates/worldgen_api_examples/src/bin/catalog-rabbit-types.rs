use worldgen_api::prelude::*;
use worldgen_api_examples::init_tracing;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Host startup: register every vanilla morph, then freeze the registry.
    let mut registry = CatalogRegistry::new("rabbit type");
    RabbitTypes::register_vanilla(&mut registry)?;
    registry.freeze();

    // Bind the named slots once for the whole process.
    let types = RabbitTypes::install(RabbitTypes::resolve(&registry)?)?;

    for rabbit in types.all() {
        println!("{:<28} {}", rabbit.id(), rabbit.name());
    }

    // Lookups by id and by slot agree on identity.
    let killer = registry.require(RabbitTypes::KILLER)?;
    println!(
        "killer slot matches registry entry: {}",
        RabbitTypes::get()?.killer() == &killer
    );

    // Late registrations are refused once the host has frozen the registry.
    if let Err(e) = registry.register(RabbitType::new("plugin:toast", "Toast")) {
        println!("late registration refused: {e}");
    }

    Ok(())
}
