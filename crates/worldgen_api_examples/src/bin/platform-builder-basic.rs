use rand::rngs::StdRng;
use rand::SeedableRng;
use worldgen_api::prelude::*;
use worldgen_api_examples::{init_tracing, HeightmapVolume};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Defaults: chance 0.2, height 6 + rand*32, radius 1 + rand*4.
    let defaults = EnderCrystalPlatform::builder().build()?;
    println!("defaults: {defaults:?}");

    // Chained setters; the last call for a field wins.
    let mut builder = EnderCrystalPlatform::builder();
    builder
        .chance(0.5)
        .height(VariableAmount::range(20.0, 40.0))
        .radius(VariableAmount::fixed(3.0))
        .radius(VariableAmount::base_with_variance(4.0, 1.0));
    let tall = builder.build()?;
    println!("tall: {tall:?}");

    // The builder keeps its values after build().
    builder.chance(0.05);
    let rare = builder.build()?;
    println!("rare: chance {} height {:?}", rare.spawn_probability(), rare.height());

    // With only a probability default, height and radius become mandatory.
    let strict = EnderCrystalPlatformBuilder::with_defaults(PlatformDefaults::probability_only());
    match strict.build() {
        Err(e) => println!("strict builder without height/radius: {e}"),
        Ok(p) => anyhow::bail!("expected the strict builder to fail, got {p:?}"),
    }

    // Distributions that can dip below zero are rejected up front.
    let mut platform = tall.clone();
    if let Err(e) = platform.set_radius(VariableAmount::base_with_variance(1.0, 2.0)) {
        println!("rejected radius: {e}");
    }
    println!("radius unchanged: {:?}", platform.radius() == tall.radius());

    // Hosts with their own pipeline call populate directly with their own RNG.
    let area = ChunkArea::new(ChunkPos(0, 3), 16, 8)?;
    let mut volume = HeightmapVolume::new(64, 0);
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..8 {
        tall.populate(&area, &mut volume, &mut rng)?;
    }
    for pillar in &volume.pillars {
        println!(
            "pillar at {:?}: height {} radius {}",
            pillar.base, pillar.height, pillar.radius
        );
    }

    Ok(())
}
