use glam::IVec2;
use worldgen_api::prelude::*;
use worldgen_api_examples::{init_tracing, render_pillars_ascii, HeightmapVolume};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut common = EnderCrystalPlatform::builder();
    common.chance(0.35);
    let mut wide = EnderCrystalPlatform::builder();
    wide.chance(0.1)
        .height(VariableAmount::range(30.0, 50.0))
        .radius(VariableAmount::weighted(vec![
            WeightedAmount::new(3.0, VariableAmount::fixed(4.0)),
            WeightedAmount::new(1.0, VariableAmount::range(5.0, 7.0)),
        ]));

    let plan = GenerationPlan::new()
        .with_populator(common.build()?)
        .with_populator(wide.build()?);

    let config = RunConfig::new(2025);
    let runner = PopulationRunner::try_new(config.clone())?;

    // A band of void around z = 0 shows pillars being skipped where no surface exists.
    let mut volume = HeightmapVolume::new(64, 12);
    let mut sink = FilterSink::new(VecSink::new(), [PopulateEventKind::Warning]);
    let mut placed = 0;
    for cz in -4..4 {
        for cx in -4..4 {
            let chunk = ChunkPos(cx, cz);
            let report = runner.populate_with_events(&plan, chunk, &mut volume, &mut sink);
            placed += report.decorations_placed;
        }
    }

    let chunk_size = config.chunk_size as i32;
    let min = chunk_min_block(ChunkPos(-4, -4), config.chunk_size)
        .ok_or_else(|| anyhow::anyhow!("render origin is outside block coordinates"))?;
    let size = IVec2::splat(8 * chunk_size + config.populate_offset);
    println!("{}", render_pillars_ascii(&volume, min, size, 2));
    println!("{placed} pillars placed");

    if let Some(pillar) = volume.pillars.first() {
        let standing = volume.pillar_at(pillar.base.x, pillar.base.z);
        let crest = standing.map(|p| p.crest);
        println!("first pillar peak: {:?} ({:?})", pillar.peak(), crest);
    }

    for event in sink.into_inner().as_slice() {
        println!("warning: {event:?}");
    }

    Ok(())
}
