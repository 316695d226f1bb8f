//! Reference driver that runs an ordered set of populators over chunks.
//!
//! Hosts with their own generation pipeline call [`Populator::populate`]
//! directly; [`PopulationRunner`] covers the common case of "run these
//! populators, in order, with a deterministic per-chunk seed".
use rand::rngs::StdRng;
use rand::SeedableRng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::generation::chunk::seed_for_chunk;
use crate::generation::events::{EventSink, PopulateEvent, PopulateEventKind};
use crate::generation::{ChunkArea, ChunkPos, Decoration, Populator, PopulatorVolume};

/// Configuration for populating chunks.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// World seed mixed with chunk coordinates to seed each chunk's RNG.
    pub world_seed: u64,
    /// Chunk edge length in blocks.
    pub chunk_size: u32,
    /// Shift applied to the populated area on both axes.
    pub populate_offset: i32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            world_seed: 0,
            chunk_size: 16,
            populate_offset: 8,
        }
    }
}

impl RunConfig {
    /// Creates a new [`RunConfig`] with the specified world seed.
    pub fn new(world_seed: u64) -> Self {
        Self {
            world_seed,
            ..Default::default()
        }
    }

    /// Sets the chunk size.
    pub fn with_chunk_size(mut self, chunk_size: u32) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Sets the populate offset.
    pub fn with_populate_offset(mut self, populate_offset: i32) -> Self {
        self.populate_offset = populate_offset;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::InvalidConfig("chunk_size must be > 0".into()));
        }
        if self.chunk_size > i32::MAX as u32 {
            return Err(Error::InvalidConfig(
                "chunk_size must fit in an i32".into(),
            ));
        }
        Ok(())
    }

    /// The area populated for `chunk`, or an error if it falls outside block
    /// coordinates.
    pub fn area_for(&self, chunk: ChunkPos) -> Result<ChunkArea> {
        ChunkArea::new(chunk, self.chunk_size, self.populate_offset)
    }
}

/// Populators applied to every chunk, in order.
#[derive(Default)]
#[non_exhaustive]
pub struct GenerationPlan {
    pub populators: Vec<Box<dyn Populator>>,
}

impl GenerationPlan {
    /// Create a new empty plan.
    pub fn new() -> Self {
        Self {
            populators: Vec::new(),
        }
    }

    /// Append a populator.
    pub fn with_populator<P: Populator + 'static>(mut self, populator: P) -> Self {
        self.populators.push(Box::new(populator));
        self
    }

    /// Append an already boxed populator.
    pub fn with_boxed(mut self, populator: Box<dyn Populator>) -> Self {
        self.populators.push(populator);
        self
    }

    pub fn len(&self) -> usize {
        self.populators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.populators.is_empty()
    }
}

/// Outcome of populating one chunk.
#[non_exhaustive]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkReport {
    pub chunk: ChunkPos,
    /// Populators that returned successfully.
    pub populators_run: usize,
    /// Populators that returned an error.
    pub populators_failed: usize,
    /// Decorations handed to the volume.
    pub decorations_placed: usize,
}

impl ChunkReport {
    pub fn new(chunk: ChunkPos) -> Self {
        Self {
            chunk,
            ..Default::default()
        }
    }
}

pub struct PopulationRunner {
    /// Run configuration applied to this runner.
    pub config: RunConfig,
}

impl PopulationRunner {
    pub fn try_new(config: RunConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Populates a single chunk.
    pub fn populate(
        &self,
        plan: &GenerationPlan,
        chunk: ChunkPos,
        volume: &mut dyn PopulatorVolume,
    ) -> ChunkReport {
        populate_chunk(plan, &self.config, chunk, volume, None)
    }

    pub fn populate_with_events(
        &self,
        plan: &GenerationPlan,
        chunk: ChunkPos,
        volume: &mut dyn PopulatorVolume,
        sink: &mut dyn EventSink,
    ) -> ChunkReport {
        populate_chunk(plan, &self.config, chunk, volume, Some(sink))
    }
}

/// Forwards decorations to the host volume while counting them and emitting
/// [`PopulateEvent::DecorationPlaced`].
struct ObservedVolume<'a> {
    inner: &'a mut dyn PopulatorVolume,
    sink: &'a mut dyn EventSink,
    index: usize,
    placed: usize,
}

impl PopulatorVolume for ObservedVolume<'_> {
    fn surface_y(&self, x: i32, z: i32) -> Option<i32> {
        self.inner.surface_y(x, z)
    }

    fn place(&mut self, decoration: Decoration) {
        self.placed += 1;
        if self.sink.wants(PopulateEventKind::DecorationPlaced) {
            self.sink.send(PopulateEvent::DecorationPlaced {
                index: self.index,
                decoration: decoration.clone(),
            });
        }
        self.inner.place(decoration);
    }
}

pub fn populate_chunk(
    plan: &GenerationPlan,
    config: &RunConfig,
    chunk: ChunkPos,
    volume: &mut dyn PopulatorVolume,
    sink: Option<&mut dyn EventSink>,
) -> ChunkReport {
    if let Some(s) = sink {
        populate_chunk_with_events(plan, config, chunk, volume, s)
    } else {
        populate_chunk_with_events(plan, config, chunk, volume, &mut ())
    }
}

pub fn populate_chunk_with_events(
    plan: &GenerationPlan,
    config: &RunConfig,
    chunk: ChunkPos,
    volume: &mut dyn PopulatorVolume,
    sink: &mut dyn EventSink,
) -> ChunkReport {
    debug_assert!(config.chunk_size > 0, "chunk_size must be > 0");

    if sink.wants(PopulateEventKind::ChunkStarted) {
        sink.send(PopulateEvent::ChunkStarted {
            chunk,
            populator_count: plan.len(),
        });
    }

    if plan.is_empty() {
        warn!("Generation plan has no populators.");
        if sink.wants(PopulateEventKind::Warning) {
            sink.send(PopulateEvent::Warning {
                context: format!("chunk:{chunk}"),
                message: "Generation plan has no populators".into(),
            });
        }
    }

    let mut report = ChunkReport::new(chunk);
    match config.area_for(chunk) {
        Ok(area) => run_populators(plan, config, &area, volume, sink, &mut report),
        Err(e) => {
            report.populators_failed = plan.len();
            warn!("Skipping chunk {}: {}.", chunk, e);
            if sink.wants(PopulateEventKind::Warning) {
                sink.send(PopulateEvent::Warning {
                    context: format!("chunk:{chunk}"),
                    message: format!("Chunk skipped: {e}"),
                });
            }
        }
    }

    info!(
        "Chunk {}: {} populators run, {} failed, {} decorations.",
        chunk, report.populators_run, report.populators_failed, report.decorations_placed
    );

    if sink.wants(PopulateEventKind::ChunkFinished) {
        sink.send(PopulateEvent::ChunkFinished {
            report: report.clone(),
        });
    }

    report
}

fn run_populators(
    plan: &GenerationPlan,
    config: &RunConfig,
    area: &ChunkArea,
    volume: &mut dyn PopulatorVolume,
    sink: &mut dyn EventSink,
    report: &mut ChunkReport,
) {
    let chunk = area.chunk;
    let mut rng = StdRng::seed_from_u64(seed_for_chunk(config.world_seed, chunk));

    for (index, populator) in plan.populators.iter().enumerate() {
        let populator_type = populator.populator_type();
        if sink.wants(PopulateEventKind::PopulatorStarted) {
            sink.send(PopulateEvent::PopulatorStarted {
                index,
                populator_type,
            });
        }

        let mut observed = ObservedVolume {
            inner: &mut *volume,
            sink: &mut *sink,
            index,
            placed: 0,
        };
        let outcome = populator.populate(area, &mut observed, &mut rng);
        let placed = observed.placed;
        report.decorations_placed += placed;

        match outcome {
            Ok(()) => {
                report.populators_run += 1;
                if sink.wants(PopulateEventKind::PopulatorFinished) {
                    sink.send(PopulateEvent::PopulatorFinished {
                        index,
                        populator_type,
                        decorations: placed,
                    });
                }
            }
            Err(e) => {
                report.populators_failed += 1;
                warn!(
                    "Populator {} ('{}') failed in chunk {}: {}.",
                    index, populator_type, chunk, e
                );
                if sink.wants(PopulateEventKind::Warning) {
                    sink.send(PopulateEvent::Warning {
                        context: format!("chunk:{chunk} populator:{index}"),
                        message: format!("Populator failed: {e}"),
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::RngCore;

    use super::*;
    use crate::amount::VariableAmount;
    use crate::generation::events::VecSink;
    use crate::generation::populators::EnderCrystalPlatform;
    use crate::generation::tests::TestVolume;
    use crate::generation::PopulatorType;

    struct FailingPopulator;

    impl Populator for FailingPopulator {
        fn populator_type(&self) -> PopulatorType {
            PopulatorType::EnderCrystalPlatform
        }

        fn populate(
            &self,
            _area: &ChunkArea,
            _volume: &mut dyn PopulatorVolume,
            _rng: &mut dyn RngCore,
        ) -> Result<()> {
            Err("boom".into())
        }
    }

    fn always_platform() -> EnderCrystalPlatform {
        let mut builder = EnderCrystalPlatform::builder();
        builder
            .chance(1.0)
            .height(VariableAmount::range(5.0, 10.0))
            .radius(VariableAmount::fixed(2.0));
        builder.build().unwrap()
    }

    #[test]
    fn config_validation_rejects_zero_chunk_size() {
        assert!(RunConfig::new(1).validate().is_ok());
        assert!(PopulationRunner::try_new(RunConfig::new(1).with_chunk_size(0)).is_err());
    }

    #[test]
    fn same_seed_and_chunk_give_same_decorations() {
        let plan = GenerationPlan::new().with_populator(always_platform());
        let runner = PopulationRunner::try_new(RunConfig::new(99)).unwrap();

        let mut a = TestVolume::flat(60);
        let mut b = TestVolume::flat(60);
        runner.populate(&plan, ChunkPos(4, -2), &mut a);
        runner.populate(&plan, ChunkPos(4, -2), &mut b);
        assert_eq!(a.placed, b.placed);
        assert_eq!(a.placed.len(), 1);

        let Decoration::Pillar(pillar) = &a.placed[0];
        let area = runner.config.area_for(ChunkPos(4, -2)).unwrap();
        assert!(area.contains(pillar.base.x, pillar.base.z));
    }

    #[test]
    fn failing_populator_does_not_stop_the_chunk() {
        let plan = GenerationPlan::new()
            .with_populator(FailingPopulator)
            .with_populator(always_platform());
        let runner = PopulationRunner::try_new(RunConfig::new(5)).unwrap();
        let mut volume = TestVolume::flat(64);
        let mut sink = VecSink::new();

        let report =
            runner.populate_with_events(&plan, ChunkPos(0, 0), &mut volume, &mut sink);

        assert_eq!(report.populators_run, 1);
        assert_eq!(report.populators_failed, 1);
        assert_eq!(report.decorations_placed, 1);
        assert_eq!(volume.placed.len(), 1);

        let events = sink.into_inner();
        assert!(events.iter().any(|e| matches!(
            e,
            PopulateEvent::Warning { context, .. } if context == "chunk:[0, 0] populator:0"
        )));
        assert!(matches!(
            events.last(),
            Some(PopulateEvent::ChunkFinished { report: r }) if *r == report
        ));
    }

    #[test]
    fn events_follow_populator_order() {
        let plan = GenerationPlan::new()
            .with_populator(always_platform())
            .with_boxed(Box::new(always_platform()));
        let mut volume = TestVolume::flat(10);
        let mut sink = VecSink::new();

        populate_chunk(
            &plan,
            &RunConfig::new(7),
            ChunkPos(1, 1),
            &mut volume,
            Some(&mut sink),
        );

        let kinds: Vec<_> = sink
            .as_slice()
            .iter()
            .map(|e| match e {
                PopulateEvent::ChunkStarted { .. } => "chunk_started".to_string(),
                PopulateEvent::PopulatorStarted { index, .. } => format!("started:{index}"),
                PopulateEvent::DecorationPlaced { index, .. } => format!("placed:{index}"),
                PopulateEvent::PopulatorFinished { index, .. } => format!("finished:{index}"),
                PopulateEvent::ChunkFinished { .. } => "chunk_finished".to_string(),
                PopulateEvent::Warning { .. } => "warning".to_string(),
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                "chunk_started",
                "started:0",
                "placed:0",
                "finished:0",
                "started:1",
                "placed:1",
                "finished:1",
                "chunk_finished",
            ]
        );
    }

    #[test]
    fn chunk_outside_block_range_is_skipped_with_a_warning() {
        let plan = GenerationPlan::new()
            .with_populator(always_platform())
            .with_populator(always_platform());
        let runner = PopulationRunner::try_new(RunConfig::new(3)).unwrap();
        let mut volume = TestVolume::flat(64);
        let mut sink = VecSink::new();
        let far = ChunkPos(i32::MAX / 16 + 1, 0);

        let report = runner.populate_with_events(&plan, far, &mut volume, &mut sink);

        assert_eq!(report.populators_run, 0);
        assert_eq!(report.populators_failed, 2);
        assert_eq!(report.decorations_placed, 0);
        assert!(volume.placed.is_empty());
        let events = sink.into_inner();
        assert!(events.iter().any(|e| matches!(
            e,
            PopulateEvent::Warning { message, .. } if message.starts_with("Chunk skipped")
        )));
        assert!(matches!(
            events.last(),
            Some(PopulateEvent::ChunkFinished { report: r }) if *r == report
        ));
    }

    #[test]
    fn empty_plan_warns() {
        let mut volume = TestVolume::flat(10);
        let mut sink = VecSink::new();
        let report = populate_chunk(
            &GenerationPlan::new(),
            &RunConfig::default(),
            ChunkPos(0, 0),
            &mut volume,
            Some(&mut sink),
        );
        assert_eq!(report, ChunkReport::new(ChunkPos(0, 0)));
        assert!(sink
            .as_slice()
            .iter()
            .any(|e| matches!(e, PopulateEvent::Warning { .. })));
    }
}
