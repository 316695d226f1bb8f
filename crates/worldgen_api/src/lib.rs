#![forbid(unsafe_code)]
//! worldgen_api: plugin-facing world generation contracts.
//!
//! Modules:
//! - amount: sampled numeric distributions consumed by populator settings
//! - catalog: host-registered variant registries (rabbit types)
//! - generation: populators, their builders, the host volume trait, and a reference chunk runner
//!
//! For examples, see the `worldgen_api_examples` crate.
pub mod amount;
pub mod catalog;
pub mod error;
pub mod generation;
mod random;

/// Convenient re-exports for common types. Import with `use worldgen_api::prelude::*;`.
pub mod prelude {
    pub use crate::amount::{VariableAmount, WeightedAmount};
    pub use crate::catalog::{CatalogRegistry, CatalogType, RabbitType, RabbitTypes};
    pub use crate::error::{Error, Result};
    pub use crate::generation::chunk::{chunk_for_block, chunk_min_block, seed_for_chunk};
    pub use crate::generation::events::{
        EventSink, FilterSink, FnSink, PopulateEvent, PopulateEventKind, VecSink,
    };
    pub use crate::generation::populators::{
        BuilderState, EnderCrystalPlatform, EnderCrystalPlatformBuilder, PlatformDefaults,
        DEFAULT_SPAWN_PROBABILITY,
    };
    pub use crate::generation::runner::{
        populate_chunk, ChunkReport, GenerationPlan, PopulationRunner, RunConfig,
    };
    pub use crate::generation::{
        ChunkArea, ChunkPos, CrestEntity, Decoration, Pillar, Populator, PopulatorType,
        PopulatorVolume,
    };
}
