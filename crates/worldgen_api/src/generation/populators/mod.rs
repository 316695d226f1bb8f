//! Concrete populators.
pub mod ender_crystal_platform;

pub use ender_crystal_platform::{
    BuilderState, EnderCrystalPlatform, EnderCrystalPlatformBuilder, PlatformDefaults,
    DEFAULT_SPAWN_PROBABILITY,
};
