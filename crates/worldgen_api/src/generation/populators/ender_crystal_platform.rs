//! Populator that raises large obsidian pillars with an ender crystal at the
//! peak, as found in the End.
//!
//! Configure it either directly through the setters on [`EnderCrystalPlatform`]
//! or with an [`EnderCrystalPlatformBuilder`]. Height and radius are
//! [`VariableAmount`]s and are re-sampled for every pillar; any distribution
//! that could produce a negative value, or a value beyond `i32::MAX` blocks,
//! is rejected when it is configured, so generation never has to clamp.
use glam::IVec3;
use rand::RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::amount::VariableAmount;
use crate::error::{Error, Result};
use crate::generation::{
    ChunkArea, CrestEntity, Decoration, Pillar, Populator, PopulatorType, PopulatorVolume,
};
use crate::random::{rand_below, roll};

/// Probability of a pillar spawning in a chunk when none is configured.
pub const DEFAULT_SPAWN_PROBABILITY: f64 = 0.2;

const FIELD_CHANCE: &str = "chance";
const FIELD_HEIGHT: &str = "height";
const FIELD_RADIUS: &str = "radius";

/// An ender crystal platform populator.
#[derive(Clone, Debug, PartialEq)]
pub struct EnderCrystalPlatform {
    spawn_probability: f64,
    height: VariableAmount,
    radius: VariableAmount,
}

impl EnderCrystalPlatform {
    /// Returns a builder using [`PlatformDefaults::default`].
    pub fn builder() -> EnderCrystalPlatformBuilder {
        EnderCrystalPlatformBuilder::new()
    }

    /// Returns a builder pre-filled with this populator's settings.
    pub fn to_builder(&self) -> EnderCrystalPlatformBuilder {
        let mut builder = EnderCrystalPlatformBuilder::new();
        builder
            .chance(self.spawn_probability)
            .height(self.height.clone())
            .radius(self.radius.clone());
        builder
    }

    /// Probability of a pillar spawning in a chunk.
    pub fn spawn_probability(&self) -> f64 {
        self.spawn_probability
    }

    /// Sets the probability of a pillar spawning in a chunk.
    ///
    /// Values outside `[0, 1]` are accepted as given: below 0 never spawns,
    /// above 1 always does.
    pub fn set_spawn_probability(&mut self, p: f64) {
        log_unusual_chance(p);
        self.spawn_probability = p;
    }

    pub fn height(&self) -> &VariableAmount {
        &self.height
    }

    /// Sets the pillar height. Rejects distributions that could go negative
    /// or past `i32::MAX` and keeps the previous height in that case.
    pub fn set_height(&mut self, height: VariableAmount) -> Result<()> {
        ensure_extent(FIELD_HEIGHT, &height)?;
        self.height = height;
        Ok(())
    }

    pub fn radius(&self) -> &VariableAmount {
        &self.radius
    }

    /// Sets the pillar radius. Rejects distributions that could go negative
    /// or past `i32::MAX` and keeps the previous radius in that case.
    pub fn set_radius(&mut self, radius: VariableAmount) -> Result<()> {
        ensure_extent(FIELD_RADIUS, &radius)?;
        self.radius = radius;
        Ok(())
    }
}

impl Populator for EnderCrystalPlatform {
    fn populator_type(&self) -> PopulatorType {
        PopulatorType::EnderCrystalPlatform
    }

    fn populate(
        &self,
        area: &ChunkArea,
        volume: &mut dyn PopulatorVolume,
        rng: &mut dyn RngCore,
    ) -> Result<()> {
        if !roll(rng, self.spawn_probability) {
            return Ok(());
        }

        let x = ChunkArea::offset_block(area.min.x, rand_below(rng, area.size))?;
        let z = ChunkArea::offset_block(area.min.y, rand_below(rng, area.size))?;
        let Some(surface) = volume.surface_y(x, z) else {
            debug!(
                "No surface at ({}, {}) in chunk {}; skipping ender crystal platform.",
                x, z, area.chunk
            );
            return Ok(());
        };

        let base_y = surface.checked_add(1).ok_or_else(|| {
            Error::Other(format!(
                "surface at ({x}, {z}) is the top of block coordinates"
            ))
        })?;
        let height = sample_extent(FIELD_HEIGHT, &self.height, rng)?;
        let radius = sample_extent(FIELD_RADIUS, &self.radius, rng)?;

        volume.place(Decoration::Pillar(Pillar {
            base: IVec3::new(x, base_y, z),
            height,
            radius,
            crest: CrestEntity::EnderCrystal,
        }));
        Ok(())
    }
}

fn sample_extent(
    field: &'static str,
    amount: &VariableAmount,
    rng: &mut dyn RngCore,
) -> Result<u32> {
    let value = amount.floored_amount(rng);
    if value < 0 {
        return Err(Error::NegativeAmount {
            field,
            min: value as f64,
        });
    }
    let value = i32::try_from(value).map_err(|_| {
        Error::InvalidAmount(format!("sampled {field} {value} exceeds {}", i32::MAX))
    })?;
    Ok(value as u32)
}

/// Height and radius must stay within `[0, i32::MAX]` blocks.
fn ensure_extent(field: &'static str, amount: &VariableAmount) -> Result<()> {
    amount.ensure_non_negative(field)?;
    let max = amount.max_bound();
    if max > i32::MAX as f64 {
        return Err(Error::InvalidAmount(format!(
            "'{field}' can reach {max}, above the {} block limit",
            i32::MAX
        )));
    }
    Ok(())
}

fn log_unusual_chance(p: f64) {
    if !(0.0..=1.0).contains(&p) {
        debug!("Spawn probability {} is outside [0, 1].", p);
    }
}

/// Settings the builder falls back to when a field is left unset.
///
/// A `None` entry makes the corresponding builder field required.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct PlatformDefaults {
    pub spawn_probability: Option<f64>,
    pub height: Option<VariableAmount>,
    pub radius: Option<VariableAmount>,
}

impl Default for PlatformDefaults {
    /// Probability 0.2, height `6 + rand * 32`, radius `1 + rand * 4`.
    fn default() -> Self {
        Self {
            spawn_probability: Some(DEFAULT_SPAWN_PROBABILITY),
            height: Some(VariableAmount::base_with_random_addition(6.0, 32.0)),
            radius: Some(VariableAmount::base_with_random_addition(1.0, 4.0)),
        }
    }
}

impl PlatformDefaults {
    /// Only the spawn probability has a default; height and radius must be set.
    pub fn probability_only() -> Self {
        Self {
            spawn_probability: Some(DEFAULT_SPAWN_PROBABILITY),
            height: None,
            radius: None,
        }
    }

    /// No defaults at all; every field must be set.
    pub fn none() -> Self {
        Self {
            spawn_probability: None,
            height: None,
            radius: None,
        }
    }

    pub fn with_spawn_probability(mut self, p: Option<f64>) -> Self {
        self.spawn_probability = p;
        self
    }

    pub fn with_height(mut self, height: Option<VariableAmount>) -> Self {
        self.height = height;
        self
    }

    pub fn with_radius(mut self, radius: Option<VariableAmount>) -> Self {
        self.radius = radius;
        self
    }

    /// Names of the builder fields that have no default.
    pub fn required_fields(&self) -> Vec<&'static str> {
        let mut required = Vec::new();
        if self.spawn_probability.is_none() {
            required.push(FIELD_CHANCE);
        }
        if self.height.is_none() {
            required.push(FIELD_HEIGHT);
        }
        if self.radius.is_none() {
            required.push(FIELD_RADIUS);
        }
        required
    }

    /// Validates the configured defaults, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if let Some(p) = self.spawn_probability {
            if !p.is_finite() {
                return Err(Error::InvalidConfig(format!(
                    "default spawn probability must be finite, got {p}"
                )));
            }
        }
        if let Some(height) = &self.height {
            ensure_extent(FIELD_HEIGHT, height)?;
        }
        if let Some(radius) = &self.radius {
            ensure_extent(FIELD_RADIUS, radius)?;
        }
        Ok(())
    }
}

/// Where a builder is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuilderState {
    /// Nothing set since creation or the last [`EnderCrystalPlatformBuilder::reset`].
    Empty,
    /// At least one field has been set.
    Accumulating,
}

/// Accumulates settings for an [`EnderCrystalPlatform`].
///
/// Setters chain through `&mut Self` and the last call for a field wins.
/// [`EnderCrystalPlatformBuilder::build`] leaves the builder untouched, so it
/// can produce further populators with the same or tweaked settings.
#[derive(Clone, Debug, Default)]
pub struct EnderCrystalPlatformBuilder {
    defaults: PlatformDefaults,
    chance: Option<f64>,
    height: Option<VariableAmount>,
    radius: Option<VariableAmount>,
}

impl EnderCrystalPlatformBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder whose unset fields fall back to `defaults`.
    pub fn with_defaults(defaults: PlatformDefaults) -> Self {
        Self {
            defaults,
            ..Self::default()
        }
    }

    pub fn defaults(&self) -> &PlatformDefaults {
        &self.defaults
    }

    pub fn state(&self) -> BuilderState {
        if self.chance.is_none() && self.height.is_none() && self.radius.is_none() {
            BuilderState::Empty
        } else {
            BuilderState::Accumulating
        }
    }

    /// Sets the probability of a pillar spawning in a chunk.
    pub fn chance(&mut self, p: f64) -> &mut Self {
        log_unusual_chance(p);
        self.chance = Some(p);
        self
    }

    /// Sets the height of the pillar.
    pub fn height(&mut self, height: VariableAmount) -> &mut Self {
        self.height = Some(height);
        self
    }

    /// Sets the base radius of the pillar.
    pub fn radius(&mut self, radius: VariableAmount) -> &mut Self {
        self.radius = Some(radius);
        self
    }

    /// Clears every field back to the defaults.
    pub fn reset(&mut self) -> &mut Self {
        self.chance = None;
        self.height = None;
        self.radius = None;
        self
    }

    /// Builds a new populator from the accumulated settings.
    ///
    /// Fails with [`Error::IllegalState`] naming every field that is unset and
    /// has no default, and with [`Error::NegativeAmount`] or
    /// [`Error::InvalidAmount`] if height or radius could produce a negative,
    /// non-finite or out-of-range value.
    pub fn build(&self) -> Result<EnderCrystalPlatform> {
        let chance = self.chance.or(self.defaults.spawn_probability);
        let height = self.height.as_ref().or(self.defaults.height.as_ref());
        let radius = self.radius.as_ref().or(self.defaults.radius.as_ref());

        let (Some(chance), Some(height), Some(radius)) = (chance, height, radius) else {
            let mut missing = Vec::new();
            if chance.is_none() {
                missing.push(FIELD_CHANCE);
            }
            if height.is_none() {
                missing.push(FIELD_HEIGHT);
            }
            if radius.is_none() {
                missing.push(FIELD_RADIUS);
            }
            debug!("Ender crystal platform builder is missing {:?}.", missing);
            return Err(Error::IllegalState { missing });
        };

        ensure_extent(FIELD_HEIGHT, height)?;
        ensure_extent(FIELD_RADIUS, radius)?;

        Ok(EnderCrystalPlatform {
            spawn_probability: chance,
            height: height.clone(),
            radius: radius.clone(),
        })
    }
}
