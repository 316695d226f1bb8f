//! World generation contracts: populators, the host volume they write into,
//! and the decorations they request.
//!
//! The host world generator calls [`Populator::populate`] once per chunk with a
//! [`ChunkArea`] and a random source. Populators never touch blocks directly;
//! they look up surface heights through a [`PopulatorVolume`] and hand it
//! [`Decoration`]s to build.
use std::fmt;

use glam::{IVec2, IVec3};
use rand::RngCore;

use crate::error::{Error, Result};

pub mod chunk;
pub mod events;
pub mod populators;
pub mod runner;

/// Chunk coordinates (x, z).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct ChunkPos(pub i32, pub i32);

impl fmt::Display for ChunkPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.0, self.1)
    }
}

/// The block area a populator decorates for one chunk.
///
/// `min` is already shifted by the populate offset, so the area straddles the
/// chunk and its positive neighbours.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkArea {
    pub chunk: ChunkPos,
    /// Lowest (x, z) block of the area.
    pub min: IVec2,
    /// Edge length in blocks.
    pub size: u32,
}

impl ChunkArea {
    /// Fails if the offset area of `chunk` does not fit in block coordinates.
    pub fn new(chunk: ChunkPos, chunk_size: u32, populate_offset: i32) -> Result<Self> {
        let out_of_range = || {
            Error::InvalidConfig(format!(
                "chunk {chunk} with size {chunk_size} and offset {populate_offset} \
                 is outside block coordinates"
            ))
        };
        let origin = chunk::chunk_min_block(chunk, chunk_size).ok_or_else(out_of_range)?;
        let min = IVec2::new(
            origin.x.checked_add(populate_offset).ok_or_else(out_of_range)?,
            origin.y.checked_add(populate_offset).ok_or_else(out_of_range)?,
        );
        Ok(Self {
            chunk,
            min,
            size: chunk_size,
        })
    }

    /// Returns `true` if the (x, z) block lies inside the area.
    pub fn contains(&self, x: i32, z: i32) -> bool {
        let inside = |v: i32, lo: i32| {
            let rel = v as i64 - lo as i64;
            rel >= 0 && rel < self.size as i64
        };
        inside(x, self.min.x) && inside(z, self.min.y)
    }

    /// Block `offset` steps along an axis from `start`, or an error if it
    /// leaves block coordinates.
    pub(crate) fn offset_block(start: i32, offset: u32) -> Result<i32> {
        i32::try_from(start as i64 + offset as i64).map_err(|_| {
            Error::Other(format!(
                "block {start} + {offset} is outside block coordinates"
            ))
        })
    }
}

/// Identifies a populator implementation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum PopulatorType {
    EnderCrystalPlatform,
}

impl PopulatorType {
    pub fn id(&self) -> &'static str {
        match self {
            PopulatorType::EnderCrystalPlatform => "minecraft:ender_crystal_platform",
        }
    }
}

impl fmt::Display for PopulatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Entities a decoration can spawn on top of itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum CrestEntity {
    EnderCrystal,
}

/// A pillar with an entity standing on its peak.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pillar {
    /// Block the pillar rises from.
    pub base: IVec3,
    pub height: u32,
    pub radius: u32,
    pub crest: CrestEntity,
}

impl Pillar {
    /// Block position of the crest entity. Saturates at the top of block
    /// coordinates.
    pub fn peak(&self) -> IVec3 {
        let height = i32::try_from(self.height).unwrap_or(i32::MAX);
        IVec3::new(self.base.x, self.base.y.saturating_add(height), self.base.z)
    }
}

/// A placement request handed to the host.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Decoration {
    Pillar(Pillar),
}

/// Host-provided view of the world around the chunk being populated.
pub trait PopulatorVolume {
    /// Y of the highest solid block in the (x, z) column, if the column is
    /// loaded and has one.
    fn surface_y(&self, x: i32, z: i32) -> Option<i32>;

    /// Builds a decoration.
    fn place(&mut self, decoration: Decoration);
}

/// A configurable unit that decorates a chunk.
///
/// `populate` takes `&self`: a configured populator can be shared between
/// generation workers, each supplying its own RNG and volume.
pub trait Populator: Send + Sync {
    fn populator_type(&self) -> PopulatorType;

    fn populate(
        &self,
        area: &ChunkArea,
        volume: &mut dyn PopulatorVolume,
        rng: &mut dyn RngCore,
    ) -> Result<()>;
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;

    use super::*;

    /// Flat in-memory volume recording every decoration.
    #[derive(Default)]
    pub(crate) struct TestVolume {
        pub(crate) surface: Option<i32>,
        pub(crate) overrides: HashMap<(i32, i32), Option<i32>>,
        pub(crate) placed: Vec<Decoration>,
    }

    impl TestVolume {
        pub(crate) fn flat(surface: i32) -> Self {
            Self {
                surface: Some(surface),
                ..Default::default()
            }
        }
    }

    impl PopulatorVolume for TestVolume {
        fn surface_y(&self, x: i32, z: i32) -> Option<i32> {
            self.overrides.get(&(x, z)).copied().unwrap_or(self.surface)
        }

        fn place(&mut self, decoration: Decoration) {
            self.placed.push(decoration);
        }
    }

    #[test]
    fn chunk_area_is_offset_from_chunk_origin() {
        let area = ChunkArea::new(ChunkPos(2, -1), 16, 8).unwrap();
        assert_eq!(area.min, IVec2::new(40, -8));
        assert!(area.contains(40, -8));
        assert!(area.contains(55, 7));
        assert!(!area.contains(56, 0));
        assert!(!area.contains(39, 0));
    }

    #[test]
    fn far_chunks_are_rejected_instead_of_wrapping() {
        assert!(matches!(
            ChunkArea::new(ChunkPos(i32::MAX / 16 + 1, 0), 16, 8),
            Err(Error::InvalidConfig(_))
        ));
        // The chunk origin fits, but shifting it by the offset does not.
        assert!(ChunkArea::new(ChunkPos(i32::MAX / 16, 0), 16, 16).is_err());

        let edge = ChunkArea {
            chunk: ChunkPos(0, 0),
            min: IVec2::splat(i32::MAX - 3),
            size: 16,
        };
        assert!(edge.contains(i32::MAX, i32::MAX));
        assert!(!edge.contains(i32::MIN, i32::MAX));
    }

    #[test]
    fn offset_block_reports_overflow() {
        assert_eq!(ChunkArea::offset_block(-5, 10).unwrap(), 5);
        assert!(ChunkArea::offset_block(i32::MAX - 1, 2).is_err());
    }

    #[test]
    fn pillar_peak_saturates_for_tall_pillars() {
        let pillar = Pillar {
            base: IVec3::new(0, 65, 0),
            height: 3_000_000_000,
            radius: 1,
            crest: CrestEntity::EnderCrystal,
        };
        assert_eq!(pillar.peak(), IVec3::new(0, i32::MAX, 0));
        assert!(pillar.peak().y >= pillar.base.y);
    }

    #[test]
    fn pillar_peak_sits_on_top() {
        let pillar = Pillar {
            base: IVec3::new(1, 64, 1),
            height: 10,
            radius: 2,
            crest: CrestEntity::EnderCrystal,
        };
        assert_eq!(pillar.peak(), IVec3::new(1, 74, 1));
    }

    #[test]
    fn display_formats() {
        assert_eq!(ChunkPos(3, -4).to_string(), "[3, -4]");
        assert_eq!(
            PopulatorType::EnderCrystalPlatform.to_string(),
            "minecraft:ender_crystal_platform"
        );
    }
}
