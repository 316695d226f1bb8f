//! Chunk utilities for population.
//!
//! Convert between block and chunk coordinates and derive deterministic
//! per-chunk seeds from a world seed.
use glam::IVec2;

use crate::generation::ChunkPos;

/// Computes the chunk containing the given (x, z) block.
pub fn chunk_for_block(x: i32, z: i32, chunk_size: u32) -> ChunkPos {
    debug_assert!(chunk_size > 0, "chunk_size must be > 0");
    let size = chunk_size as i32;
    ChunkPos(x.div_euclid(size), z.div_euclid(size))
}

/// Computes the lowest (x, z) block of a chunk, or `None` if it does not fit
/// in block coordinates.
pub fn chunk_min_block(chunk: ChunkPos, chunk_size: u32) -> Option<IVec2> {
    let size = i32::try_from(chunk_size).ok()?;
    Some(IVec2::new(
        chunk.0.checked_mul(size)?,
        chunk.1.checked_mul(size)?,
    ))
}

/// Creates a deterministic seed for a chunk from a world seed.
pub fn seed_for_chunk(world_seed: u64, chunk: ChunkPos) -> u64 {
    let cx = chunk.0 as i64 as u64;
    let cz = chunk.1 as i64 as u64;
    let mixed =
        world_seed ^ cx.wrapping_mul(0x9E3779B97F4A7C15) ^ cz.wrapping_mul(0xBF58476D1CE4E5B9);
    mix_u64(mixed)
}

#[inline]
fn mix_u64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xBF58476D1CE4E5B9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94D049BB133111EB);
    x ^ (x >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_blocks_round_toward_negative_infinity() {
        assert_eq!(chunk_for_block(0, 0, 16), ChunkPos(0, 0));
        assert_eq!(chunk_for_block(15, 16, 16), ChunkPos(0, 1));
        assert_eq!(chunk_for_block(-1, -16, 16), ChunkPos(-1, -1));
        assert_eq!(chunk_for_block(-17, 5, 16), ChunkPos(-2, 0));
    }

    #[test]
    fn chunk_min_block_inverts_chunk_for_block() {
        let chunk = ChunkPos(-3, 7);
        let min = chunk_min_block(chunk, 16).unwrap();
        assert_eq!(min, IVec2::new(-48, 112));
        assert_eq!(chunk_for_block(min.x, min.y, 16), chunk);
        assert_eq!(chunk_for_block(min.x + 15, min.y + 15, 16), chunk);
    }

    #[test]
    fn chunk_min_block_rejects_out_of_range_chunks() {
        assert!(chunk_min_block(ChunkPos(i32::MAX / 16 + 1, 0), 16).is_none());
        assert!(chunk_min_block(ChunkPos(0, i32::MIN / 16 - 1), 16).is_none());
        assert!(chunk_min_block(ChunkPos(1, 1), u32::MAX).is_none());
        assert_eq!(
            chunk_min_block(ChunkPos(i32::MAX / 16, 0), 16),
            Some(IVec2::new(i32::MAX / 16 * 16, 0))
        );
    }

    #[test]
    fn chunk_seeds_are_stable_and_distinct() {
        let a = seed_for_chunk(42, ChunkPos(0, 0));
        assert_eq!(a, seed_for_chunk(42, ChunkPos(0, 0)));
        assert_ne!(a, seed_for_chunk(42, ChunkPos(1, 0)));
        assert_ne!(a, seed_for_chunk(42, ChunkPos(0, 1)));
        assert_ne!(a, seed_for_chunk(43, ChunkPos(0, 0)));
        assert_ne!(
            seed_for_chunk(42, ChunkPos(1, 2)),
            seed_for_chunk(42, ChunkPos(2, 1))
        );
    }
}
