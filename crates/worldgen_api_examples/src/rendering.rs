use std::collections::HashMap;

use glam::IVec2;
use tracing_subscriber::EnvFilter;
use worldgen_api::prelude::{Decoration, Pillar, PopulatorVolume};

/// Installs a `fmt` subscriber honouring `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// In-memory volume with rolling hills and a void band where no surface exists.
pub struct HeightmapVolume {
    pub base_height: i32,
    /// Columns with `|z| < void_half_width` have no surface.
    pub void_half_width: i32,
    pub pillars: Vec<Pillar>,
    columns: HashMap<IVec2, usize>,
}

impl HeightmapVolume {
    pub fn new(base_height: i32, void_half_width: i32) -> Self {
        Self {
            base_height,
            void_half_width,
            pillars: Vec::new(),
            columns: HashMap::new(),
        }
    }

    /// The pillar rising from column (x, z), if any.
    pub fn pillar_at(&self, x: i32, z: i32) -> Option<&Pillar> {
        self.columns.get(&IVec2::new(x, z)).map(|&i| &self.pillars[i])
    }
}

impl PopulatorVolume for HeightmapVolume {
    fn surface_y(&self, x: i32, z: i32) -> Option<i32> {
        if z.abs() < self.void_half_width {
            return None;
        }
        let hill = ((x as f32 * 0.05).sin() + (z as f32 * 0.07).cos()) * 6.0;
        Some(self.base_height + hill as i32)
    }

    fn place(&mut self, decoration: Decoration) {
        match decoration {
            Decoration::Pillar(pillar) => {
                self.columns
                    .insert(IVec2::new(pillar.base.x, pillar.base.z), self.pillars.len());
                self.pillars.push(pillar);
            }
            other => tracing::warn!("Ignoring unsupported decoration {:?}.", other),
        }
    }
}

/// Renders pillar footprints inside `[min, min + size)` as text, one character
/// per `cell` blocks. `#` marks a pillar footprint, `*` its crest column.
pub fn render_pillars_ascii(
    volume: &HeightmapVolume,
    min: IVec2,
    size: IVec2,
    cell: i32,
) -> String {
    let cols = (size.x / cell).max(1);
    let rows = (size.y / cell).max(1);
    let mut grid = vec![vec!['.'; cols as usize]; rows as usize];

    for row in 0..rows {
        let z = min.y + row * cell;
        if z.abs() < volume.void_half_width {
            grid[row as usize].fill(' ');
        }
    }

    for pillar in &volume.pillars {
        let r = pillar.radius as i32;
        for dz in -r..=r {
            for dx in -r..=r {
                if dx * dx + dz * dz > r * r {
                    continue;
                }
                let x = pillar.base.x + dx - min.x;
                let z = pillar.base.z + dz - min.y;
                if x < 0 || z < 0 {
                    continue;
                }
                let (gx, gz) = (x / cell, z / cell);
                if gx >= cols || gz >= rows {
                    continue;
                }
                let cell_char = &mut grid[gz as usize][gx as usize];
                if *cell_char != '*' {
                    *cell_char = if dx == 0 && dz == 0 { '*' } else { '#' };
                }
            }
        }
    }

    grid.into_iter()
        .map(|row| row.into_iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
