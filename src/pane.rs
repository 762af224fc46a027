// Copyright (c) 2026 rezky_nightky

use std::sync::Arc;

use rand::{rngs::StdRng, SeedableRng};

use crate::droplet::{Sampler, Tally};
use crate::frame::Frame;
use crate::glyphs::GlyphTable;
use crate::grid::Grid;
use crate::ramp::ColorRamp;
use crate::render::Renderer;

/// One independent surface: a strip of the terminal with its own grid.
///
/// Panes share the ramp and glyph table and nothing else.
pub struct Pane {
    start: u16,
    cols: u16,
    grid: Grid,
    renderer: Renderer,
}

impl Pane {
    pub fn tick(&mut self) -> Tally {
        self.grid.tick()
    }

    pub fn render(&self, frame: &mut Frame) {
        let mut region = frame.region(self.start, self.cols);
        self.renderer.render(&self.grid, &mut region);
    }

    #[cfg(test)]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }
}

/// Splits `width` terminal columns into `count` strips; the last strip takes
/// the remainder.
pub fn split_columns(width: u16, count: u8) -> Vec<(u16, u16)> {
    let count = count.max(1) as u16;
    let base = width / count;
    (0..count)
        .map(|i| {
            let start = i * base;
            let cols = if i + 1 == count { width - start } else { base };
            (start, cols)
        })
        .collect()
}

pub struct PaneLayout {
    pub width: u16,
    pub height: u16,
    pub cell_size: f32,
    pub max_trail: u16,
    pub count: u8,
    pub seed: Option<u64>,
}

pub fn build_panes(
    layout: &PaneLayout,
    ramp: &Arc<ColorRamp>,
    glyphs: &Arc<GlyphTable>,
) -> Vec<Pane> {
    split_columns(layout.width, layout.count)
        .into_iter()
        .enumerate()
        .map(|(i, (start, cols))| {
            let rng = match layout.seed {
                Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(i as u64)),
                None => StdRng::from_os_rng(),
            };
            let sampler = Sampler::new(layout.max_trail, Arc::clone(glyphs));
            let grid = Grid::with_cells(
                cols as usize,
                layout.height as usize,
                layout.cell_size,
                sampler,
                rng,
            );
            tracing::info!(
                pane = i,
                start,
                cols = grid.num_cols(),
                rows = grid.num_rows(),
                droplets = grid.droplet_count(),
                empty = grid.is_empty(),
                "pane ready"
            );
            Pane {
                start,
                cols,
                grid,
                renderer: Renderer::new(Arc::clone(ramp)),
            }
        })
        .collect()
}
