// Copyright (c) 2026 rezky_nightky

use rand::{rngs::StdRng, Rng};

use crate::column::Column;
use crate::droplet::{Sampler, Tally};

/// Cells that fit along `extent`; zero for any degenerate input.
fn cells_along(extent: f32, cell_size: f32) -> usize {
    if !extent.is_finite() || !cell_size.is_finite() || extent <= 0.0 || cell_size <= 0.0 {
        return 0;
    }
    (extent / cell_size).floor() as usize
}

/// All columns of one surface.
///
/// Geometry is fixed at construction. [`Grid::tick`] is the only mutation;
/// rendering reads through [`Grid::columns`].
#[derive(Clone, Debug)]
pub struct Grid<R = StdRng> {
    num_cols: usize,
    num_rows: usize,
    cell_size: f32,
    columns: Vec<Column>,
    sampler: Sampler,
    rng: R,
}

impl<R: Rng> Grid<R> {
    pub fn new(width: f32, height: f32, cell_size: f32, sampler: Sampler, rng: R) -> Self {
        let num_cols = cells_along(width, cell_size);
        let num_rows = cells_along(height, cell_size);
        Self::with_cells(num_cols, num_rows, cell_size, sampler, rng)
    }

    /// Builds a grid whose size is already known in whole cells, as when
    /// the surface is a block of terminal cells.
    pub fn with_cells(
        num_cols: usize,
        num_rows: usize,
        cell_size: f32,
        sampler: Sampler,
        mut rng: R,
    ) -> Self {
        let (num_cols, num_rows) = if cell_size.is_finite() && cell_size > 0.0 {
            (num_cols, num_rows)
        } else {
            (0, 0)
        };
        let columns = (0..num_cols)
            .map(|_| Column::new(num_rows, &sampler, &mut rng))
            .collect();

        if num_cols == 0 || num_rows == 0 {
            tracing::debug!(
                num_cols,
                num_rows,
                cell_size,
                "surface holds no cells; nothing to render"
            );
        } else {
            tracing::debug!(num_cols, num_rows, cell_size, "grid built");
        }

        Self {
            num_cols,
            num_rows,
            cell_size,
            columns,
            sampler,
            rng,
        }
    }

    /// Advances every droplet by one frame.
    pub fn tick(&mut self) -> Tally {
        let num_rows = self.num_rows;
        let tally = self
            .columns
            .iter_mut()
            .map(|c| c.advance_all(num_rows, &self.sampler, &mut self.rng))
            .fold(Tally::default(), Tally::merge);
        if tally.recycled > 0 {
            tracing::trace!(
                recycled = tally.recycled,
                flickered = tally.flickered,
                "droplets recycled"
            );
        }
        tally
    }
}

impl<R> Grid<R> {
    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn is_empty(&self) -> bool {
        self.num_cols == 0 || self.num_rows == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn droplet_count(&self) -> usize {
        self.columns.iter().map(|c| c.drops().len()).sum()
    }

    #[cfg(test)]
    pub fn with_columns(
        num_rows: usize,
        cell_size: f32,
        sampler: Sampler,
        rng: R,
        columns: Vec<Column>,
    ) -> Self {
        Self {
            num_cols: columns.len(),
            num_rows,
            cell_size,
            columns,
            sampler,
            rng,
        }
    }
}
