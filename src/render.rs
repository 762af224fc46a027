// Copyright (c) 2026 rezky_nightky

use std::sync::Arc;

use crate::color::Rgba;
use crate::grid::Grid;
use crate::ramp::ColorRamp;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

/// A monospace face; one glyph fills one `size x size` cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphFont {
    pub size: f32,
}

/// Something glyphs can be painted on. The origin is the bottom-left corner.
pub trait Surface {
    fn bounds(&self) -> Size;
    fn fill_rect(&mut self, rect: Rect, color: Rgba);
    fn draw_glyph(&mut self, ch: char, at: Point, font: &GlyphFont, color: Rgba);
}

/// Projects a grid onto a surface. Holds nothing mutable, so any number of
/// renderers can share one ramp.
#[derive(Clone, Debug)]
pub struct Renderer {
    ramp: Arc<ColorRamp>,
}

impl Renderer {
    pub fn new(ramp: Arc<ColorRamp>) -> Self {
        Self { ramp }
    }

    pub fn render<R, S: Surface + ?Sized>(&self, grid: &Grid<R>, surface: &mut S) {
        let bounds = surface.bounds();
        surface.fill_rect(
            Rect {
                origin: Point { x: 0.0, y: 0.0 },
                size: bounds,
            },
            Rgba::BLACK,
        );

        let cs = grid.cell_size();
        let font = GlyphFont { size: cs };
        let num_rows = grid.num_rows() as i64;

        for (ci, column) in grid.columns().iter().enumerate() {
            let x = ci as f32 * cs;
            for d in column.drops() {
                let head = d.head().floor() as i64;
                for t in 0..d.length() as usize {
                    let row = head - t as i64;
                    if row < 0 || row >= num_rows {
                        continue;
                    }
                    let at = Point {
                        x,
                        y: bounds.height - (row + 1) as f32 * cs,
                    };
                    surface.draw_glyph(d.glyph(t), at, &font, self.ramp.at(t));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::column::Column;
    use crate::droplet::{Droplet, Sampler};
    use crate::glyphs::GlyphTable;

    #[derive(Clone, Debug, PartialEq)]
    pub enum Op {
        Fill(Rect, Rgba),
        Glyph(char, Point, Rgba),
    }

    /// Records every call so tests can inspect exactly what was painted.
    pub struct Recording {
        pub size: Size,
        pub ops: Vec<Op>,
    }

    impl Recording {
        pub fn new(width: f32, height: f32) -> Self {
            Self {
                size: Size { width, height },
                ops: Vec::new(),
            }
        }

        pub fn glyphs(&self) -> Vec<(char, Point, Rgba)> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    Op::Glyph(c, p, col) => Some((*c, *p, *col)),
                    Op::Fill(..) => None,
                })
                .collect()
        }
    }

    impl Surface for Recording {
        fn bounds(&self) -> Size {
            self.size
        }

        fn fill_rect(&mut self, rect: Rect, color: Rgba) {
            self.ops.push(Op::Fill(rect, color));
        }

        fn draw_glyph(&mut self, ch: char, at: Point, _font: &GlyphFont, color: Rgba) {
            self.ops.push(Op::Glyph(ch, at, color));
        }
    }

    fn sampler() -> Sampler {
        Sampler::new(22, Arc::new(GlyphTable::rain()))
    }

    fn one_droplet_grid(rows: usize, d: Droplet) -> Grid {
        Grid::with_columns(
            rows,
            18.0,
            sampler(),
            StdRng::seed_from_u64(0),
            vec![Column::from_droplets(vec![d])],
        )
    }

    #[test]
    fn clears_to_black_first() {
        let grid = one_droplet_grid(10, Droplet::fixed(5.0, 1.0, "abc"));
        let mut s = Recording::new(18.0, 180.0);
        Renderer::new(Arc::new(ColorRamp::new(22))).render(&grid, &mut s);
        assert_eq!(
            s.ops[0],
            Op::Fill(
                Rect {
                    origin: Point { x: 0.0, y: 0.0 },
                    size: Size {
                        width: 18.0,
                        height: 180.0
                    },
                },
                Rgba::BLACK
            )
        );
    }

    #[test]
    fn short_droplet_paints_head_and_two_near_head_cells() {
        let ramp = Arc::new(ColorRamp::new(22));
        let grid = one_droplet_grid(10, Droplet::fixed(5.0, 1.0, "abc"));
        let mut s = Recording::new(18.0, 180.0);
        Renderer::new(ramp.clone()).render(&grid, &mut s);

        assert_eq!(
            s.glyphs(),
            vec![
                ('a', Point { x: 0.0, y: 72.0 }, ramp.at(0)),
                ('b', Point { x: 0.0, y: 90.0 }, ramp.at(1)),
                ('c', Point { x: 0.0, y: 108.0 }, ramp.at(2)),
            ]
        );
    }

    #[test]
    fn droplet_above_screen_draws_nothing() {
        let grid = one_droplet_grid(10, Droplet::fixed(-3.0, 1.0, "abcdef"));
        let mut s = Recording::new(18.0, 180.0);
        Renderer::new(Arc::new(ColorRamp::new(22))).render(&grid, &mut s);
        assert!(s.glyphs().is_empty());
    }

    #[test]
    fn partly_visible_trails_are_clipped() {
        let grid = one_droplet_grid(10, Droplet::fixed(12.7, 1.0, "abcdef"));
        let mut s = Recording::new(18.0, 180.0);
        Renderer::new(Arc::new(ColorRamp::new(22))).render(&grid, &mut s);
        // rows 12, 11, 10 are below the bottom edge; 9, 8, 7 remain
        let g = s.glyphs();
        assert_eq!(g.len(), 3);
        assert_eq!(g[0].0, 'd');
        assert_eq!(g[0].1.y, 0.0);
        assert_eq!(g[2].1.y, 36.0);
    }

    #[test]
    fn never_paints_outside_rows() {
        let mut grid = Grid::new(360.0, 180.0, 18.0, sampler(), StdRng::seed_from_u64(3));
        let renderer = Renderer::new(Arc::new(ColorRamp::new(22)));
        for _ in 0..300 {
            grid.tick();
            let mut s = Recording::new(360.0, 180.0);
            renderer.render(&grid, &mut s);
            for (_, p, _) in s.glyphs() {
                assert!(p.y >= 0.0 && p.y <= 180.0 - 18.0, "y {}", p.y);
                assert!(p.x >= 0.0 && p.x < 360.0, "x {}", p.x);
            }
        }
    }

    #[test]
    fn rendering_twice_is_identical() {
        let mut grid = Grid::new(360.0, 360.0, 18.0, sampler(), StdRng::seed_from_u64(4));
        for _ in 0..40 {
            grid.tick();
        }
        let renderer = Renderer::new(Arc::new(ColorRamp::new(22)));
        let mut a = Recording::new(360.0, 360.0);
        let mut b = Recording::new(360.0, 360.0);
        renderer.render(&grid, &mut a);
        renderer.render(&grid, &mut b);
        assert_eq!(a.ops, b.ops);
        assert!(!a.glyphs().is_empty());
    }

    #[test]
    fn empty_grid_only_clears() {
        let grid = Grid::new(5.0, 5.0, 18.0, sampler(), StdRng::seed_from_u64(5));
        let mut s = Recording::new(5.0, 5.0);
        Renderer::new(Arc::new(ColorRamp::new(22))).render(&grid, &mut s);
        assert_eq!(s.ops.len(), 1);
    }
}
