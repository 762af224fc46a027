// Copyright (c) 2026 rezky_nightky

use std::sync::Arc;

use rand::{
    distr::{Distribution, Uniform},
    Rng,
};

use crate::glyphs::GlyphTable;
use crate::runtime::MIN_TRAIL;

/// Rows a trail must clear past the bottom edge before it is recycled.
pub const RECYCLE_MARGIN: f32 = 8.0;
/// Chance per tick that one cell of a droplet swaps its glyph.
pub const FLICKER_CHANCE: f64 = 0.2;
pub const MIN_SPEED: f32 = 0.5;
pub const MAX_SPEED: f32 = 1.6;

/// Random draws every droplet of a grid shares: trail length, speed, glyphs.
#[derive(Clone, Debug)]
pub struct Sampler {
    max_trail: u16,
    length: Uniform<u16>,
    speed: Uniform<f32>,
    glyphs: Arc<GlyphTable>,
}

impl Sampler {
    pub fn new(max_trail: u16, glyphs: Arc<GlyphTable>) -> Self {
        let max_trail = max_trail.max(MIN_TRAIL);
        Self {
            max_trail,
            length: Uniform::new_inclusive(MIN_TRAIL, max_trail).expect("valid range"),
            speed: Uniform::new_inclusive(MIN_SPEED, MAX_SPEED).expect("valid range"),
            glyphs,
        }
    }

    pub fn max_trail(&self) -> u16 {
        self.max_trail
    }

    #[cfg(test)]
    pub fn glyphs(&self) -> &GlyphTable {
        &self.glyphs
    }

    fn length<R: Rng>(&self, rng: &mut R) -> u16 {
        self.length.sample(rng)
    }

    fn speed<R: Rng>(&self, rng: &mut R) -> f32 {
        self.speed.sample(rng)
    }

    /// Somewhere between one screen above the top edge and the top edge.
    fn head<R: Rng>(&self, num_rows: usize, rng: &mut R) -> f32 {
        rng.random_range(-(num_rows as f32)..=0.0)
    }

    fn glyph<R: Rng>(&self, rng: &mut R) -> char {
        self.glyphs.sample(rng)
    }
}

/// What one call to [`Droplet::advance`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Step {
    pub recycled: bool,
    pub flickered: Option<usize>,
}

/// Per-tick counts summed over many droplets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    pub recycled: usize,
    pub flickered: usize,
}

impl Tally {
    pub fn record(&mut self, step: Step) {
        self.recycled += step.recycled as usize;
        self.flickered += step.flickered.is_some() as usize;
    }

    pub fn merge(self, other: Tally) -> Tally {
        Tally {
            recycled: self.recycled + other.recycled,
            flickered: self.flickered + other.flickered,
        }
    }
}

/// One falling trail.
///
/// The head moves in fractional rows; cell `t` of the trail sits `t` rows
/// above the head and shows `glyphs[t]`.
#[derive(Clone, Debug)]
pub struct Droplet {
    head: f32,
    speed: f32,
    length: u16,
    glyphs: Vec<char>,
}

impl Droplet {
    pub fn new<R: Rng>(num_rows: usize, sampler: &Sampler, rng: &mut R) -> Self {
        let mut d = Self {
            head: 0.0,
            speed: MIN_SPEED,
            length: MIN_TRAIL,
            glyphs: Vec::with_capacity(sampler.max_trail() as usize),
        };
        d.reset(num_rows, sampler, rng);
        d
    }

    /// Redraws every parameter; the previous state leaves no trace.
    pub fn reset<R: Rng>(&mut self, num_rows: usize, sampler: &Sampler, rng: &mut R) {
        self.length = sampler.length(rng);
        self.speed = sampler.speed(rng);
        self.head = sampler.head(num_rows, rng);
        self.glyphs.clear();
        let length = self.length;
        self.glyphs.extend((0..length).map(|_| sampler.glyph(rng)));
    }

    /// Row past which the whole trail (plus margin) is below the screen.
    pub fn recycle_threshold(&self, num_rows: usize) -> f32 {
        num_rows as f32 + self.length as f32 + RECYCLE_MARGIN
    }

    pub fn advance<R: Rng>(
        &mut self,
        num_rows: usize,
        sampler: &Sampler,
        rng: &mut R,
    ) -> Step {
        let mut step = Step::default();

        self.head += self.speed;
        if self.head > self.recycle_threshold(num_rows) {
            self.reset(num_rows, sampler, rng);
            step.recycled = true;
        }

        if rng.random_bool(FLICKER_CHANCE) && !self.glyphs.is_empty() {
            let cell = rng.random_range(0..self.glyphs.len());
            self.glyphs[cell] = sampler.glyph(rng);
            step.flickered = Some(cell);
        }

        step
    }

    pub fn head(&self) -> f32 {
        self.head
    }

    #[cfg(test)]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn length(&self) -> u16 {
        self.length
    }

    /// Glyph for trail offset `t`, wrapping around the buffer.
    pub fn glyph(&self, t: usize) -> char {
        match self.glyphs.len() {
            0 => ' ',
            n => self.glyphs[t % n],
        }
    }

    #[cfg(test)]
    pub fn fixed(head: f32, speed: f32, glyphs: &str) -> Self {
        let glyphs: Vec<char> = glyphs.chars().collect();
        Self {
            head,
            speed,
            length: glyphs.len() as u16,
            glyphs,
        }
    }

    #[cfg(test)]
    pub fn glyph_buffer(&self) -> &[char] {
        &self.glyphs
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn sampler() -> Sampler {
        Sampler::new(22, Arc::new(GlyphTable::rain()))
    }

    fn assert_in_range(d: &Droplet, sampler: &Sampler) {
        assert!((MIN_TRAIL..=22).contains(&d.length()), "length {}", d.length());
        assert!(
            (MIN_SPEED..=MAX_SPEED).contains(&d.speed()),
            "speed {}",
            d.speed()
        );
        assert_eq!(d.glyph_buffer().len(), d.length() as usize);
        assert!(d
            .glyph_buffer()
            .iter()
            .all(|&c| sampler.glyphs().contains(c)));
    }

    #[test]
    fn new_droplet_starts_above_or_at_top() {
        let s = sampler();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..200 {
            let d = Droplet::new(40, &s, &mut rng);
            assert!((-40.0..=0.0).contains(&d.head()), "head {}", d.head());
            assert_in_range(&d, &s);
        }
    }

    #[test]
    fn past_threshold_recycles_on_next_advance() {
        let s = sampler();
        let mut rng = StdRng::seed_from_u64(2);
        let mut d = Droplet::fixed(10.0 + 6.0 + 8.0, 0.5, "abcdef");
        assert_eq!(d.recycle_threshold(10), 24.0);

        let step = d.advance(10, &s, &mut rng);
        assert!(step.recycled);
        assert!((-10.0..=0.0).contains(&d.head()), "head {}", d.head());
        assert_in_range(&d, &s);
    }

    #[test]
    fn at_threshold_does_not_recycle() {
        let s = sampler();
        let mut rng = StdRng::seed_from_u64(3);
        let mut d = Droplet::fixed(23.0, 1.0, "abcdef");

        let step = d.advance(10, &s, &mut rng);
        assert!(!step.recycled);
        assert_eq!(d.head(), 24.0);
        assert_eq!(d.length(), 6);
    }

    #[test]
    fn advance_moves_head_by_speed() {
        let s = sampler();
        let mut rng = StdRng::seed_from_u64(4);
        let mut d = Droplet::fixed(-3.0, 1.25, "abcdef");
        d.advance(10, &s, &mut rng);
        d.advance(10, &s, &mut rng);
        assert!((d.head() - (-0.5)).abs() < 1e-6);
    }

    #[test]
    fn flicker_rewrites_one_cell_about_one_tick_in_five() {
        // two glyphs: a resampled cell changes half the time
        let s = Sampler::new(22, Arc::new(GlyphTable::new(vec!['0', '1'])));
        let mut rng = StdRng::seed_from_u64(5);
        let rows = 1_000_000;
        let mut d = Droplet::new(rows, &s, &mut rng);
        let n = 50_000;
        let mut flickers = 0usize;
        let mut rewritten = 0usize;
        for _ in 0..n {
            let before = d.glyph_buffer().to_vec();
            let step = d.advance(rows, &s, &mut rng);
            assert!(!step.recycled);
            let after = d.glyph_buffer();
            let changed: Vec<usize> = (0..after.len())
                .filter(|&i| before[i] != after[i])
                .collect();
            match step.flickered {
                Some(cell) => {
                    assert!(cell < d.length() as usize);
                    assert!(changed.iter().all(|&i| i == cell), "{changed:?} vs {cell}");
                    flickers += 1;
                    rewritten += changed.len();
                }
                None => assert!(changed.is_empty(), "{changed:?} changed without flicker"),
            }
        }

        let expected = FLICKER_CHANCE * n as f64;
        assert!(
            (flickers as f64 - expected).abs() < expected * 0.05,
            "{flickers} flickers, expected about {expected}"
        );
        let expected = expected / 2.0;
        assert!(
            (rewritten as f64 - expected).abs() < expected * 0.1,
            "{rewritten} cells rewritten, expected about {expected}"
        );
    }

    #[test]
    fn glyph_wraps_around_buffer() {
        let d = Droplet::fixed(0.0, 1.0, "xyz");
        assert_eq!(d.glyph(0), 'x');
        assert_eq!(d.glyph(2), 'z');
        assert_eq!(d.glyph(4), 'y');
    }

    proptest! {
        #[test]
        fn ranges_hold_after_any_number_of_ticks(
            seed in any::<u64>(),
            rows in 0usize..80,
            ticks in 0usize..400,
        ) {
            let s = sampler();
            let mut rng = StdRng::seed_from_u64(seed);
            let mut d = Droplet::new(rows, &s, &mut rng);
            for _ in 0..ticks {
                d.advance(rows, &s, &mut rng);
                prop_assert!((MIN_TRAIL..=22).contains(&d.length()));
                prop_assert!((MIN_SPEED..=MAX_SPEED).contains(&d.speed()));
                prop_assert_eq!(d.glyph_buffer().len(), d.length() as usize);
                prop_assert!(d.head() <= d.recycle_threshold(rows) + MAX_SPEED);
            }
        }
    }
}
