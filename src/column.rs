// Copyright (c) 2026 rezky_nightky

use rand::Rng;

use crate::droplet::{Droplet, Sampler, Tally};

/// One or two droplets per column, chosen per column so that neighbours
/// do not recycle in lockstep.
const DROPLETS_PER_COLUMN: std::ops::RangeInclusive<usize> = 1..=2;

/// A fixed screen column and the droplets falling through it.
#[derive(Clone, Debug)]
pub struct Column {
    droplets: Vec<Droplet>,
}

impl Column {
    pub fn new<R: Rng>(num_rows: usize, sampler: &Sampler, rng: &mut R) -> Self {
        let n = rng.random_range(DROPLETS_PER_COLUMN);
        let droplets = (0..n)
            .map(|_| Droplet::new(num_rows, sampler, rng))
            .collect();
        Self { droplets }
    }

    /// Advances every droplet once.
    pub fn advance_all<R: Rng>(
        &mut self,
        num_rows: usize,
        sampler: &Sampler,
        rng: &mut R,
    ) -> Tally {
        let mut tally = Tally::default();
        for d in &mut self.droplets {
            tally.record(d.advance(num_rows, sampler, rng));
        }
        tally
    }

    pub fn drops(&self) -> &[Droplet] {
        &self.droplets
    }

    #[cfg(test)]
    pub fn from_droplets(droplets: Vec<Droplet>) -> Self {
        Self { droplets }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::glyphs::GlyphTable;

    #[test]
    fn holds_one_or_two_droplets() {
        let s = Sampler::new(22, Arc::new(GlyphTable::rain()));
        let mut rng = StdRng::seed_from_u64(11);
        let mut seen = [false; 3];
        for _ in 0..100 {
            let c = Column::new(30, &s, &mut rng);
            assert!(DROPLETS_PER_COLUMN.contains(&c.drops().len()));
            seen[c.drops().len()] = true;
        }
        assert!(seen[1] && seen[2]);
    }

    #[test]
    fn droplet_count_never_changes() {
        let s = Sampler::new(22, Arc::new(GlyphTable::rain()));
        let mut rng = StdRng::seed_from_u64(12);
        let mut c = Column::new(5, &s, &mut rng);
        let n = c.drops().len();
        let mut recycled = 0;
        for _ in 0..1000 {
            recycled += c.advance_all(5, &s, &mut rng).recycled;
            assert_eq!(c.drops().len(), n);
        }
        assert!(recycled > 0);
    }

    #[test]
    fn advance_all_moves_every_droplet() {
        let s = Sampler::new(22, Arc::new(GlyphTable::rain()));
        let mut rng = StdRng::seed_from_u64(13);
        let mut c = Column::from_droplets(vec![
            Droplet::fixed(0.0, 1.0, "abcdef"),
            Droplet::fixed(-5.0, 0.5, "ghijkl"),
        ]);
        assert_eq!(c.advance_all(20, &s, &mut rng).recycled, 0);
        assert_eq!(c.drops()[0].head(), 1.0);
        assert_eq!(c.drops()[1].head(), -4.5);
    }
}
