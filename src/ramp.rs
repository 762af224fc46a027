// Copyright (c) 2026 rezky_nightky

use crate::color::Rgba;

const NEAR_HEAD: Rgba = Rgba::new(0.3, 1.0, 0.3, 1.0);
const NEAR_HEAD_DIM: Rgba = Rgba::new(0.2, 0.9, 0.2, 1.0);
const FADE_FLOOR: f32 = 0.05;

/// Colors indexed by trail offset: white head, two bright greens, then a
/// green that loses brightness and alpha toward the tail.
///
/// Read-only after construction; one ramp is shared by every renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorRamp {
    colors: Vec<Rgba>,
}

impl ColorRamp {
    /// Builds `max_trail + 1` entries.
    pub fn new(max_trail: u16) -> Self {
        let k = max_trail as usize;
        let mut colors = Vec::with_capacity(k + 1);
        colors.push(Rgba::WHITE);
        colors.push(NEAR_HEAD);
        colors.push(NEAR_HEAD_DIM);
        for i in 3..=k {
            let fade = (1.0 - i as f32 / k as f32).max(FADE_FLOOR);
            colors.push(Rgba::new(0.0, fade * 0.85, 0.0, fade));
        }
        colors.truncate(k + 1);
        Self { colors }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Highest valid offset.
    pub fn max_index(&self) -> usize {
        self.colors.len().saturating_sub(1)
    }

    /// Color for a trail offset, clamped to the last entry.
    pub fn at(&self, offset: usize) -> Rgba {
        self.colors[offset.min(self.max_index())]
    }
}
