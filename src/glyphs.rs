// Copyright (c) 2026 rezky_nightky

use std::char;

use rand::{
    distr::{Distribution, Uniform},
    Rng,
};

/// Printable ASCII, `!` through `~`.
const ASCII_PRINTABLE: (u32, u32) = (0x21, 0x7E);
/// Halfwidth katakana, `ｦ` through `ﾝ`.
const HALFWIDTH_KATAKANA: (u32, u32) = (0xFF66, 0xFF9D);

fn push_range(out: &mut Vec<char>, (start, end): (u32, u32)) {
    out.extend((start..=end).filter_map(char::from_u32));
}

/// The immutable set of glyphs a droplet may show.
///
/// Built once at startup and shared by every grid; the only access pattern is
/// a uniform random pick.
#[derive(Clone, Debug)]
pub struct GlyphTable {
    chars: Vec<char>,
    pick: Uniform<usize>,
}

impl GlyphTable {
    pub fn new(mut chars: Vec<char>) -> Self {
        if chars.is_empty() {
            chars.push('0');
            chars.push('1');
        }
        let pick = Uniform::new(0, chars.len()).expect("valid range");
        Self { chars, pick }
    }

    /// ASCII printable range followed by the halfwidth katakana block.
    pub fn rain() -> Self {
        let mut out = Vec::new();
        push_range(&mut out, ASCII_PRINTABLE);
        push_range(&mut out, HALFWIDTH_KATAKANA);
        Self::new(out)
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    #[cfg(test)]
    pub fn contains(&self, ch: char) -> bool {
        self.chars.contains(&ch)
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> char {
        self.chars[self.pick.sample(rng)]
    }
}
