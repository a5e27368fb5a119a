//! RNG module - shape selection
//!
//! Shapes are drawn uniformly at random from the five templates, using a small LCG so
//! that a seed reproduces a whole run of games. A scripted source cycles a fixed sequence and
//! exists for tests and demos.

use crate::types::ShapeKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Uses the high bits; the low bits of a power-of-two LCG cycle quickly.
    pub fn next_range(&mut self, max: u32) -> u32 {
        (self.next_u32() >> 16) % max.max(1)
    }

    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Where the next shape comes from
#[derive(Debug, Clone)]
pub enum ShapeSource {
    /// Uniform draw over all five shapes.
    Random { rng: SimpleRng },
    /// Cycles through a fixed, non-empty sequence.
    Scripted { sequence: Vec<ShapeKind>, pos: usize },
}

impl ShapeSource {
    pub fn random(seed: u32) -> Self {
        ShapeSource::Random {
            rng: SimpleRng::new(seed),
        }
    }

    /// # Panics
    ///
    /// Panics if `sequence` is empty.
    pub fn scripted(sequence: impl Into<Vec<ShapeKind>>) -> Self {
        let sequence = sequence.into();
        assert!(!sequence.is_empty(), "scripted shape source needs at least one shape");
        ShapeSource::Scripted { sequence, pos: 0 }
    }

    /// Draw the next shape kind.
    pub fn draw(&mut self) -> ShapeKind {
        match self {
            ShapeSource::Random { rng } => {
                ShapeKind::ALL[rng.next_range(ShapeKind::ALL.len() as u32) as usize]
            }
            ShapeSource::Scripted { sequence, pos } => {
                let kind = sequence[*pos % sequence.len()];
                *pos = (*pos + 1) % sequence.len();
                kind
            }
        }
    }
}

impl Default for ShapeSource {
    fn default() -> Self {
        Self::random(1)
    }
}
