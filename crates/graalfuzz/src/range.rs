use rand::Rng;
use serde::Deserialize;

use crate::FuzzError;

/// Inclusive `[min, max]` bound on how many items a synthesizer draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "(usize, usize)")]
pub struct SizeRange {
    min: usize,
    max: usize,
}

impl SizeRange {
    pub fn new(min: usize, max: usize) -> Result<Self, FuzzError> {
        Self::named("size", min, max)
    }

    /// Like [`SizeRange::new`], naming the range in the validation error.
    pub fn named(what: &'static str, min: usize, max: usize) -> Result<Self, FuzzError> {
        if max < min {
            return Err(FuzzError::InvalidRange { what, min, max });
        }
        Ok(Self { min, max })
    }

    /// Constant-friendly constructor; an inverted range fails const evaluation.
    pub const fn between(min: usize, max: usize) -> Self {
        assert!(min <= max, "inverted size range");
        Self { min, max }
    }

    pub const fn exactly(count: usize) -> Self {
        Self {
            min: count,
            max: count,
        }
    }

    pub const fn empty() -> Self {
        Self::exactly(0)
    }

    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> usize {
        self.max
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        rng.gen_range(self.min..=self.max)
    }
}

impl TryFrom<(usize, usize)> for SizeRange {
    type Error = FuzzError;

    fn try_from((min, max): (usize, usize)) -> Result<Self, Self::Error> {
        Self::new(min, max)
    }
}
