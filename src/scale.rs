//! Quantized color scale for the choropleth fill.

use anyhow::{Result, ensure};

/// Fill palette, light to dark blue. One bucket per entry.
pub const PALETTE: [&str; 9] = [
    "#f7fbff", "#deebf7", "#c6dbef", "#9ecae1", "#6baed6", "#4292c6", "#2171b5", "#08519c",
    "#08306b",
];

/// Maps a continuous attainment value onto the fixed palette by equal-width
/// bucketing over the observed [min, max] domain.
///
/// Buckets are half-open: a value exactly on a boundary belongs to the upper
/// bucket, and the domain maximum clamps into the last bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantizeScale {
    min: f64,
    max: f64,
}

impl QuantizeScale {
    /// Builds a scale whose domain is the min/max of `values`.
    ///
    /// # Errors
    ///
    /// Fails on an empty iterator or any non-finite value, since the domain
    /// would be undefined.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Result<Self> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut count = 0usize;

        for value in values {
            ensure!(value.is_finite(), "non-finite attainment value {value}");
            min = min.min(value);
            max = max.max(value);
            count += 1;
        }
        ensure!(count > 0, "cannot build a color scale from no values");

        Ok(Self { min, max })
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    /// Bucket index for a value, clamped to the palette bounds.
    pub fn bucket(&self, value: f64) -> usize {
        // Zero-width domain: every value lands in the first bucket.
        if self.max == self.min {
            return 0;
        }
        let position = (value - self.min) / (self.max - self.min);
        let index = (position * PALETTE.len() as f64).floor() as isize;
        index.clamp(0, PALETTE.len() as isize - 1) as usize
    }

    pub fn color(&self, value: f64) -> &'static str {
        PALETTE[self.bucket(value)]
    }
}
