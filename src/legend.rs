//! Legend layout: one swatch per palette color with upper-edge labels.

use crate::scale::{PALETTE, QuantizeScale};

pub const SWATCH_WIDTH: f64 = 50.0;
pub const SWATCH_HEIGHT: f64 = 20.0;
const SWATCH_Y: f64 = 30.0;
const LABEL_Y: f64 = 70.0;

#[derive(Debug, Clone, PartialEq)]
pub struct LegendSwatch {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendLabel {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

/// Computed legend geometry, positioned by a horizontal translation of the
/// whole group so it stays centered on the drawing width.
#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub offset_x: f64,
    pub swatches: Vec<LegendSwatch>,
    pub labels: Vec<LegendLabel>,
}

/// Lays out the legend for a scale.
///
/// Labels mark each bucket's upper edge: starting at the domain minimum,
/// each step adds `(max - min) / bucket count`, formatted to one decimal
/// place.
pub fn build(scale: &QuantizeScale, chart_width: f64) -> Legend {
    let (min, max) = scale.domain();
    let step = (max - min) / PALETTE.len() as f64;

    let swatches = PALETTE
        .iter()
        .copied()
        .enumerate()
        .map(|(i, color)| LegendSwatch {
            x: i as f64 * SWATCH_WIDTH,
            y: SWATCH_Y,
            width: SWATCH_WIDTH,
            height: SWATCH_HEIGHT,
            color,
        })
        .collect();

    let labels = (0..PALETTE.len())
        .map(|i| LegendLabel {
            x: (i as f64 + 1.0) * SWATCH_WIDTH,
            y: LABEL_Y,
            text: format!("{:.1}", min + (i as f64 + 1.0) * step),
        })
        .collect();

    Legend {
        offset_x: chart_width / 2.0,
        swatches,
        labels,
    }
}
