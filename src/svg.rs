//! SVG path construction for decoded geometry.
//!
//! The topology ships pre-projected, so coordinates pass through unchanged
//! (identity projection) and path generation is pure string assembly.

use geo::{CoordsIter, LineString, MultiPolygon};

/// Builds a compact path string for a MultiPolygon: exterior rings followed
/// by holes, each as an `M … L … Z` subpath.
pub fn multipolygon_to_path(shape: &MultiPolygon<f64>) -> String {
    let mut out = String::new();
    for polygon in &shape.0 {
        ring_to_path(polygon.exterior(), &mut out);
        for interior in polygon.interiors() {
            ring_to_path(interior, &mut out);
        }
    }
    out
}

/// Builds one path string covering a set of open border lines (no closing
/// `Z`; borders are stroked, never filled).
pub fn lines_to_path(lines: &[LineString<f64>]) -> String {
    let mut out = String::new();
    for line in lines {
        let mut coords = line.coords_iter();
        if let Some(first) = coords.next() {
            push_command(&mut out, 'M', first.x, first.y);
            for coord in coords {
                push_command(&mut out, 'L', coord.x, coord.y);
            }
        }
    }
    out
}

fn ring_to_path(ring: &LineString<f64>, out: &mut String) {
    let mut coords = ring.coords_iter();
    if let Some(first) = coords.next() {
        push_command(out, 'M', first.x, first.y);
        for coord in coords {
            push_command(out, 'L', coord.x, coord.y);
        }
        out.push('Z');
    }
}

fn push_command(out: &mut String, command: char, x: f64, y: f64) {
    if !out.is_empty() {
        out.push(' ');
    }
    out.push(command);
    out.push_str(&format_coord(x));
    out.push(',');
    out.push_str(&format_coord(y));
}

/// Trims trailing zeros so quantized integer coordinates stay compact.
fn format_coord(value: f64) -> String {
    let text = format!("{value:.3}");
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    trimmed.to_string()
}

/// Escapes a string for use in SVG attribute values and text content.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
