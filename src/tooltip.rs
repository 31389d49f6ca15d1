//! Hover tooltip: label composition and clip-avoiding placement.
//!
//! The controller is a two-state machine driven by pointer events. Viewport
//! and cursor positions are passed in explicitly so placement stays a pure
//! function.

use crate::model::JoinedCounty;

/// Which side of the cursor the tooltip opens toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    East,
    West,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub direction: Direction,
    /// (vertical, horizontal) offset from the cursor in pixels.
    pub offset: (f64, f64),
}

/// Picks the tooltip side so it never clips off-screen: open eastward when
/// the cursor is left of the viewport midpoint, westward otherwise.
pub fn place(cursor_x: f64, viewport_width: f64) -> Placement {
    if cursor_x < viewport_width / 2.0 {
        Placement {
            direction: Direction::East,
            offset: (0.0, 50.0),
        }
    } else {
        Placement {
            direction: Direction::West,
            offset: (0.0, -50.0),
        }
    }
}

/// Composes the tooltip label for a county. Attainment below 20% gets the
/// "only" phrasing.
pub fn describe(county: &JoinedCounty) -> String {
    let qualifier = if county.bachelor < 20.0 { "only " } else { "" };
    format!(
        "In {} ({}), {}around {}% adults (25yo and older) have a bachelor's degree or higher.",
        county.area, county.state, qualifier, county.bachelor
    )
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum TooltipState {
    #[default]
    Hidden,
    Visible {
        text: String,
        education: f64,
        placement: Placement,
    },
}

/// Pointer-driven tooltip state. A new pointer-enter simply replaces the
/// displayed content; there is no queuing.
#[derive(Debug, Default)]
pub struct TooltipController {
    state: TooltipState,
}

impl TooltipController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &TooltipState {
        &self.state
    }

    pub fn pointer_enter(&mut self, county: &JoinedCounty, cursor_x: f64, viewport_width: f64) {
        self.state = TooltipState::Visible {
            text: describe(county),
            education: county.bachelor,
            placement: place(cursor_x, viewport_width),
        };
    }

    pub fn pointer_leave(&mut self) {
        self.state = TooltipState::Hidden;
    }
}
