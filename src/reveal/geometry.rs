//! Rectangles, root margins and intersection tests.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum MarginParseError {
    #[error("Expected 1 to 4 margin values, got {0}")]
    Arity(usize),

    #[error("Invalid margin value: {0}")]
    Value(String),
}

/// Axis-aligned rectangle in page coordinates (CSS pixels)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Overlap with another rectangle, if the two touch at all
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right < x || bottom < y {
            return None;
        }
        Some(Rect::new(x, y, right - x, bottom - y))
    }
}

/// One side of a root margin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Length {
    Px(f64),
    /// Percentage of the viewport's width (left/right) or height (top/bottom)
    Percent(f64),
}

impl Length {
    fn resolve(&self, basis: f64) -> f64 {
        match self {
            Length::Px(px) => *px,
            Length::Percent(pct) => basis * pct / 100.0,
        }
    }
}

impl std::str::FromStr for Length {
    type Err = MarginParseError;

    fn from_str(s: &str) -> Result<Self, MarginParseError> {
        let invalid = || MarginParseError::Value(s.to_string());
        if let Some(pct) = s.strip_suffix('%') {
            pct.parse().map(Length::Percent).map_err(|_| invalid())
        } else if let Some(px) = s.strip_suffix("px") {
            px.parse().map(Length::Px).map_err(|_| invalid())
        } else if s == "0" {
            Ok(Length::Px(0.0))
        } else {
            Err(invalid())
        }
    }
}

/// Grows (or shrinks, when negative) the viewport before intersecting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RootMargin {
    pub top: Length,
    pub right: Length,
    pub bottom: Length,
    pub left: Length,
}

impl Default for RootMargin {
    fn default() -> Self {
        Self::uniform(Length::Px(0.0))
    }
}

impl RootMargin {
    pub fn uniform(length: Length) -> Self {
        Self {
            top: length,
            right: length,
            bottom: length,
            left: length,
        }
    }

    /// Vertical margin only, e.g. `200px 0px`
    pub fn vertical_px(px: f64) -> Self {
        Self {
            top: Length::Px(px),
            right: Length::Px(0.0),
            bottom: Length::Px(px),
            left: Length::Px(0.0),
        }
    }

    /// Apply the margin to a viewport rectangle
    pub fn expand(&self, viewport: &Rect) -> Rect {
        let top = self.top.resolve(viewport.height);
        let right = self.right.resolve(viewport.width);
        let bottom = self.bottom.resolve(viewport.height);
        let left = self.left.resolve(viewport.width);

        Rect::new(
            viewport.x - left,
            viewport.y - top,
            viewport.width + left + right,
            viewport.height + top + bottom,
        )
    }
}

/// CSS shorthand: `a`, `a b`, `a b c` or `a b c d`
impl std::str::FromStr for RootMargin {
    type Err = MarginParseError;

    fn from_str(s: &str) -> Result<Self, MarginParseError> {
        let values = s
            .split_whitespace()
            .map(str::parse::<Length>)
            .collect::<Result<Vec<Length>, _>>()?;

        let (top, right, bottom, left) = match values.as_slice() {
            [a] => (*a, *a, *a, *a),
            [v, h] => (*v, *h, *v, *h),
            [t, h, b] => (*t, *h, *b, *h),
            [t, r, b, l] => (*t, *r, *b, *l),
            other => return Err(MarginParseError::Arity(other.len())),
        };

        Ok(Self {
            top,
            right,
            bottom,
            left,
        })
    }
}

/// Fraction of `target` visible inside the margin-expanded viewport.
///
/// `None` means no contact at all. A zero-area target that sits on or
/// inside the root counts as fully visible.
pub fn visible_ratio(target: &Rect, viewport: &Rect, margin: &RootMargin) -> Option<f64> {
    let root = margin.expand(viewport);
    let overlap = target.intersection(&root)?;

    let area = target.area();
    if area == 0.0 {
        return Some(1.0);
    }
    Some(overlap.area() / area)
}
