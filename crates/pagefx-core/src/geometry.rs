#![forbid(unsafe_code)]

//! Geometric primitives in CSS pixels.

/// A rectangle in CSS pixels, viewport-relative like `getBoundingClientRect`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Border-box width.
    pub width: f64,
    /// Border-box height.
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top edge. Alias for `self.y`.
    #[inline]
    pub const fn top(&self) -> f64 {
        self.y
    }

    /// Bottom edge.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Top edge rounded to the nearest whole pixel.
    ///
    /// Sub-pixel layout noise (e.g. `119.9996` vs `120.0002`) collapses to
    /// the same value, so blocks laid out on one visual row compare equal.
    #[inline]
    pub fn rounded_top(&self) -> i64 {
        round_px(self.y)
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Round a pixel coordinate the way browsers' `Math.round` does.
///
/// Halves round toward positive infinity (`-2.5 -> -2`, `2.5 -> 3`), unlike
/// [`f64::round`]. Non-finite input maps to `0`.
#[inline]
pub fn round_px(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    // `value + 0.5` is inexact just below a half and above 2^52.
    let floor = value.floor();
    let rounded = if value - floor >= 0.5 { floor + 1.0 } else { floor };
    rounded as i64
}

/// Format a pixel length as a CSS value (`20` -> `"20px"`, `12.5` -> `"12.5px"`).
#[must_use]
pub fn format_px(value: f64) -> String {
    format!("{value}px")
}

/// Parse a CSS pixel length (`"20px"`, `"0"`, `" 12.5px "`).
///
/// Returns `None` for other units, keywords, and empty strings.
#[must_use]
pub fn parse_px(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    let number = trimmed.strip_suffix("px").unwrap_or(trimmed).trim_end();
    if number.is_empty() {
        return None;
    }
    number.parse::<f64>().ok().filter(|v| v.is_finite())
}
