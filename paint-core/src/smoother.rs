//! Stroke stabilization.
//!
//! Each raw pointer sample `N` is pulled toward the previously committed
//! point `P` by an exponential lag filter. The strength is the weight kept on
//! `P`:
//!
//! ```text
//! factor = strength / 10
//! S      = P * factor + N * (1 - factor)
//! ```
//!
//! Strength 0 means no smoothing at all, and the committed point is the raw
//! sample. Strength 10 is the other extreme: the committed point never moves
//! away from `P`, so the stroke stays where the pointer went down. That is
//! expected behavior for the top of the scale, not a bug.

use serde::{Deserialize, Serialize};

/// Maximum stabilization strength.
pub const MAX_STABILIZATION: f32 = 10.0;

/// A point in canvas pixel coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Clamp a stabilization strength into `0..=10`. NaN becomes 0.
#[must_use]
pub fn clamp_strength(strength: f32) -> f32 {
    if strength.is_nan() {
        0.0
    } else {
        strength.clamp(0.0, MAX_STABILIZATION)
    }
}

/// Blend a raw sample toward the previous smoothed point.
///
/// The result is the next point to commit, and the caller uses it as
/// `previous` for the following sample. `strength` is clamped into `0..=10`.
#[must_use]
pub fn smooth(previous: Point, raw: Point, strength: f32) -> Point {
    let factor = clamp_strength(strength) / MAX_STABILIZATION;
    let follow = 1.0 - factor;
    Point {
        x: previous.x * factor + raw.x * follow,
        y: previous.y * factor + raw.y * follow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strength_zero_follows_raw_input() {
        let previous = Point::new(3.0, -7.5);
        for raw in [
            Point::new(0.0, 0.0),
            Point::new(100.25, 42.0),
            Point::new(-12.0, 640.5),
        ] {
            assert_eq!(smooth(previous, raw, 0.0), raw);
        }
    }

    #[test]
    fn strength_ten_holds_previous_point() {
        let previous = Point::new(10.0, 10.0);
        for raw in [Point::new(50.0, 10.0), Point::new(-4.0, 300.0)] {
            assert_eq!(smooth(previous, raw, 10.0), previous);
        }
    }

    #[test]
    fn midpoint_strength_blends_linearly() {
        let s = smooth(Point::new(0.0, 0.0), Point::new(10.0, 20.0), 5.0);
        assert!((s.x - 5.0).abs() < f32::EPSILON);
        assert!((s.y - 10.0).abs() < f32::EPSILON);
    }

    #[test]
    fn out_of_range_strength_is_clamped() {
        let previous = Point::new(1.0, 1.0);
        let raw = Point::new(9.0, 9.0);
        assert_eq!(smooth(previous, raw, -3.0), raw);
        assert_eq!(smooth(previous, raw, 42.0), previous);
        assert_eq!(smooth(previous, raw, f32::NAN), raw);
    }
}
