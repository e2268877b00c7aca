//! Planar coordinate type.
//!
//! Planes fly over a flat simulation area measured in metres, so distances
//! are plain Euclidean.  `f64` is used throughout: neighbor guarantees divide
//! small range margins by speeds and must not lose whole steps to rounding.

/// A position in the simulation plane, in metres.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance in metres.
    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Squared distance, for comparisons.
    #[inline]
    pub fn distance_sq(self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    /// Move up to `max_step` metres towards `target`.
    ///
    /// Returns the new position and `true` when `target` was reached.
    pub fn step_towards(self, target: Point, max_step: f64) -> (Point, bool) {
        let d = self.distance(target);
        if d <= max_step {
            return (target, true);
        }
        let f = max_step / d;
        (
            Point::new(self.x + (target.x - self.x) * f, self.y + (target.y - self.y) * f),
            false,
        )
    }

    /// `[x, y]` form used by the transport's R-tree.
    #[inline]
    pub fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}
