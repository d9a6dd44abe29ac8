//! Basic geometric types used by the layout engine and the drawing session.

/// A point in 2D space.
///
/// The y axis grows downward, matching SVG coordinates: a child placed one
/// level below its parent has a larger y value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Calculates the midpoint between this point and another point
    pub fn midpoint(self, other: Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Returns a new point offset by the given deltas
    pub fn translate(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// A horizontal interval assigned to a subtree during layout.
///
/// Subdividing an `HSpan` into `k` equal parts gives each child of a node
/// its own non-overlapping slice of the horizontal space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HSpan {
    left: f32,
    right: f32,
}

impl HSpan {
    /// Creates a new interval from its left and right bounds
    pub fn new(left: f32, right: f32) -> Self {
        Self { left, right }
    }

    /// Creates an interval of the given half-width centered on `center`
    pub fn centered(center: f32, half_width: f32) -> Self {
        Self {
            left: center - half_width,
            right: center + half_width,
        }
    }

    /// Returns the left bound
    pub fn left(self) -> f32 {
        self.left
    }

    /// Returns the right bound
    pub fn right(self) -> f32 {
        self.right
    }

    /// Returns the width of the interval
    pub fn width(self) -> f32 {
        self.right - self.left
    }

    /// Returns the horizontal midpoint of the interval
    pub fn midpoint(self) -> f32 {
        (self.left + self.right) * 0.5
    }

    /// Returns the `index`-th of `count` equal consecutive sub-intervals.
    ///
    /// Adjacent sub-intervals share exactly one boundary point, so sibling
    /// slices never overlap.
    pub fn split(self, index: usize, count: usize) -> Self {
        debug_assert!(count > 0, "cannot split an interval into zero parts");
        debug_assert!(index < count, "sub-interval index out of range");

        let width = self.width() / count as f32;
        Self {
            left: width.mul_add(index as f32, self.left),
            right: width.mul_add((index + 1) as f32, self.left),
        }
    }
}
