// Copyright 2025 the Pairtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types and helpers.

use kurbo::{Point, Rect};

/// Identity of an indexed point: its position in the sequence the tree was built from.
///
/// Identities survive the reordering that happens while partitioning, so they are
/// what self-exclusion compares, never coordinates. Two coincident points keep
/// distinct identities and count as a legitimate pair.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PointId(usize);

impl PointId {
    /// Identity of the point at `index` in the build input.
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of this point in the build input.
    pub const fn index(self) -> usize {
        self.0
    }
}

/// One of the four quadrants of a split extent (y grows upward).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Quadrant {
    /// Upper-left quadrant.
    NorthWest,
    /// Upper-right quadrant.
    NorthEast,
    /// Lower-left quadrant.
    SouthWest,
    /// Lower-right quadrant.
    SouthEast,
}

impl Quadrant {
    /// All quadrants in child-slot order.
    pub const ALL: [Self; 4] = [
        Self::NorthWest,
        Self::NorthEast,
        Self::SouthWest,
        Self::SouthEast,
    ];

    /// Child-slot index of this quadrant.
    pub const fn index(self) -> usize {
        match self {
            Self::NorthWest => 0,
            Self::NorthEast => 1,
            Self::SouthWest => 2,
            Self::SouthEast => 3,
        }
    }

    /// Short compass label (`"nw"`, `"ne"`, `"sw"`, `"se"`).
    pub const fn label(self) -> &'static str {
        match self {
            Self::NorthWest => "nw",
            Self::NorthEast => "ne",
            Self::SouthWest => "sw",
            Self::SouthEast => "se",
        }
    }

    /// The quadrant `p` falls into relative to the split point `mid`.
    ///
    /// Points on a split line go east (`x >= mid.x`) and north (`y >= mid.y`),
    /// so every child extent is closed on its left and bottom edges.
    #[inline]
    pub fn of(p: Point, mid: Point) -> Self {
        match (p.y >= mid.y, p.x >= mid.x) {
            (true, false) => Self::NorthWest,
            (true, true) => Self::NorthEast,
            (false, false) => Self::SouthWest,
            (false, true) => Self::SouthEast,
        }
    }
}

/// Axis-aligned rectangle with a lower-left corner and a size.
///
/// The y axis grows upward: `bottom` is the minimum y and `top()` the maximum.
/// Edges are stored directly, so the quadrants of an extent tile it exactly and a
/// bounding box keeps its maximum coordinates without rounding.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Extent {
    left: f64,
    bottom: f64,
    right: f64,
    top: f64,
}

impl Extent {
    /// Create an extent from its lower-left corner, width and height.
    ///
    /// Width and height must be non-negative. Debug builds assert.
    pub fn new(left: f64, bottom: f64, width: f64, height: f64) -> Self {
        debug_assert!(
            width >= 0.0 && height >= 0.0,
            "extent size must be non-negative"
        );
        Self::from_edges(left, bottom, left + width, bottom + height)
    }

    const fn from_edges(left: f64, bottom: f64, right: f64, top: f64) -> Self {
        Self {
            left,
            bottom,
            right,
            top,
        }
    }

    /// Create an extent spanning two corners given in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self::from_edges(a.x.min(b.x), a.y.min(b.y), a.x.max(b.x), a.y.max(b.y))
    }

    /// The zero-sized extent at `p`.
    pub fn from_point(p: Point) -> Self {
        Self::from_edges(p.x, p.y, p.x, p.y)
    }

    /// Tight bounding box of `points`. Returns `None` if there are none.
    pub fn from_points<I: IntoIterator<Item = Point>>(points: I) -> Option<Self> {
        let mut it = points.into_iter();
        let first = Self::from_point(it.next()?);
        Some(it.fold(first, |acc, p| acc.union_point(p)))
    }

    /// Minimum x.
    pub fn left(&self) -> f64 {
        self.left
    }

    /// Minimum y.
    pub fn bottom(&self) -> f64 {
        self.bottom
    }

    /// Size along x, saturating at `f64::MAX` for extents wider than that.
    pub fn width(&self) -> f64 {
        (self.right - self.left).min(f64::MAX)
    }

    /// Size along y, saturating at `f64::MAX` for extents taller than that.
    pub fn height(&self) -> f64 {
        (self.top - self.bottom).min(f64::MAX)
    }

    /// Maximum x.
    pub fn right(&self) -> f64 {
        self.right
    }

    /// Maximum y.
    pub fn top(&self) -> f64 {
        self.top
    }

    /// `(left, bottom, width, height)`.
    pub fn to_lbwh(&self) -> (f64, f64, f64, f64) {
        (self.left, self.bottom, self.width(), self.height())
    }

    /// The split point used for quadrant routing.
    ///
    /// Always lies within the extent, even for huge coordinates.
    pub fn center(&self) -> Point {
        Point::new(
            0.5 * self.left + 0.5 * self.right,
            0.5 * self.bottom + 0.5 * self.top,
        )
    }

    /// The larger of width and height.
    pub fn max_side(&self) -> f64 {
        self.width().max(self.height())
    }

    /// True if the extent has no area.
    pub fn is_degenerate(&self) -> bool {
        self.right <= self.left || self.top <= self.bottom
    }

    /// Smallest extent covering both.
    pub fn union(&self, other: &Self) -> Self {
        Self::from_edges(
            self.left.min(other.left),
            self.bottom.min(other.bottom),
            self.right.max(other.right),
            self.top.max(other.top),
        )
    }

    /// Smallest extent covering this one and `p`.
    pub fn union_point(&self, p: Point) -> Self {
        self.union(&Self::from_point(p))
    }

    /// Whether `p` lies inside the extent, edges included.
    pub fn contains(&self, p: Point) -> bool {
        self.left <= p.x && p.x <= self.right && self.bottom <= p.y && p.y <= self.top
    }

    /// One of the four sub-rectangles meeting at [`Extent::center`].
    pub fn quadrant(&self, q: Quadrant) -> Self {
        let mid = self.center();
        match q {
            Quadrant::NorthWest => Self::from_edges(self.left, mid.y, mid.x, self.top),
            Quadrant::NorthEast => Self::from_edges(mid.x, mid.y, self.right, self.top),
            Quadrant::SouthWest => Self::from_edges(self.left, self.bottom, mid.x, mid.y),
            Quadrant::SouthEast => Self::from_edges(mid.x, self.bottom, self.right, mid.y),
        }
    }

    /// All four quadrants in child-slot order.
    pub fn quadrants(&self) -> [Self; 4] {
        Quadrant::ALL.map(|q| self.quadrant(q))
    }

    /// Whether halving at [`Extent::center`] strictly shrinks this extent along some
    /// axis on which `spread` has positive size.
    ///
    /// Fails once the extent is so narrow that its midpoint rounds onto an edge.
    pub(crate) fn can_separate(&self, spread: &Self) -> bool {
        let mid = self.center();
        let x = spread.left < spread.right && self.left < mid.x && mid.x < self.right;
        let y = spread.bottom < spread.top && self.bottom < mid.y && mid.y < self.top;
        x || y
    }

    /// The quadrant `p` routes to when this extent is split.
    pub fn quadrant_of(&self, p: Point) -> Quadrant {
        Quadrant::of(p, self.center())
    }

    /// Squared distance from `p` to the nearest point of the extent (zero inside).
    #[inline]
    pub fn distance_squared_to(&self, p: Point) -> f64 {
        let dx = (self.left - p.x).max(p.x - self.right).max(0.0);
        let dy = (self.bottom - p.y).max(p.y - self.top).max(0.0);
        dx * dx + dy * dy
    }

    /// Grow a bounding box into a usable root extent.
    ///
    /// With `force_square` the box becomes a square anchored at its lower-left
    /// corner. Any remaining zero-size dimension is padded symmetrically around
    /// its coordinate, using the other dimension's size or 1.0 if both are zero.
    /// Edges are clamped to the finite range.
    pub(crate) fn padded(&self, force_square: bool) -> Self {
        let side = self.max_side();
        let pad = if side > 0.0 { side } else { 1.0 };
        let mut out = *self;
        if force_square {
            out.right = self.right.max(saturating_add(self.left, side));
            out.top = self.top.max(saturating_add(self.bottom, side));
        }
        if out.right <= out.left {
            out.left = saturating_add(self.left, -0.5 * pad);
            out.right = saturating_add(self.left, 0.5 * pad);
        }
        if out.top <= out.bottom {
            out.bottom = saturating_add(self.bottom, -0.5 * pad);
            out.top = saturating_add(self.bottom, 0.5 * pad);
        }
        out
    }

    /// The extent as a Kurbo rectangle (`x0 = left`, `y0 = bottom`).
    pub fn to_rect(&self) -> Rect {
        Rect::new(self.left, self.bottom, self.right, self.top)
    }
}

/// `a + b`, clamped to the finite range.
fn saturating_add(a: f64, b: f64) -> f64 {
    (a + b).clamp(f64::MIN, f64::MAX)
}

impl From<Extent> for Rect {
    fn from(e: Extent) -> Self {
        e.to_rect()
    }
}

impl From<Rect> for Extent {
    fn from(r: Rect) -> Self {
        let r = r.abs();
        Self::from_edges(r.x0, r.y0, r.x1, r.y1)
    }
}
