//! Rays and segments used by line queries.

use crate::math::{Point, Real, Vector};

/// A ray, used to describe both infinite rays and segments.
///
/// Segments are represented by rays whose `dir` goes from the first endpoint to the second
/// one, so that the parameter `t` of [`Ray::point_at`] spans `[0, 1]` along the segment.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Ray {
    /// Starting point of the ray.
    pub origin: Point<Real>,
    /// Direction of the ray.
    pub dir: Vector<Real>,
}

impl Ray {
    /// Creates a new ray starting from `origin` and with the direction `dir`.
    pub fn new(origin: Point<Real>, dir: Vector<Real>) -> Ray {
        Ray { origin, dir }
    }

    /// The ray going from `p0` (at `t = 0`) to `p1` (at `t = 1`).
    pub fn from_segment(p0: &Point<Real>, p1: &Point<Real>) -> Ray {
        Ray::new(*p0, p1 - p0)
    }

    /// The other endpoint of this ray seen as a segment.
    #[inline]
    pub fn end(&self) -> Point<Real> {
        self.origin + self.dir
    }

    /// Computes the point at the given parameter on this ray.
    ///
    /// This is computed as `self.origin + self.dir * t`.
    #[inline]
    pub fn point_at(&self, t: Real) -> Point<Real> {
        self.origin + self.dir * t
    }
}
