//! Definition of the triangle shape.

use crate::math::{HomogeneousMatrix, Point, Real, UnitVector, Vector};
use crate::utils;

/// A triangle shape.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(PartialEq, Debug, Copy, Clone)]
pub struct Triangle {
    /// The triangle first point.
    pub a: Point<Real>,
    /// The triangle second point.
    pub b: Point<Real>,
    /// The triangle third point.
    pub c: Point<Real>,
}

impl From<[Point<Real>; 3]> for Triangle {
    fn from(arr: [Point<Real>; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }
}

impl Triangle {
    /// Creates a triangle from three points.
    #[inline]
    pub fn new(a: Point<Real>, b: Point<Real>, c: Point<Real>) -> Triangle {
        Triangle { a, b, c }
    }

    /// The vertices of this triangle.
    #[inline]
    pub fn vertices(&self) -> [Point<Real>; 3] {
        [self.a, self.b, self.c]
    }

    /// The normal of this triangle assuming it is oriented ccw.
    ///
    /// Returns `None` if the triangle is degenerate.
    #[inline]
    pub fn normal(&self) -> Option<UnitVector<Real>> {
        utils::ccw_face_normal([&self.a, &self.b, &self.c])
    }

    /// The edge directions `b - a`, `c - b` and `a - c` of this triangle.
    #[inline]
    pub fn edges_scaled_directions(&self) -> [Vector<Real>; 3] {
        [self.b - self.a, self.c - self.b, self.a - self.c]
    }

    /// The interval spanned by the projection of this triangle on the direction `dir`.
    #[inline]
    pub fn extents_on_dir(&self, dir: &Vector<Real>) -> (Real, Real) {
        let a = self.a.coords.dot(dir);
        let b = self.b.coords.dot(dir);
        let c = self.c.coords.dot(dir);
        (a.min(b).min(c), a.max(b).max(c))
    }

    /// The geometric center of this triangle.
    #[inline]
    pub fn center(&self) -> Point<Real> {
        utils::center(&[self.a, self.b, self.c])
    }

    /// Applies the homogeneous transform `m` to the vertices of this triangle.
    #[must_use]
    pub fn transform_by(&self, m: &HomogeneousMatrix) -> Self {
        Triangle::new(
            m.transform_point(&self.a),
            m.transform_point(&self.b),
            m.transform_point(&self.c),
        )
    }
}
