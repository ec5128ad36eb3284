//! Oriented Bounding Box.

use crate::math::{HomogeneousMatrix, Point, Real, Vector, DIM};

/// An Oriented Bounding Box.
///
/// The box is described by one of its corners and by three mutually orthogonal edge vectors
/// starting at that corner. The length of each edge vector is the extent of the box along
/// that direction, so the box is the set of points
/// `corner + s0 * axes[0] + s1 * axes[1] + s2 * axes[2]` with every `si` in `[0, 1]`.
///
/// Boxes computed from data keep their axes ordered from the direction of largest spread to the
/// direction of smallest spread. An axis may have a zero length if the data is flat along it.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct Obb {
    /// The corner all the edge vectors start from.
    pub corner: Point<Real>,
    /// The three edge vectors of the box.
    pub axes: [Vector<Real>; DIM],
}

impl Obb {
    /// Creates a new OBB from its corner and its three edge vectors.
    #[inline]
    pub fn new(corner: Point<Real>, axes: [Vector<Real>; DIM]) -> Self {
        Self { corner, axes }
    }

    /// Computes the box with the given orientation that tightly encloses a set of points.
    ///
    /// `directions` must be three mutually orthogonal unit vectors. `origin` is any reference
    /// point (typically the mean of the points) used to keep the projections well conditioned.
    /// If `pts` is empty, the box is collapsed at `origin`.
    pub fn from_directions<'a>(
        origin: &Point<Real>,
        directions: &[Vector<Real>; DIM],
        pts: impl IntoIterator<Item = &'a Point<Real>>,
    ) -> Self {
        let mut mins = [Real::MAX; DIM];
        let mut maxs = [-Real::MAX; DIM];
        let mut empty = true;

        for pt in pts {
            empty = false;
            let dpt = pt - origin;
            for i in 0..DIM {
                let t = dpt.dot(&directions[i]);
                mins[i] = mins[i].min(t);
                maxs[i] = maxs[i].max(t);
            }
        }

        if empty {
            return Self::new(*origin, [Vector::zeros(); DIM]);
        }

        let mut corner = *origin;
        let mut axes = [Vector::zeros(); DIM];

        for i in 0..DIM {
            corner += directions[i] * mins[i];
            axes[i] = directions[i] * (maxs[i] - mins[i]);
        }

        Self::new(corner, axes)
    }

    /// The center of this box.
    #[inline]
    pub fn center(&self) -> Point<Real> {
        self.corner + (self.axes[0] + self.axes[1] + self.axes[2]) * 0.5
    }

    /// The lengths of the three edge vectors of this box.
    #[inline]
    pub fn extents(&self) -> Vector<Real> {
        Vector::new(self.axes[0].norm(), self.axes[1].norm(), self.axes[2].norm())
    }

    /// The volume of this box.
    #[inline]
    pub fn volume(&self) -> Real {
        self.axes[0].cross(&self.axes[1]).dot(&self.axes[2]).abs()
    }

    /// The interval spanned by the projection of this box on the (not necessarily unit) direction `dir`.
    ///
    /// Returns `(min, max)` of `dot(p, dir)` over all the points `p` of the box.
    #[inline]
    pub fn project_on(&self, dir: &Vector<Real>) -> (Real, Real) {
        let mut min = self.corner.coords.dot(dir);
        let mut max = min;

        for axis in &self.axes {
            let d = axis.dot(dir);
            if d > 0.0 {
                max += d;
            } else {
                min += d;
            }
        }

        (min, max)
    }

    /// The interval spanned by the box along its own `i`-th edge vector.
    ///
    /// This is the same as `self.project_on(&self.axes[i])` when the axes are orthogonal,
    /// but cheaper.
    #[inline]
    pub fn project_on_own_axis(&self, i: usize) -> (Real, Real) {
        let min = self.corner.coords.dot(&self.axes[i]);
        (min, min + self.axes[i].norm_squared())
    }

    /// Transforms this box by the homogeneous matrix `m`.
    ///
    /// The corner and the far end of each edge vector are transformed as points, so `m` is
    /// expected to be an affine (typically rigid) transform. Projective components are
    /// divided out.
    #[must_use]
    pub fn transform_by(&self, m: &HomogeneousMatrix) -> Self {
        let corner = m.transform_point(&self.corner);
        let axes = self
            .axes
            .map(|axis| m.transform_point(&(self.corner + axis)) - corner);
        Self::new(corner, axes)
    }

    /// The eight vertices of this box.
    ///
    /// The first four vertices are on the face at `corner` spanned by `axes[0]` and `axes[1]`
    /// in counter-clockwise order (when looking along `-axes[2]`), the last four are the same
    /// vertices offset by `axes[2]`.
    pub fn vertices(&self) -> [Point<Real>; 8] {
        let [a, b, c] = self.axes;
        let p = self.corner;
        [
            p,
            p + a,
            p + a + b,
            p + b,
            p + c,
            p + a + c,
            p + a + b + c,
            p + b + c,
        ]
    }

    /// Checks if this box contains the point `pt`, up to the absolute tolerance `eps`.
    ///
    /// Edge vectors with a zero length (flat boxes) are replaced by a unit normal to the
    /// remaining axes so that the flat direction is still tested.
    pub fn contains_local_point(&self, pt: &Point<Real>, eps: Real) -> bool {
        let dirs = self.unit_axes();
        let dpt = pt - self.corner;

        (0..DIM).all(|i| {
            let t = dpt.dot(&dirs[i]);
            let len = self.axes[i].norm();
            t >= -eps && t <= len + eps
        })
    }

    /// Unit directions of the three edge vectors.
    ///
    /// Zero-length edge vectors are replaced by unit vectors orthogonal to the other
    /// directions, so the result is always an orthonormal basis for boxes computed from data.
    pub fn unit_axes(&self) -> [Vector<Real>; DIM] {
        let normalized = self.axes.map(|a| a.try_normalize(Real::EPSILON));
        let mut dirs = [Vector::zeros(); DIM];

        for i in 0..DIM {
            dirs[i] = match normalized[i] {
                Some(dir) => dir,
                None => {
                    let j = (i + 1) % DIM;
                    let k = (i + 2) % DIM;
                    match (normalized[j], normalized[k]) {
                        (Some(u), Some(v)) => u.cross(&v),
                        (Some(u), None) | (None, Some(u)) => {
                            let other = if normalized[j].is_none() { j } else { k };
                            let a = any_orthogonal(&u);
                            if i < other {
                                a
                            } else {
                                u.cross(&a)
                            }
                        }
                        (None, None) => Vector::ith(i, 1.0),
                    }
                }
            };
        }

        dirs
    }
}

/// A unit vector orthogonal to the unit vector `u`.
fn any_orthogonal(u: &Vector<Real>) -> Vector<Real> {
    let i = u.iamin();
    let cross = u.cross(&Vector::ith(i, 1.0));
    cross.normalize()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::math::Isometry;

    fn unit_box() -> Obb {
        Obb::new(Point::origin(), [Vector::x(), Vector::y(), Vector::z()])
    }

    #[test]
    fn projection_of_a_unit_box() {
        let obb = unit_box();
        assert_eq!(obb.project_on(&Vector::new(1.0, 1.0, 0.0)), (0.0, 2.0));
        assert_eq!(obb.project_on(&Vector::new(-1.0, 0.0, 0.0)), (-1.0, 0.0));
        assert_eq!(obb.project_on_own_axis(2), (0.0, 1.0));
        assert_relative_eq!(obb.center(), Point::new(0.5, 0.5, 0.5));
    }

    #[test]
    fn rigid_transform_preserves_the_box_shape() {
        let obb = unit_box();
        let iso = Isometry::new(Vector::new(1.0, 2.0, 3.0), Vector::new(0.3, -0.2, 1.1));
        let moved = obb.transform_by(&iso.to_homogeneous());

        assert_relative_eq!(moved.extents(), obb.extents(), epsilon = 1.0e-12);
        assert_relative_eq!(moved.center(), iso * obb.center(), epsilon = 1.0e-12);
        assert_relative_eq!(moved.volume(), 1.0, epsilon = 1.0e-12);
    }

    #[test]
    fn flat_box_containment() {
        let flat = Obb::new(Point::origin(), [Vector::x(), Vector::y(), Vector::zeros()]);
        assert!(flat.contains_local_point(&Point::new(0.5, 0.5, 0.0), 1.0e-9));
        assert!(!flat.contains_local_point(&Point::new(0.5, 0.5, 0.1), 1.0e-9));
    }
}
