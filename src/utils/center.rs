use crate::math::{Point, Real};

/// Computes the geometric center (centroid) of a set of points.
///
/// All points are weighted equally. Returns the origin if `pts` is empty.
#[inline]
pub fn center(pts: &[Point<Real>]) -> Point<Real> {
    if pts.is_empty() {
        return Point::origin();
    }

    let denom: Real = 1.0 / (pts.len() as Real);
    let mut res = Point::origin();

    for pt in pts {
        res += pt.coords * denom;
    }

    res
}
