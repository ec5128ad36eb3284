use crate::math::*;

/// The unit normal of the triangle `pts`, following the counter-clockwise winding.
///
/// Returns `None` if the triangle is degenerate.
#[inline]
pub fn ccw_face_normal(pts: [&Point<Real>; 3]) -> Option<UnitVector<Real>> {
    let ab = *pts[1] - *pts[0];
    let ac = *pts[2] - *pts[0];
    let res = ab.cross(&ac);

    UnitVector::try_new(res, DEFAULT_EPSILON)
}

/// The unit normal of a planar polygon, computed with Newell's method.
///
/// Newell's method accumulates the contribution of every edge so it stays well
/// defined for polygons whose first three vertices are collinear. Returns `None`
/// if the polygon has less than three vertices or a zero area.
pub fn polygon_normal(pts: &[Point<Real>]) -> Option<UnitVector<Real>> {
    if pts.len() < 3 {
        return None;
    }

    if pts.len() == 3 {
        return ccw_face_normal([&pts[0], &pts[1], &pts[2]]);
    }

    let mut normal = Vector::zeros();

    for (i, a) in pts.iter().enumerate() {
        let b = pts[(i + 1) % pts.len()];
        normal.x += (a.y - b.y) * (a.z + b.z);
        normal.y += (a.z - b.z) * (a.x + b.x);
        normal.z += (a.x - b.x) * (a.y + b.y);
    }

    UnitVector::try_new(normal, DEFAULT_EPSILON)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn newell_normal_matches_triangle_normal() {
        let quad = [
            Point::new(0.0, 0.0, 1.0),
            Point::new(2.0, 0.0, 1.0),
            Point::new(2.0, 3.0, 1.0),
            Point::new(0.0, 3.0, 1.0),
        ];
        let n = polygon_normal(&quad).unwrap();
        assert_relative_eq!(*n, Vector::z(), epsilon = 1.0e-12);

        let collinear = [
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.0, 0.0, 0.0),
            Point::new(2.0, 0.0, 0.0),
        ];
        assert!(polygon_normal(&collinear).is_none());
    }
}
