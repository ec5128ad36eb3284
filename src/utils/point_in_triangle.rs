//! Function to check if a point is inside a triangle and related functions.

use crate::math::{Point, Real};

/// The squared distance between the point `p` and the segment `[a, b]`.
pub fn point_segment_distance_squared(p: &Point<Real>, a: &Point<Real>, b: &Point<Real>) -> Real {
    let ab = b - a;
    let ap = p - a;
    let len2 = ab.norm_squared();

    if len2 == 0.0 {
        return ap.norm_squared();
    }

    let t = na::clamp(ap.dot(&ab) / len2, 0.0, 1.0);
    (ap - ab * t).norm_squared()
}

/// Returns `true` if the point `p`, assumed to lie on the plane of the triangle `(v1, v2, v3)`,
/// is inside of the triangle.
///
/// The point is first classified against the three edges of the triangle. If it lies outside
/// of some edge, it is still considered inside when its squared distance to one of the edges is
/// smaller than `tol2`.
///
/// Returns `false` for degenerate triangles unless the point is within `tol2` of an edge.
pub fn is_point_in_triangle(
    p: &Point<Real>,
    v1: &Point<Real>,
    v2: &Point<Real>,
    v3: &Point<Real>,
    tol2: Real,
) -> bool {
    let n = (v2 - v1).cross(&(v3 - v1));

    if n.norm_squared() > 0.0 {
        let s1 = (v2 - v1).cross(&(p - v1)).dot(&n);
        let s2 = (v3 - v2).cross(&(p - v2)).dot(&n);
        let s3 = (v1 - v3).cross(&(p - v3)).dot(&n);

        if s1 >= 0.0 && s2 >= 0.0 && s3 >= 0.0 {
            return true;
        }
    }

    tol2 > 0.0
        && (point_segment_distance_squared(p, v1, v2) <= tol2
            || point_segment_distance_squared(p, v2, v3) <= tol2
            || point_segment_distance_squared(p, v3, v1) <= tol2)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn point_in_triangle_with_tolerance() {
        let a = Point::new(0.0, 0.0, 0.0);
        let b = Point::new(1.0, 0.0, 0.0);
        let c = Point::new(0.0, 1.0, 0.0);

        assert!(is_point_in_triangle(&Point::new(0.25, 0.25, 0.0), &a, &b, &c, 0.0));
        assert!(is_point_in_triangle(&Point::new(0.5, 0.0, 0.0), &a, &b, &c, 0.0));
        assert!(!is_point_in_triangle(&Point::new(0.6, 0.6, 0.0), &a, &b, &c, 0.0));
        assert!(!is_point_in_triangle(&Point::new(0.5, -0.01, 0.0), &a, &b, &c, 0.0));
        assert!(is_point_in_triangle(&Point::new(0.5, -0.01, 0.0), &a, &b, &c, 1.0e-3));
        // Winding doesn't matter.
        assert!(is_point_in_triangle(&Point::new(0.25, 0.25, 0.0), &a, &c, &b, 0.0));
    }
}
