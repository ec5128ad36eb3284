use crate::math::{Point, Real, Vector};
use na::Point2;

/// Tests if the given point is inside an arbitrary closed polygon with arbitrary orientation,
/// using a counting winding strategy.
///
/// The polygon is assumed to be closed, i.e., first and last point of the polygon are implicitly
/// assumed to be connected by an edge.
///
/// This handles concave polygons.
pub fn point_in_poly2d(pt: &Point2<Real>, poly: &[Point2<Real>]) -> bool {
    if poly.is_empty() {
        return false;
    }

    let mut winding = 0i32;

    for (i, a) in poly.iter().enumerate() {
        let b = poly[(i + 1) % poly.len()];
        let seg_dir = b - a;
        let dpt = pt - a;
        let perp = dpt.perp(&seg_dir);
        winding += match (dpt.y >= 0.0, b.y > pt.y) {
            (true, true) if perp < 0.0 => 1,
            (false, false) if perp > 0.0 => 1,
            _ => 0,
        };
    }

    winding % 2 == 1
}

/// Tests if a point lying on the plane of a planar 3D polygon is inside of that polygon.
///
/// The polygon and the point are projected along the dominant component of `normal`,
/// then tested with [`point_in_poly2d`].
pub fn point_in_polygon(pt: &Point<Real>, poly: &[Point<Real>], normal: &Vector<Real>) -> bool {
    if poly.len() < 3 {
        return false;
    }

    let abs = normal.abs();
    let (i, j) = if abs.x >= abs.y && abs.x >= abs.z {
        (1, 2)
    } else if abs.y >= abs.z {
        (2, 0)
    } else {
        (0, 1)
    };

    let proj = |p: &Point<Real>| Point2::new(p[i], p[j]);
    let poly2d: Vec<_> = poly.iter().map(proj).collect();
    point_in_poly2d(&proj(pt), &poly2d)
}
