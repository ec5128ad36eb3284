use crate::math::{Point, Real, DEFAULT_EPSILON};

/// Parameters `(s, t)` of the closest points between the segments `[a, b]` and `[c, d]`.
///
/// The closest point on the first segment is `a + (b - a) * s` and the closest point on the
/// second segment is `c + (d - c) * t`. Both parameters are clamped to `[0, 1]`.
pub fn closest_points_segment_segment_params(
    a: &Point<Real>,
    b: &Point<Real>,
    c: &Point<Real>,
    d: &Point<Real>,
) -> (Real, Real) {
    // Inspired by RealField-time collision detection by Christer Ericson.
    let d1 = b - a;
    let d2 = d - c;
    let r = a - c;

    let a = d1.norm_squared();
    let e = d2.norm_squared();
    let f = d2.dot(&r);

    let mut s;
    let mut t;

    let eps = DEFAULT_EPSILON;
    if a <= eps && e <= eps {
        s = 0.0;
        t = 0.0;
    } else if a <= eps {
        s = 0.0;
        t = na::clamp(f / e, 0.0, 1.0);
    } else {
        let c = d1.dot(&r);
        if e <= eps {
            t = 0.0;
            s = na::clamp(-c / a, 0.0, 1.0);
        } else {
            let b = d1.dot(&d2);
            let ae = a * e;
            let bb = b * b;
            let denom = ae - bb;

            // Use absolute and ulps error to test collinearity.
            if denom > eps && !ulps_eq!(ae, bb) {
                s = na::clamp((b * f - c * e) / denom, 0.0, 1.0);
            } else {
                s = 0.0;
            }

            t = (b * s + f) / e;

            if t < 0.0 {
                t = 0.0;
                s = na::clamp(-c / a, 0.0, 1.0);
            } else if t > 1.0 {
                t = 1.0;
                s = na::clamp((b - c) / a, 0.0, 1.0);
            }
        }
    }

    (s, t)
}

/// Computes an intersection point between the segments `[a, b]` and `[c, d]`.
///
/// The segments are considered intersecting if the distance between their closest points is
/// smaller than `sqrt(tol2)` (with a small absolute floor so that exactly crossing segments
/// are found even when `tol2` is zero).
///
/// Returns the parameter of the intersection on the first segment, and the intersection point
/// (midway between both closest points).
pub fn segments_intersection3d(
    a: &Point<Real>,
    b: &Point<Real>,
    c: &Point<Real>,
    d: &Point<Real>,
    tol2: Real,
) -> Option<(Real, Point<Real>)> {
    let (s, t) = closest_points_segment_segment_params(a, b, c, d);
    let p1 = a + (b - a) * s;
    let p2 = c + (d - c) * t;
    let scale = (b - a).norm_squared().max((d - c).norm_squared());
    let threshold = tol2.max(scale * 1.0e-12);

    if na::distance_squared(&p1, &p2) <= threshold {
        Some((s, na::center(&p1, &p2)))
    } else {
        None
    }
}
