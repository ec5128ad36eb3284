use super::CollisionMode;
use crate::math::{Point, Real, Vector};
use crate::utils;
use arrayvec::ArrayVec;

/// Threshold on the cosine between a segment and a plane under which the segment is considered
/// parallel to the plane. Also bounds, relative to the segment length, the distance under which
/// a parallel segment lies on the plane.
pub const PLANE_PARALLEL_EPSILON: Real = 1.0e-6;

/// The contact points found between two polygons: one or two points depending on the
/// [`CollisionMode`].
pub type ContactPoints = ArrayVec<Point<Real>, 2>;

/// Location of a segment relative to a plane.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SegmentPlaneIntersection {
    /// The segment crosses the plane at the given point.
    Hit(Point<Real>),
    /// The segment doesn't touch the plane.
    Miss,
    /// The segment lies on the plane.
    OnPlane,
}

/// Intersects the segment `[a, b]` with the plane going through `origin` with the unit normal
/// `normal`.
///
/// A segment making an angle with the plane below [`PLANE_PARALLEL_EPSILON`] is either
/// [`SegmentPlaneIntersection::OnPlane`] if it lies on the plane, or a
/// [`SegmentPlaneIntersection::Miss`] otherwise. Both tests are relative to the segment length
/// so that rounding errors of rotated geometry don't turn an edge lying on the plane into a hit.
pub fn segment_plane_intersection(
    a: &Point<Real>,
    b: &Point<Real>,
    origin: &Point<Real>,
    normal: &Vector<Real>,
) -> SegmentPlaneIntersection {
    let dir = b - a;
    let num = normal.dot(&(origin - a));
    let den = normal.dot(&dir);
    let threshold = dir.norm() * PLANE_PARALLEL_EPSILON;

    if den.abs() <= threshold {
        return if num.abs() <= threshold {
            SegmentPlaneIntersection::OnPlane
        } else {
            SegmentPlaneIntersection::Miss
        };
    }

    let t = num / den;
    if (0.0..=1.0).contains(&t) {
        SegmentPlaneIntersection::Hit(a + dir * t)
    } else {
        SegmentPlaneIntersection::Miss
    }
}

/// Is `pt`, assumed on the plane of `poly`, inside of `poly`?
fn point_in_polygon(pt: &Point<Real>, poly: &[Point<Real>], normal: &Vector<Real>, tol2: Real) -> bool {
    if poly.len() == 3 {
        utils::is_point_in_triangle(pt, &poly[0], &poly[1], &poly[2], tol2)
    } else {
        utils::point_in_polygon(pt, poly, normal)
    }
}

/// Accumulates contact points until the collision mode is satisfied.
struct ContactCollector {
    points: ContactPoints,
    wanted: usize,
}

impl ContactCollector {
    fn new(mode: CollisionMode) -> Self {
        Self {
            points: ArrayVec::new(),
            wanted: if mode == CollisionMode::AllContacts { 2 } else { 1 },
        }
    }

    /// Records a point. Returns `true` once enough points were found.
    fn push(&mut self, pt: Point<Real>) -> bool {
        if self.points.len() < self.wanted {
            self.points.push(pt);
        }
        self.is_full()
    }

    fn is_full(&self) -> bool {
        self.points.len() >= self.wanted
    }
}

/// Intersects the edges of `p` with the polygon `q` of normal `q_normal`.
///
/// Returns `true` once the collector is full.
fn intersect_edges_with_polygon(
    p: &[Point<Real>],
    q: &[Point<Real>],
    q_normal: &Vector<Real>,
    tol2: Real,
    collector: &mut ContactCollector,
) -> bool {
    let mut on_plane_in_a_row = 0;
    let mut coplanar_checked = false;

    for i in 0..p.len() {
        let a = &p[i];
        let b = &p[(i + 1) % p.len()];

        match segment_plane_intersection(a, b, &q[0], q_normal) {
            SegmentPlaneIntersection::Hit(x) => {
                on_plane_in_a_row = 0;
                if point_in_polygon(&x, q, q_normal, tol2) && collector.push(x) {
                    return true;
                }
            }
            SegmentPlaneIntersection::Miss => on_plane_in_a_row = 0,
            SegmentPlaneIntersection::OnPlane => {
                on_plane_in_a_row += 1;

                if on_plane_in_a_row > 1 && !coplanar_checked {
                    coplanar_checked = true;
                    if intersect_coplanar_polygons(p, q, q_normal, tol2, collector) {
                        return true;
                    }
                }
            }
        }
    }

    false
}

/// Finds the contacts between the polygons `p` and `q` lying on the same plane.
///
/// Every edge of `p` is intersected with every edge of `q`, then the vertices of `p` lying
/// inside of `q` are added.
fn intersect_coplanar_polygons(
    p: &[Point<Real>],
    q: &[Point<Real>],
    q_normal: &Vector<Real>,
    tol2: Real,
    collector: &mut ContactCollector,
) -> bool {
    for i in 0..p.len() {
        let a = &p[i];
        let b = &p[(i + 1) % p.len()];

        for j in 0..q.len() {
            let c = &q[j];
            let d = &q[(j + 1) % q.len()];

            if let Some((_, x)) = utils::segments_intersection3d(a, b, c, d, tol2) {
                if collector.push(x) {
                    return true;
                }
            }
        }
    }

    for pt in p {
        if point_in_polygon(pt, q, q_normal, tol2) && collector.push(*pt) {
            return true;
        }
    }

    false
}

/// Computes the contact points between two planar polygons.
///
/// Each edge of one polygon is intersected with the plane of the other, and the intersection
/// point is kept if it lies inside of the other polygon (up to the squared distance `tol2` for
/// triangles). If two consecutive edges lie on the other plane, the polygons are
/// handled as coplanar: their edges are intersected pairwise and the vertices of one polygon
/// lying inside of the other are kept.
///
/// In [`CollisionMode::AllContacts`] mode two points are returned (the same point twice if only
/// one could be found), otherwise the first point found is returned. Polygons with less than
/// three points or without a well-defined normal never intersect.
pub fn intersect_polygon_with_polygon(
    p: &[Point<Real>],
    q: &[Point<Real>],
    tol2: Real,
    mode: CollisionMode,
) -> Option<ContactPoints> {
    if p.len() < 3 || q.len() < 3 {
        log::debug!(
            "skipping the intersection of polygons with {} and {} points",
            p.len(),
            q.len()
        );
        return None;
    }

    let (Some(p_normal), Some(q_normal)) = (utils::polygon_normal(p), utils::polygon_normal(q)) else {
        log::debug!("skipping the intersection of degenerate polygons");
        return None;
    };

    let mut collector = ContactCollector::new(mode);

    if !intersect_edges_with_polygon(p, q, &q_normal, tol2, &mut collector) {
        let _ = intersect_edges_with_polygon(q, p, &p_normal, tol2, &mut collector);
    }

    let mut points = collector.points;
    let first = *points.first()?;

    if mode == CollisionMode::AllContacts && points.len() < 2 {
        points.push(first);
    }

    Some(points)
}
