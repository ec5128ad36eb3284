use crate::math::Real;
use crate::query::Ray;
use crate::shape::Triangle;
use crate::utils;

/// Orientation of a line crossing a closed, outward-oriented surface.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Sense {
    /// The line goes against the facet normal: it enters the volume.
    Entering,
    /// The line goes along the facet normal: it leaves the volume.
    Exiting,
}

/// Threshold on the cosine between a line and a facet plane under which the line is considered
/// parallel to the facet.
pub const PARALLEL_THRESHOLD: Real = 1.0e-6;

/// Intersects the segment `ray` (parametrized on `[0, 1]`) with a triangle.
///
/// Returns the parameter of the intersection along the segment together with the orientation
/// of the crossing relative to the triangle normal. When the segment is (nearly) parallel to
/// the triangle, or crosses its plane outside of it, a positive `tolerance` lets the segment
/// hit the triangle if it passes within `tolerance` of one of its edges.
///
/// Segments exactly parallel to the triangle plane, and degenerate triangles, never intersect.
pub fn segment_triangle_intersection(
    ray: &Ray,
    triangle: &Triangle,
    tolerance: Real,
) -> Option<(Real, Sense)> {
    let normal = triangle.normal()?;
    let den = normal.dot(&ray.dir);

    if den == 0.0 {
        return None;
    }

    let sense = if den < 0.0 {
        Sense::Entering
    } else {
        Sense::Exiting
    };

    if den.abs() > PARALLEL_THRESHOLD * ray.dir.norm() {
        let t = normal.dot(&(triangle.a - ray.origin)) / den;

        if !(0.0..=1.0).contains(&t) {
            return None;
        }

        let pt = ray.point_at(t);
        if utils::is_point_in_triangle(&pt, &triangle.a, &triangle.b, &triangle.c, 0.0) {
            return Some((t, sense));
        }
    }

    if tolerance > 0.0 {
        return segment_triangle_edges_proximity(ray, triangle, tolerance).map(|t| (t, sense));
    }

    None
}

/// The smallest segment parameter at which `ray` passes within `tolerance` of a triangle edge.
fn segment_triangle_edges_proximity(ray: &Ray, triangle: &Triangle, tolerance: Real) -> Option<Real> {
    let vertices = triangle.vertices();
    let end = ray.end();
    let tol2 = tolerance * tolerance;
    let mut best: Option<Real> = None;

    for i in 0..3 {
        let a = vertices[i];
        let b = vertices[(i + 1) % 3];
        let (s, u) = utils::closest_points_segment_segment_params(&ray.origin, &end, &a, &b);
        let on_ray = ray.point_at(s);
        let on_edge = a + (b - a) * u;

        if na::distance_squared(&on_ray, &on_edge) <= tol2
            && best.map(|t| s < t).unwrap_or(true)
        {
            best = Some(s);
        }
    }

    best
}
