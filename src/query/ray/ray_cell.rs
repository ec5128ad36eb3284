use crate::math::{Point, Real};
use crate::query::{segment_triangle_intersection, Ray};
use crate::shape::{CellKind, PolyMesh, Triangle};
use crate::utils;

/// The intersection between a segment and a mesh cell.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CellLineHit {
    /// Parameter of the intersection along the segment, in `[0, 1]`.
    pub toi: Real,
    /// The intersection point.
    pub point: Point<Real>,
    /// The sub-element of the cell that was hit: the point index for vertex cells, the segment
    /// index for line cells, and the triangle index for surface cells.
    pub sub_id: u32,
}

/// Intersects the segment `ray` (parametrized on `[0, 1]`) with the `cell`-th cell of `mesh`.
///
/// Vertex and line cells are hit when they pass within `tolerance` of the segment. Surface
/// cells are decomposed into triangles. Returns the hit closest to the start of the segment.
pub fn cell_intersect_with_line(
    mesh: &PolyMesh,
    cell: u32,
    ray: &Ray,
    tolerance: Real,
) -> Option<CellLineHit> {
    let kind = mesh.cell_kind(cell);
    let ids = mesh.cell_point_ids(cell);
    let tol2 = tolerance * tolerance;
    let end = ray.end();
    let mut best: Option<(Real, u32)> = None;
    let mut keep_best = |toi: Real, sub_id: u32| {
        if best.map(|b| toi < b.0).unwrap_or(true) {
            best = Some((toi, sub_id));
        }
    };

    match kind {
        CellKind::Vertex | CellKind::PolyVertex => {
            for (k, id) in ids.iter().enumerate() {
                let pt = mesh.point(*id);
                let len2 = ray.dir.norm_squared();
                let toi = if len2 > 0.0 {
                    na::clamp((pt - ray.origin).dot(&ray.dir) / len2, 0.0, 1.0)
                } else {
                    0.0
                };

                if na::distance_squared(&ray.point_at(toi), pt) <= tol2 {
                    keep_best(toi, k as u32);
                }
            }
        }
        CellKind::Line | CellKind::PolyLine => {
            for (k, seg) in ids.windows(2).enumerate() {
                let a = mesh.point(seg[0]);
                let b = mesh.point(seg[1]);
                let (s, u) = utils::closest_points_segment_segment_params(&ray.origin, &end, a, b);
                let on_edge = a + (b - a) * u;

                if na::distance_squared(&ray.point_at(s), &on_edge) <= tol2 {
                    keep_best(s, k as u32);
                }
            }
        }
        _ => {
            for (k, tri) in mesh.cell_triangles(cell).enumerate() {
                let triangle = Triangle::new(
                    *mesh.point(tri[0]),
                    *mesh.point(tri[1]),
                    *mesh.point(tri[2]),
                );

                if let Some((toi, _)) = segment_triangle_intersection(ray, &triangle, tolerance) {
                    keep_best(toi, k as u32);
                }
            }
        }
    }

    best.map(|(toi, sub_id)| CellLineHit {
        toi,
        point: ray.point_at(toi),
        sub_id,
    })
}
