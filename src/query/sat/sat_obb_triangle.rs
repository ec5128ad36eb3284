use crate::bounding_volume::Obb;
use crate::math::{Real, Vector, DEFAULT_EPSILON};
use crate::shape::Triangle;

#[inline]
fn separated_along(obb: &Obb, triangle: &Triangle, dir: &Vector<Real>, eps: Real) -> bool {
    let (box_min, box_max) = obb.project_on(dir);
    let (tri_min, tri_max) = triangle.extents_on_dir(dir);
    box_max + eps < tri_min || tri_max + eps < box_min
}

/// Does the triangle intersect the oriented box?
///
/// Both shapes must be expressed in the same frame. This is a complete Separating Axis Theorem
/// test over the three axes of the box, the normal of the triangle, and the nine cross products
/// of a box axis with a triangle edge. `eps` is an absolute distance by which the intervals
/// must be apart to be considered separated.
pub fn obb_triangle_intersect(obb: &Obb, triangle: &Triangle, eps: Real) -> bool {
    let box_dirs = obb.unit_axes();

    if box_dirs
        .iter()
        .any(|dir| separated_along(obb, triangle, dir, eps))
    {
        return false;
    }

    if let Some(normal) = triangle.normal() {
        if separated_along(obb, triangle, &normal, eps) {
            return false;
        }
    }

    let edges = triangle.edges_scaled_directions();

    for box_dir in &box_dirs {
        for edge in &edges {
            if let Some(dir) = box_dir.cross(edge).try_normalize(DEFAULT_EPSILON) {
                if separated_along(obb, triangle, &dir, eps) {
                    return false;
                }
            }
        }
    }

    true
}
