//! Application of the Separating Axis Theorem (SAT) to oriented boxes.
//!
//! Two convex shapes do **not** intersect if and only if there exists an axis onto which the
//! projections of both shapes do not overlap. For oriented boxes and triangles a finite set of
//! candidate axes suffices: the face normals of both shapes and the cross products of their
//! edge directions.

pub use self::sat_obb_obb::*;
pub use self::sat_obb_segment::*;
pub use self::sat_obb_triangle::*;

mod sat_obb_obb;
mod sat_obb_segment;
mod sat_obb_triangle;
