//! Non-persistent geometric queries.
//!
//! # General cases
//! The most general queries provided by this module are the separating-axis tests between
//! oriented boxes, segments and triangles (in [`sat`]) and the segment-versus-cell
//! intersections (in the `ray` submodule, re-exported here).

pub use self::ray::{
    cell_intersect_with_line, segment_triangle_intersection, CellLineHit, Ray, Sense,
    PARALLEL_THRESHOLD,
};

mod ray;
pub mod sat;
