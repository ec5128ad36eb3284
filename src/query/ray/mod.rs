//! Line and segment intersections with triangles and mesh cells.

#[doc(inline)]
pub use self::ray::Ray;
pub use self::ray_cell::{cell_intersect_with_line, CellLineHit};
pub use self::ray_triangle::{segment_triangle_intersection, Sense, PARALLEL_THRESHOLD};

#[doc(hidden)]
pub mod ray;
mod ray_cell;
mod ray_triangle;
