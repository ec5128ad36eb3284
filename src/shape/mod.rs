//! Shapes supported by obbtree3d.

pub use self::poly_mesh::{CellKind, PolyMesh, PolyMeshError};
pub use self::triangle::Triangle;

mod poly_mesh;
mod triangle;
