/*!
obbtree3d
=========

**obbtree3d** is a 3-dimensional library of oriented-bounding-box trees and
mesh-versus-mesh collision detection written with the rust programming language.

The main entry points are:
- [`partitioning::ObbTree`]: a hierarchy of oriented bounding boxes built over the cells of a
  [`shape::PolyMesh`], with line, inside/outside and tree-versus-tree queries.
- [`collision::CollisionDetection`]: finds the pairs of cells of two meshes (each placed with
  its own transform) that touch, and the contact geometry between them.

*/

#![deny(non_camel_case_types)]
#![deny(unused_parens)]
#![deny(non_upper_case_globals)]
#![deny(unused_results)]
#![warn(missing_docs)]
#![warn(unused_imports)]
#![allow(missing_copy_implementations)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::module_inception)]
#![allow(clippy::manual_range_contains)] // This usually makes it way more verbose that it could be.

#[cfg(feature = "serde-serialize")]
#[macro_use]
extern crate serde;
#[macro_use]
extern crate approx;
extern crate alloc;
extern crate num_traits as num;

pub extern crate nalgebra as na;

pub mod bounding_volume;
pub mod collision;
pub mod partitioning;
pub mod query;
pub mod shape;
pub mod utils;

mod real {
    /// The scalar type used throughout this crate.
    pub use f64 as Real;
}

/// Aliases for mathematical types.
pub mod math {
    pub use super::real::*;
    pub use na::{Isometry3, Matrix3, Matrix4, Point3, Translation3, UnitVector3, Vector3};

    /// The default tolerance used for geometric operations.
    pub const DEFAULT_EPSILON: Real = Real::EPSILON;

    /// The dimension of the space.
    pub const DIM: usize = 3;

    /// The point type.
    pub use Point3 as Point;

    /// The vector type.
    pub use Vector3 as Vector;

    /// The unit vector type.
    pub use UnitVector3 as UnitVector;

    /// The matrix type.
    pub use Matrix3 as Matrix;

    /// The rigid transformation type.
    pub use Isometry3 as Isometry;

    /// The translation type.
    pub use Translation3 as Translation;

    /// The homogeneous transformation matrix type.
    ///
    /// Transforms between mesh frames are stored as full 4x4 matrices so that
    /// non-rigid placements supplied by callers are representable too.
    pub type HomogeneousMatrix = Matrix4<Real>;
}
