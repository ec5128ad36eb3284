pub use self::obb_queries::{ClosestLineHit, Containment, LineHit, LineIntersections};
pub use self::obb_traverse_dual::{LeafPairAction, LeafPairProcessor, TraversalReport};
pub use self::obb_tree::{
    ObbNode, ObbNodeIndex, ObbTree, ObbTreeConfig, ObbTreeError, SplitHeuristic,
};

mod obb_build;
mod obb_queries;
mod obb_traverse_dual;
mod obb_tree;
mod obb_validation;
