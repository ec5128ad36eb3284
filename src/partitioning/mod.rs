//! Spatial partitioning tools.

pub use self::obb_tree::{
    ClosestLineHit, Containment, LeafPairAction, LeafPairProcessor, LineHit, LineIntersections,
    ObbNode, ObbNodeIndex, ObbTree, ObbTreeConfig, ObbTreeError, SplitHeuristic, TraversalReport,
};

mod obb_tree;
