use super::{ObbNode, ObbNodeIndex, ObbTree, ObbTreeError};
use crate::math::HomogeneousMatrix;
use crate::query::sat;
use alloc::vec::Vec;

/// What a [`LeafPairProcessor`] tells the traversal after processing a pair of leaves.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LeafPairAction {
    /// Add the given count to the traversal result and continue.
    Continue(usize),
    /// Add the given count to the traversal result and stop the traversal immediately.
    Halt(usize),
}

/// Trait implemented by the callbacks invoked on each pair of overlapping leaves of a
/// dual-tree traversal.
///
/// This is implemented by every closure with the signature
/// `FnMut(&ObbNode, &ObbNode, Option<&HomogeneousMatrix>) -> LeafPairAction`.
pub trait LeafPairProcessor {
    /// Processes a pair of leaves whose boxes overlap.
    ///
    /// The first leaf belongs to the tree the traversal was started from, the second to the
    /// other tree. `b_to_a` is the transform mapping the second tree into the frame of the
    /// first one, if any.
    fn process_leaf_pair(
        &mut self,
        a: &ObbNode,
        b: &ObbNode,
        b_to_a: Option<&HomogeneousMatrix>,
    ) -> LeafPairAction;
}

impl<F> LeafPairProcessor for F
where
    F: FnMut(&ObbNode, &ObbNode, Option<&HomogeneousMatrix>) -> LeafPairAction,
{
    fn process_leaf_pair(
        &mut self,
        a: &ObbNode,
        b: &ObbNode,
        b_to_a: Option<&HomogeneousMatrix>,
    ) -> LeafPairAction {
        (self)(a, b, b_to_a)
    }
}

/// Summary of a dual-tree traversal.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TraversalReport {
    /// The sum of the counts returned by the leaf-pair processor.
    pub count: usize,
    /// The number of node pairs whose boxes were tested for overlap.
    pub node_pairs_tested: usize,
    /// The number of overlapping leaf pairs handed to the processor.
    pub leaf_pairs_visited: usize,
    /// Did the processor stop the traversal?
    pub halted: bool,
}

impl ObbTree {
    /// Are the boxes of the nodes `a` (of this tree) and `b` disjoint?
    ///
    /// `b_to_a` maps `b` into the frame of `a`. This uses the tolerance of this tree.
    pub fn disjoint_obb_nodes(
        &self,
        a: &ObbNode,
        b: &ObbNode,
        b_to_a: Option<&HomogeneousMatrix>,
    ) -> bool {
        sat::obb_obb_disjoint(&a.obb, &b.obb, b_to_a, self.config.tolerance)
    }

    /// Finds all the pairs of overlapping leaves between this tree and `other`.
    ///
    /// Both trees are built first if needed. `b_to_a` maps the frame of `other` into the frame
    /// of `self`. The `processor` is called on every pair of leaves (the first from `self`, the
    /// second from `other`) whose boxes overlap, and can stop the traversal early.
    pub fn intersect_with_obb_tree(
        &mut self,
        other: &mut ObbTree,
        b_to_a: Option<&HomogeneousMatrix>,
        processor: &mut impl LeafPairProcessor,
    ) -> Result<TraversalReport, ObbTreeError> {
        self.build_locator()?;
        other.build_locator()?;
        Ok(self.traverse_dual(other, b_to_a, processor))
    }

    /// Same as [`Self::intersect_with_obb_tree`] but doesn't attempt to build the trees.
    ///
    /// Returns an empty report if one of the trees isn't built.
    pub fn traverse_dual(
        &self,
        other: &ObbTree,
        b_to_a: Option<&HomogeneousMatrix>,
        processor: &mut impl LeafPairProcessor,
    ) -> TraversalReport {
        let mut report = TraversalReport::default();

        if !self.is_built() || !other.is_built() {
            return report;
        }

        let min_depth = self.level.min(other.level) as usize;
        let depth_diff = self.level.abs_diff(other.level) as usize;
        let mut stack: Vec<(ObbNodeIndex, ObbNodeIndex)> =
            Vec::with_capacity(3 * min_depth + 2 * depth_diff + 1);
        stack.push((ObbNodeIndex::ROOT, ObbNodeIndex::ROOT));

        while let Some((ia, ib)) = stack.pop() {
            let a = &self[ia];
            let b = &other[ib];
            report.node_pairs_tested += 1;

            if self.disjoint_obb_nodes(a, b, b_to_a) {
                continue;
            }

            match (a.children, b.children) {
                (None, None) => {
                    report.leaf_pairs_visited += 1;
                    match processor.process_leaf_pair(a, b, b_to_a) {
                        LeafPairAction::Continue(n) => report.count += n,
                        LeafPairAction::Halt(n) => {
                            report.count += n;
                            report.halted = true;
                            break;
                        }
                    }
                }
                (None, Some([b0, b1])) => {
                    stack.push((ia, b0));
                    stack.push((ia, b1));
                }
                (Some([a0, a1]), None) => {
                    stack.push((a0, ib));
                    stack.push((a1, ib));
                }
                (Some([a0, a1]), Some([b0, b1])) => {
                    stack.push((a0, b0));
                    stack.push((a1, b0));
                    stack.push((a0, b1));
                    stack.push((a1, b1));
                }
            }
        }

        log::trace!(
            "dual traversal: {} node pairs tested, {} leaf pairs visited",
            report.node_pairs_tested,
            report.leaf_pairs_visited
        );

        report
    }
}
