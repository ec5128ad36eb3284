use super::{ObbNodeIndex, ObbTree};
use alloc::vec::Vec;

impl ObbTree {
    /// The number of leaves of the tree.
    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Collects the cells retained by the leaves of the subtree rooted at `id`.
    ///
    /// This is mostly a utility for debugging. Returns nothing if the tree doesn't retain its
    /// cell lists.
    pub fn subtree_cells(&self, id: ObbNodeIndex) -> Vec<u32> {
        let mut result = Vec::new();
        let mut stack = vec![id];

        while let Some(id) = stack.pop() {
            let node = &self[id];
            match node.children {
                Some([left, right]) => {
                    stack.push(right);
                    stack.push(left);
                }
                None => result.extend(node.cells.iter().flatten().copied()),
            }
        }

        result
    }

    /// Panics if the tree isn't well-formed.
    ///
    /// The tree is well-formed if it is topologically correct (every internal node has two
    /// children pointing back to it, only leaves carry cell lists, every cell appears in
    /// exactly one leaf) and geometrically correct (the box of every node contains all the
    /// points of the cells of its subtree, up to a small tolerance relative to the mesh size).
    /// The cell checks are skipped if the tree doesn't retain its cell lists.
    pub fn assert_well_formed(&self) {
        if self.nodes.is_empty() {
            return;
        }

        assert!(self.nodes[0].parent.is_none(), "the root has a parent");
        let mut visited = vec![false; self.nodes.len()];
        let mut stack = vec![ObbNodeIndex::ROOT];

        while let Some(id) = stack.pop() {
            assert!(!visited[id.get()], "node {:?} reached twice", id);
            visited[id.get()] = true;
            let node = &self[id];

            if let Some(children) = node.children {
                assert!(node.cells.is_none(), "internal node {:?} has cells", id);
                for child in children {
                    assert_eq!(self[child].parent, Some(id));
                    assert_eq!(self[child].depth, node.depth + 1);
                    stack.push(child);
                }
            } else {
                assert!(node.depth <= self.level);
                assert_eq!(
                    node.cells.is_some(),
                    self.config.retain_cell_lists,
                    "leaf {:?} cell list doesn't match the configuration",
                    id
                );
            }
        }

        assert!(visited.iter().all(|v| *v), "unreachable nodes");

        let Some(mesh) = &self.mesh else {
            return;
        };

        if !self.config.retain_cell_lists {
            return;
        }

        let mut all_cells = self.subtree_cells(ObbNodeIndex::ROOT);
        all_cells.sort_unstable();
        let expected: Vec<u32> = (0..mesh.num_cells() as u32).collect();
        assert_eq!(all_cells, expected, "cells missing or duplicated in the leaves");

        let eps = 1.0e-7 * (1.0 + mesh.bounds().diagonal_length());

        for (i, node) in self.nodes.iter().enumerate() {
            for cell in self.subtree_cells(ObbNodeIndex::new(i)) {
                for pt in mesh.cell_points(cell) {
                    assert!(
                        node.obb.contains_local_point(pt, eps),
                        "node {} doesn't contain the point {:?} of cell {}",
                        i,
                        pt,
                        cell
                    );
                }
            }
        }
    }
}
