use crate::common;
use obbtree3d::partitioning::{ObbNodeIndex, ObbTree};
use oorandom::Rand64;
use std::sync::Arc;

#[test]
fn random_soups_build_well_formed_trees() {
    let mut rng = Rand64::new(42);

    for (n, cells_per_node) in [(1, 1), (7, 1), (64, 3), (300, 8), (300, 32)] {
        let mesh = Arc::new(common::random_triangle_soup(&mut rng, n, 20.0));
        let mut tree = ObbTree::from_mesh(mesh.clone());
        tree.set_cells_per_node(cells_per_node);
        tree.build_locator().unwrap();
        tree.assert_well_formed();

        let mut cells = tree.subtree_cells(ObbNodeIndex::ROOT);
        cells.sort_unstable();
        assert_eq!(cells, (0..n as u32).collect::<Vec<_>>());
        assert!(tree.leaf_count() <= 1 << tree.level());

        for node in tree.nodes() {
            assert!(node.depth <= tree.level());

            let Some(node_cells) = &node.cells else {
                continue;
            };

            for cell in node_cells {
                for pt in mesh.cell_points(*cell) {
                    assert!(node.obb.contains_local_point(pt, 1.0e-6));
                }
            }
        }
    }
}

#[test]
fn leaves_only_split_above_the_threshold() {
    let mut rng = Rand64::new(7);
    let mesh = Arc::new(common::random_triangle_soup(&mut rng, 100, 50.0));
    let mut tree = ObbTree::from_mesh(mesh);
    tree.set_cells_per_node(10);
    tree.build_locator().unwrap();

    for node in tree.nodes() {
        if node.is_leaf() {
            continue;
        }

        let [left, right] = node.children.unwrap();
        let num_cells = tree.subtree_cells(left).len() + tree.subtree_cells(right).len();
        assert!(num_cells > 10);
        assert!(!tree.subtree_cells(left).is_empty());
        assert!(!tree.subtree_cells(right).is_empty());
    }
}

#[test]
fn rebuild_happens_only_after_changes() {
    let mut tree = ObbTree::from_mesh(Arc::new(common::unit_cube()));
    tree.build_locator().unwrap();
    let first_build = tree.build_time();

    tree.build_locator().unwrap();
    assert_eq!(tree.build_time(), first_build);

    tree.set_max_level(tree.config().max_level);
    assert!(!tree.needs_rebuild());

    tree.set_cells_per_node(1);
    assert!(tree.needs_rebuild());
    tree.build_locator().unwrap();
    assert!(tree.build_time() > first_build);
    tree.assert_well_formed();
}
