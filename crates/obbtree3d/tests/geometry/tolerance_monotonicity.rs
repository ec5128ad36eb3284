use crate::common;
use obbtree3d::collision::CollisionDetection;
use obbtree3d::math::{HomogeneousMatrix, Isometry, Vector};
use obbtree3d::partitioning::{LeafPairAction, ObbNode, ObbTree};
use std::sync::Arc;

fn placed_spheres() -> (Arc<obbtree3d::shape::PolyMesh>, Arc<obbtree3d::shape::PolyMesh>, Isometry<f64>) {
    let a = Arc::new(common::uv_sphere(1.0, 10, 14));
    let b = Arc::new(common::uv_sphere(0.8, 8, 12));
    let pos = Isometry::new(Vector::new(1.55, 0.2, 0.1), Vector::new(0.3, -0.2, 0.5));
    (a, b, pos)
}

#[test]
fn leaf_pairs_visited_grow_with_the_tolerance() {
    let (mesh_a, mesh_b, pos) = placed_spheres();
    let b_to_a = pos.to_homogeneous();
    let mut tree_a = ObbTree::from_mesh(mesh_a);
    let mut tree_b = ObbTree::from_mesh(mesh_b);
    tree_a.set_cells_per_node(2);
    tree_b.set_cells_per_node(2);

    let mut previous = 0;

    for tolerance in [0.0, 0.001, 0.01, 0.05, 0.2, 1.0] {
        tree_a.set_tolerance(tolerance);
        let mut processor =
            |_: &ObbNode, _: &ObbNode, _: Option<&HomogeneousMatrix>| LeafPairAction::Continue(1);
        let report = tree_a
            .intersect_with_obb_tree(&mut tree_b, Some(&b_to_a), &mut processor)
            .unwrap();

        assert_eq!(report.count, report.leaf_pairs_visited);
        assert!(!report.halted);
        assert!(report.leaf_pairs_visited >= previous);
        previous = report.leaf_pairs_visited;
    }

    assert!(previous > 0);
}

#[test]
fn box_tests_grow_with_the_box_tolerance() {
    let (mesh_a, mesh_b, pos) = placed_spheres();
    let mut collision = CollisionDetection::new();
    collision.set_mesh(0, mesh_a);
    collision.set_mesh(1, mesh_b);
    collision.set_transform(0, &Isometry::identity());
    collision.set_transform(1, &pos);

    let mut previous = 0;
    let mut contacts = None;

    for tolerance in [0.0, 0.001, 0.01, 0.1, 0.5] {
        collision.set_box_tolerance(tolerance);
        collision.update().unwrap();

        assert!(collision.number_of_box_tests() >= previous);
        previous = collision.number_of_box_tests();

        // The box tolerance only prunes: the exact contacts don't change.
        let cells = collision.contacting_cells(0).unwrap().len();
        assert_eq!(*contacts.get_or_insert(cells), cells);
    }

    assert!(collision.is_colliding());
}
