use crate::common;
use obbtree3d::math::{Point, Real};
use obbtree3d::partitioning::{Containment, ObbTree};
use obbtree3d::query::Sense;
use oorandom::Rand64;
use std::sync::Arc;

fn cube_tree() -> ObbTree {
    let mut tree = ObbTree::from_mesh(Arc::new(common::unit_cube()));
    tree.set_cells_per_node(2);
    tree
}

#[test]
fn segment_through_cube_crosses_twice() {
    let mut tree = cube_tree();
    let hits = tree
        .intersect_with_line(&Point::new(-1.0, 0.3, 0.4), &Point::new(2.0, 0.3, 0.4))
        .unwrap();

    assert_eq!(hits.len(), 2);
    assert_eq!(hits.first_sense(), Some(Sense::Entering));
    assert_eq!(hits.hits[1].sense, Sense::Exiting);
    assert_relative_eq!(hits.hits[0].toi, 1.0 / 3.0, epsilon = 1.0e-9);
    assert_relative_eq!(hits.hits[1].toi, 2.0 / 3.0, epsilon = 1.0e-9);
    assert_relative_eq!(hits.hits[0].point, Point::new(0.0, 0.3, 0.4), epsilon = 1.0e-9);
    assert_relative_eq!(hits.hits[1].point, Point::new(1.0, 0.3, 0.4), epsilon = 1.0e-9);
}

#[test]
fn segment_shorter_than_tolerance_crosses_face() {
    let mut tree = cube_tree();
    tree.set_tolerance(0.001);

    for half in [0.0004, 0.001, 0.5] {
        let hits = tree
            .intersect_with_line(&Point::new(0.3, 0.4, -half), &Point::new(0.3, 0.4, half))
            .unwrap();

        assert_eq!(hits.len(), 1, "segment of half-length {}", half);
        assert_eq!(hits.first_sense(), Some(Sense::Entering));
        assert_relative_eq!(hits.hits[0].toi, 0.5, epsilon = 1.0e-9);
        assert_relative_eq!(hits.hits[0].point, Point::new(0.3, 0.4, 0.0), epsilon = 1.0e-12);
    }
}

#[test]
fn segment_missing_the_cube_has_no_crossing() {
    let mut tree = cube_tree();
    let hits = tree
        .intersect_with_line(&Point::new(-1.0, 2.0, 0.4), &Point::new(2.0, 2.0, 0.4))
        .unwrap();
    assert!(hits.is_empty());

    let closest = tree
        .intersect_with_line_closest(&Point::new(-1.0, 2.0, 0.4), &Point::new(2.0, 2.0, 0.4), 0.0)
        .unwrap();
    assert!(closest.is_none());
}

#[test]
fn closest_crossing_is_the_entry_point() {
    let mut tree = cube_tree();
    let hit = tree
        .intersect_with_line_closest(&Point::new(0.3, 0.6, 3.0), &Point::new(0.3, 0.6, -3.0), 0.0)
        .unwrap()
        .unwrap();

    assert_relative_eq!(hit.point, Point::new(0.3, 0.6, 1.0), epsilon = 1.0e-9);
    let ids = tree.mesh().unwrap().cell_point_ids(hit.cell_id);
    assert!(ids.iter().all(|id| *id >= 4));
}

#[test]
fn random_points_are_classified() {
    let mut rng = Rand64::new(3);
    let mut tree = cube_tree();
    // No edge proximity: grazing hits would make the first crossing ambiguous.
    tree.set_tolerance(0.0);

    for _ in 0..200 {
        let inside = Point::new(
            0.05 + rng.rand_float() * 0.9,
            0.05 + rng.rand_float() * 0.9,
            0.05 + rng.rand_float() * 0.9,
        );
        assert_eq!(tree.inside_or_outside(&inside).unwrap(), Some(Containment::Inside));

        let dir = common::random_vector(&mut rng, 2.0);
        let Some(dir) = dir.try_normalize(1.0e-3) else {
            continue;
        };
        let outside = Point::new(0.5, 0.5, 0.5) + dir * (1.0 + rng.rand_float() as Real);
        assert_eq!(tree.inside_or_outside(&outside).unwrap(), Some(Containment::Outside));
    }
}
