use crate::common;
use obbtree3d::bounding_volume::Aabb;
use obbtree3d::collision::{
    intersect_polygon_with_polygon, CollisionConfig, CollisionDetection, CollisionMode,
};
use obbtree3d::math::{Isometry, Point, Vector};
use obbtree3d::shape::CellKind;
use std::sync::Arc;

fn sphere_and_cube(config: CollisionConfig) -> CollisionDetection {
    let mut collision = CollisionDetection::with_config(config);
    collision.set_mesh(0, Arc::new(common::uv_sphere(1.0, 10, 12)));
    collision.set_mesh(1, Arc::new(common::unit_cube()));
    collision.set_transform(0, &Isometry::identity());
    collision.set_transform(
        1,
        &Isometry::new(Vector::new(0.3, 0.2, 0.1), Vector::new(0.4, 0.1, -0.3)),
    );
    collision
}

fn run(mode: CollisionMode) -> CollisionDetection {
    let mut collision = sphere_and_cube(CollisionConfig {
        mode,
        ..CollisionConfig::default()
    });
    collision.update().unwrap();
    collision
}

#[test]
fn all_contacts_emits_one_segment_per_contact() {
    let collision = run(CollisionMode::AllContacts);
    let n = collision.number_of_contacts();
    let contacts = collision.contacts_output();

    assert!(n > 0);
    assert_eq!(contacts.num_points(), 2 * n);
    assert_eq!(contacts.num_cells(), n);

    for (k, (kind, ids)) in contacts.cells().enumerate() {
        assert_eq!(kind, CellKind::Line);
        assert_eq!(ids, &[2 * k as u32, 2 * k as u32 + 1]);
    }
}

#[test]
fn half_contacts_emits_one_vertex_per_contact() {
    let all = run(CollisionMode::AllContacts);
    let half = run(CollisionMode::HalfContacts);

    // Both modes find the same pairs, in the same order.
    assert_eq!(half.contacting_cells(0), all.contacting_cells(0));
    assert_eq!(half.contacting_cells(1), all.contacting_cells(1));
    assert_eq!(half.number_of_box_tests(), all.number_of_box_tests());

    let n = half.number_of_contacts();
    assert_eq!(half.contacts_output().num_points(), n);
    assert!(half
        .contacts_output()
        .cells()
        .all(|(kind, _)| kind == CellKind::Vertex));
}

#[test]
fn first_contact_reports_a_single_pair() {
    let all = run(CollisionMode::AllContacts);
    let first = run(CollisionMode::FirstContact);

    assert_eq!(first.number_of_contacts(), 1);
    assert_eq!(first.contacts_output().num_points(), 1);
    assert!(first.number_of_box_tests() <= all.number_of_box_tests());
    assert_eq!(first.collision_mode_as_str(), "FirstContact");
}

#[test]
fn reported_pairs_really_touch() {
    let collision = run(CollisionMode::AllContacts);
    let mesh0 = collision.mesh(0).unwrap().clone();
    let mesh1 = collision.mesh(1).unwrap().clone();
    let m1 = *collision.matrix(1).unwrap();

    let world1: Vec<Point<f64>> = mesh1.points().iter().map(|p| m1.transform_point(p)).collect();
    let bounds0 = mesh0.bounds();
    let bounds1 = Aabb::from_points(&world1);

    let pairs = collision
        .contacting_cells(0)
        .unwrap()
        .iter()
        .zip(collision.contacting_cells(1).unwrap());

    for (c0, c1) in pairs {
        let p: Vec<_> = mesh0.cell_points(*c0).copied().collect();
        let q: Vec<_> = mesh1
            .cell_points(*c1)
            .map(|p| m1.transform_point(p))
            .collect();
        assert!(intersect_polygon_with_polygon(&p, &q, 0.0, CollisionMode::HalfContacts).is_some());
    }

    for pt in collision.contacts_output().points() {
        assert!(bounds0.loosened(1.0e-9).contains_local_point(pt));
        assert!(bounds1.loosened(1.0e-9).contains_local_point(pt));
    }
}

#[test]
fn updates_are_deterministic() {
    let mut collision = run(CollisionMode::AllContacts);
    let cells0 = collision.contacting_cells(0).unwrap().to_vec();
    let cells1 = collision.contacting_cells(1).unwrap().to_vec();
    let points = collision.contacts_output().points().to_vec();
    let box_tests = collision.number_of_box_tests();

    collision.update().unwrap();
    assert_eq!(collision.contacting_cells(0).unwrap(), &cells0[..]);
    assert_eq!(collision.contacting_cells(1).unwrap(), &cells1[..]);
    assert_eq!(collision.contacts_output().points(), &points[..]);
    assert_eq!(collision.number_of_box_tests(), box_tests);
}

#[test]
fn contacting_cells_are_highlighted() {
    let mut collision = sphere_and_cube(CollisionConfig {
        generate_scalars: true,
        opacity: 0.5,
        ..CollisionConfig::default()
    });
    collision.update().unwrap();

    for i in 0..2 {
        let output = collision.output(i).unwrap();
        let colors = output.cell_colors().unwrap();
        let contacting = collision.contacting_cells(i).unwrap();
        assert_eq!(colors.len(), output.num_cells());

        for (cell, color) in colors.iter().enumerate() {
            if contacting.contains(&(cell as u32)) {
                assert_eq!(color[3], 255);
            } else {
                assert_eq!(*color, [255, 255, 255, 128]);
            }
        }
    }
}
