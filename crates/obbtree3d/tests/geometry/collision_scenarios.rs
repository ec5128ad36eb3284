use crate::common;
use obbtree3d::collision::{CollisionDetection, CollisionMode};
use obbtree3d::math::{Isometry, Point, Vector};
use obbtree3d::shape::{CellKind, PolyMesh};
use std::sync::Arc;

fn cubes(shift: Vector<f64>, mode: CollisionMode) -> CollisionDetection {
    let mut collision = CollisionDetection::new();
    collision.set_collision_mode(mode);
    collision.set_mesh(0, Arc::new(common::unit_cube()));
    collision.set_mesh(1, Arc::new(common::unit_cube()));
    collision.set_transform(0, &Isometry::identity());
    collision.set_transform(1, &Isometry::translation(shift.x, shift.y, shift.z));
    collision
}

#[test]
fn overlapping_cubes_collide() {
    let mut collision = cubes(Vector::new(0.5, 0.0, 0.0), CollisionMode::AllContacts);
    collision.update().unwrap();

    let n = collision.number_of_contacts();
    assert!(n > 0);
    assert_eq!(collision.contacting_cells(1).unwrap().len(), n);
    assert_eq!(collision.contacts_output().num_points(), 2 * n);
    assert_eq!(collision.contacts_output().num_cells(), n);

    // Every contact point is on both surfaces, so inside of both cubes.
    for pt in collision.contacts_output().points() {
        assert!(pt.x >= 0.5 - 1.0e-9 && pt.x <= 1.0 + 1.0e-9);
        assert!(pt.y >= -1.0e-9 && pt.y <= 1.0 + 1.0e-9);
        assert!(pt.z >= -1.0e-9 && pt.z <= 1.0 + 1.0e-9);
    }

    // The cells of the second output are expressed in the frame of the second cube.
    let output = collision.output(1).unwrap();
    assert_eq!(output.num_cells(), 12);
    assert_eq!(output.points(), common::unit_cube().points());
}

#[test]
fn distant_cubes_dont_collide() {
    let mut collision = cubes(Vector::new(10.0, 0.0, 0.0), CollisionMode::AllContacts);
    collision.update().unwrap();

    assert!(!collision.is_colliding());
    assert_eq!(collision.number_of_box_tests(), 0);
    assert!(collision.contacts_output().is_empty());
    assert_eq!(collision.contacts_output().num_points(), 0);
    assert_eq!(collision.contacting_cells(0), Some(&[][..]));
    assert_eq!(collision.contacting_cells(1), Some(&[][..]));
}

#[test]
fn first_contact_stops_early() {
    let mut all = cubes(Vector::new(0.5, 0.0, 0.0), CollisionMode::AllContacts);
    all.update().unwrap();
    let mut first = cubes(Vector::new(0.5, 0.0, 0.0), CollisionMode::FirstContact);
    first.update().unwrap();

    assert_eq!(first.number_of_contacts(), 1);
    assert!(first.number_of_box_tests() <= all.number_of_box_tests());
    assert_eq!(first.contacts_output().num_points(), 1);
    assert_eq!(first.contacts_output().cell_kind(0), CellKind::Vertex);
    assert_eq!(
        first.contacting_cells(0).unwrap()[0],
        all.contacting_cells(0).unwrap()[0]
    );
    assert_eq!(
        first.contacting_cells(1).unwrap()[0],
        all.contacting_cells(1).unwrap()[0]
    );
}

fn coplanar_triangle(offset: f64, tilt: &Isometry<f64>) -> Arc<PolyMesh> {
    let pts = vec![
        tilt * Point::new(offset, offset, 0.0),
        tilt * Point::new(1.0 + offset, offset, 0.0),
        tilt * Point::new(offset, 1.0 + offset, 0.0),
    ];
    Arc::new(PolyMesh::from_triangles(pts, &[[0, 1, 2]]).unwrap())
}

fn check_coplanar_contacts(collision: &CollisionDetection, to_plane: &Isometry<f64>) {
    assert_eq!(collision.number_of_contacts(), 1);
    assert_eq!(collision.contacting_cells(0), Some(&[0][..]));
    assert_eq!(collision.contacting_cells(1), Some(&[0][..]));
    assert_eq!(collision.contacts_output().num_points(), 2);

    for pt in collision.contacts_output().points() {
        let pt = to_plane * pt;
        assert_relative_eq!(pt.z, 0.0, epsilon = 1.0e-9);
        assert!(pt.x >= 0.25 - 1.0e-9 && pt.y >= 0.25 - 1.0e-9);
        assert!(pt.x + pt.y <= 1.0 + 1.0e-9);
    }
}

#[test]
fn coplanar_triangles_collide() {
    let mut collision = CollisionDetection::new();
    collision.set_mesh(0, coplanar_triangle(0.0, &Isometry::identity()));
    collision.set_mesh(1, coplanar_triangle(0.25, &Isometry::identity()));
    collision.set_transform(0, &Isometry::identity());
    collision.set_transform(1, &Isometry::identity());
    collision.update().unwrap();

    check_coplanar_contacts(&collision, &Isometry::identity());
}

#[test]
fn coplanar_triangles_collide_in_any_frame() {
    let tilt = Isometry::new(Vector::new(0.3, -0.2, 0.1), Vector::new(0.4, -0.7, 0.2));
    let axis = Vector::new(-1.0, 3.0, 2.0).normalize();

    for k in 0..50 {
        let angle = 0.05 + k as f64 * 0.125;
        let pos = Isometry::new(Vector::new(2.0, -1.0, 5.0), axis * angle);

        let mut collision = CollisionDetection::new();
        collision.set_mesh(0, coplanar_triangle(0.0, &tilt));
        collision.set_mesh(1, coplanar_triangle(0.25, &tilt));
        collision.set_transform(0, &pos);
        collision.set_transform(1, &pos);
        collision.update().unwrap();

        check_coplanar_contacts(&collision, &(pos * tilt).inverse());
    }
}

#[test]
fn contacts_are_placed_in_world_space() {
    let mut collision = cubes(Vector::new(0.5, 0.0, 0.0), CollisionMode::HalfContacts);
    collision.set_transform(0, &Isometry::translation(0.0, 0.0, 100.0));
    collision.set_transform(1, &Isometry::translation(0.5, 0.0, 100.0));
    collision.update().unwrap();

    assert!(collision.is_colliding());
    for pt in collision.contacts_output().points() {
        assert!(pt.z >= 100.0 - 1.0e-9 && pt.z <= 101.0 + 1.0e-9);
    }
}
