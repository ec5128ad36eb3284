use crate::common;
use obbtree3d::bounding_volume::Obb;
use obbtree3d::math::{Isometry, Real, Vector};
use obbtree3d::query::sat;
use oorandom::Rand64;

fn random_obb(rng: &mut Rand64) -> Obb {
    let rot = Isometry::rotation(common::random_vector(rng, 6.0));
    let lengths = Vector::new(
        0.1 + rng.rand_float() * 2.0,
        0.1 + rng.rand_float() * 2.0,
        0.1 + rng.rand_float() * 2.0,
    );
    let axes = [
        rot * (Vector::x() * lengths.x),
        rot * (Vector::y() * lengths.y),
        rot * (Vector::z() * lengths.z),
    ];
    Obb::new(common::random_point(rng, 4.0), axes)
}

#[test]
fn disjointness_does_not_depend_on_the_reference_frame() {
    let mut rng = Rand64::new(1234);
    let mut num_disjoint = 0;

    for _ in 0..2000 {
        let a = random_obb(&mut rng);
        let b = random_obb(&mut rng);
        let pos = Isometry::new(
            common::random_vector(&mut rng, 3.0),
            common::random_vector(&mut rng, 6.0),
        );
        let b_to_a = pos.to_homogeneous();
        let a_to_b = pos.inverse().to_homogeneous();
        let eps: Real = 1.0e-3;

        let ab = sat::obb_obb_disjoint(&a, &b, Some(&b_to_a), eps);
        let ba = sat::obb_obb_disjoint(&b, &a, Some(&a_to_b), eps);
        assert_eq!(ab, ba);

        if ab {
            num_disjoint += 1;
        }
    }

    // Make sure both outcomes were exercised.
    assert!(num_disjoint > 0 && num_disjoint < 2000);
}

#[test]
fn boxes_sharing_a_point_are_never_disjoint() {
    let mut rng = Rand64::new(99);

    for _ in 0..500 {
        let a = random_obb(&mut rng);
        let mut b = random_obb(&mut rng);
        // Move `b` so its center coincides with a corner of `a`.
        b.corner += a.corner - b.center();

        assert!(!sat::obb_obb_disjoint(&a, &b, None, 0.0));
        assert!(!sat::obb_obb_disjoint(&b, &a, None, 0.0));
    }
}

#[test]
fn larger_tolerances_are_more_conservative() {
    let mut rng = Rand64::new(5);

    for _ in 0..500 {
        let a = random_obb(&mut rng);
        let b = random_obb(&mut rng);

        if !sat::obb_obb_disjoint(&a, &b, None, 0.01) {
            assert!(!sat::obb_obb_disjoint(&a, &b, None, 0.5));
        }
    }
}
