use crate::bounding_volume::Obb;
use crate::math::{HomogeneousMatrix, Real, Vector, DEFAULT_EPSILON};

/// A candidate axis that proved two oriented boxes disjoint.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SeparatingAxis {
    /// The line joining the centers of both boxes.
    CenterLine,
    /// The `i`-th axis of the first box.
    FaceA(u8),
    /// The `i`-th axis of the second box.
    FaceB(u8),
    /// The cross product of the `i`-th axis of the first box with the `j`-th axis of the second box.
    Edge(u8, u8),
}

/// Is the unit-length (or zero) direction `dir` separating `a` from `b` by more than `eps`?
///
/// A zero `dir` never separates anything.
#[inline]
pub fn obb_obb_separated_along(a: &Obb, b: &Obb, dir: &Vector<Real>, eps: Real) -> bool {
    let (amin, amax) = a.project_on(dir);
    let (bmin, bmax) = b.project_on(dir);
    amax + eps < bmin || bmax + eps < amin
}

/// Finds an axis separating the oriented boxes `a` and `b`, if any.
///
/// If `b_to_a` is given, `b` is expressed in its own frame and `b_to_a` maps it into the frame
/// of `a`. The candidate axes are tried in order: the line joining both centers, the three axes
/// of `a`, the three axes of `b`, and the nine cross products of an axis of `a` with an axis of
/// `b`. The first axis along which the projected intervals are further apart than `eps` (an
/// absolute distance) is returned. Cross products of (nearly) parallel axes are skipped since
/// they carry no direction.
///
/// Returns `None` if the boxes overlap.
pub fn obb_obb_find_separating_axis(
    a: &Obb,
    b: &Obb,
    b_to_a: Option<&HomogeneousMatrix>,
    eps: Real,
) -> Option<SeparatingAxis> {
    let b = match b_to_a {
        Some(m) => b.transform_by(m),
        None => *b,
    };

    let center_line = b.center() - a.center();
    if let Some(dir) = center_line.try_normalize(DEFAULT_EPSILON) {
        if obb_obb_separated_along(a, &b, &dir, eps) {
            return Some(SeparatingAxis::CenterLine);
        }
    }

    let dirs_a = a.unit_axes();
    let dirs_b = b.unit_axes();

    for (i, dir) in dirs_a.iter().enumerate() {
        if obb_obb_separated_along(a, &b, dir, eps) {
            return Some(SeparatingAxis::FaceA(i as u8));
        }
    }

    for (j, dir) in dirs_b.iter().enumerate() {
        if obb_obb_separated_along(a, &b, dir, eps) {
            return Some(SeparatingAxis::FaceB(j as u8));
        }
    }

    for (i, dir_a) in dirs_a.iter().enumerate() {
        for (j, dir_b) in dirs_b.iter().enumerate() {
            if let Some(dir) = dir_a.cross(dir_b).try_normalize(DEFAULT_EPSILON) {
                if obb_obb_separated_along(a, &b, &dir, eps) {
                    return Some(SeparatingAxis::Edge(i as u8, j as u8));
                }
            }
        }
    }

    None
}

/// Are the oriented boxes `a` and `b` disjoint?
///
/// See [`obb_obb_find_separating_axis`] for the meaning of the arguments.
#[inline]
pub fn obb_obb_disjoint(
    a: &Obb,
    b: &Obb,
    b_to_a: Option<&HomogeneousMatrix>,
    eps: Real,
) -> bool {
    obb_obb_find_separating_axis(a, b, b_to_a, eps).is_some()
}
