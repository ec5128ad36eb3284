use crate::bounding_volume::Obb;
use crate::math::{Matrix, Point, Real, Vector, DIM};

/// Extracts the eigenvectors of a symmetric 3x3 matrix, sorted by decreasing eigenvalue.
///
/// Each eigenvector is oriented so that most of its components are positive. This
/// keeps the result stable when the eigen-decomposition returns `v` on one run and
/// `-v` on another. If the decomposition fails (e.g. the matrix contains NaNs), the
/// canonical basis is returned with zero eigenvalues.
///
/// Returns the unit eigenvectors and their eigenvalues, in matching order.
pub fn principal_axes(cov: &Matrix<Real>) -> ([Vector<Real>; DIM], Vector<Real>) {
    if cov.iter().any(|e| !e.is_finite()) {
        return ([Vector::x(), Vector::y(), Vector::z()], Vector::zeros());
    }

    let eigen = cov.symmetric_eigen();
    let mut order = [0, 1, 2];
    order.sort_by(|a, b| {
        eigen.eigenvalues[*b]
            .partial_cmp(&eigen.eigenvalues[*a])
            .unwrap_or(core::cmp::Ordering::Equal)
    });

    let mut axes = [Vector::zeros(); DIM];
    let mut values = Vector::zeros();

    for (k, i) in order.iter().enumerate() {
        let mut axis: Vector<Real> = eigen.eigenvectors.column(*i).into_owned();
        let positives = axis.iter().filter(|e| **e >= 0.0).count();
        if positives < 2 {
            axis = -axis;
        }

        axes[k] = axis
            .try_normalize(Real::EPSILON)
            .unwrap_or_else(|| Vector::ith(k, 1.0));
        values[k] = eigen.eigenvalues[*i];
    }

    (axes, values)
}

/// Computes an oriented bounding box for the given set of points.
///
/// The box axes are the principal directions of the point covariance, ordered from the
/// direction of largest variance to the direction of smallest variance, and scaled to
/// the extent of the points along them.
///
/// The returned OBB is not guaranteed to be the smallest enclosing OBB.
/// Though it should be a pretty good on for most purposes.
///
/// Returns the box together with the eigenvalues associated to its axes.
pub fn obb(pts: &[Point<Real>]) -> (Obb, Vector<Real>) {
    let (center, cov) = crate::utils::center_cov(pts);
    let (axes, sizes) = principal_axes(&cov);
    (Obb::from_directions(&center, &axes, pts.iter()), sizes)
}
