use crate::math::{Matrix, Point, Real, Vector};
use num::Zero;

/// Computes the covariance matrix of a set of points.
pub fn cov(pts: &[Point<Real>]) -> Matrix<Real> {
    center_cov(pts).1
}

/// Computes the center and the covariance matrix of a set of points.
///
/// Returns the origin and a zero matrix if `pts` is empty.
pub fn center_cov(pts: &[Point<Real>]) -> (Point<Real>, Matrix<Real>) {
    let center = crate::utils::center(pts);
    let mut cov: Matrix<Real> = na::zero();

    if pts.is_empty() {
        return (center, cov);
    }

    let normalizer: Real = 1.0 / (pts.len() as Real);

    for p in pts.iter() {
        let cp = *p - center;
        // NOTE: this is more numerically stable than using cov.syger.
        cov += cp * (cp * normalizer).transpose();
    }

    (center, cov)
}

/// Accumulator of the area-weighted first and second moments of a set of triangles.
///
/// Each triangle contributes with a "mass" equal to its area, so the resulting
/// covariance describes the surface itself rather than the way it is sampled by
/// its vertices.
#[derive(Copy, Clone, Debug)]
pub struct TriangleMoments {
    total_mass: Real,
    weighted_centroid: Vector<Real>,
    second_moment: Matrix<Real>,
}

impl Default for TriangleMoments {
    fn default() -> Self {
        Self::new()
    }
}

impl TriangleMoments {
    /// An accumulator with no triangles.
    pub fn new() -> Self {
        Self {
            total_mass: Real::zero(),
            weighted_centroid: Vector::zero(),
            second_moment: Matrix::zero(),
        }
    }

    /// Adds the contribution of the triangle `(p, q, r)`.
    pub fn push(&mut self, p: &Point<Real>, q: &Point<Real>, r: &Point<Real>) {
        let dp0 = q - p;
        let dp1 = r - p;
        let centroid = (p.coords + q.coords + r.coords) / 3.0;
        let mass = 0.5 * dp0.cross(&dp1).norm();

        self.total_mass += mass;
        self.weighted_centroid += centroid * mass;

        // Second moment of a triangle about the origin, expressed with its
        // vertices and centroid.
        let m = centroid * centroid.transpose() * 9.0
            + p.coords * p.coords.transpose()
            + q.coords * q.coords.transpose()
            + r.coords * r.coords.transpose();
        self.second_moment += m * (mass / 12.0);
    }

    /// The sum of the areas of all the triangles pushed so far.
    pub fn total_mass(&self) -> Real {
        self.total_mass
    }

    /// The area-weighted center and covariance matrix of the accumulated triangles.
    ///
    /// Returns `None` if the accumulated area is zero (or too small to divide by).
    pub fn center_cov(&self) -> Option<(Point<Real>, Matrix<Real>)> {
        if self.total_mass <= Real::EPSILON * Real::EPSILON {
            return None;
        }

        let mean = self.weighted_centroid / self.total_mass;
        let cov = self.second_moment / self.total_mass - mean * mean.transpose();
        Some((Point::from(mean), cov))
    }
}
