use crate::bounding_volume::Obb;
use crate::math::{Point, Real};

/// Can the segment `[p0, p1]` intersect the oriented box `obb`?
///
/// Only the three axes of the box are tested, so this is a conservative test: it may report
/// an intersection for a segment passing near a corner of the box. The tolerance `eps` is an
/// absolute distance; it is scaled by the length of each axis since the projections are taken
/// on the unnormalized axes.
pub fn obb_segment_may_intersect(obb: &Obb, p0: &Point<Real>, p1: &Point<Real>, eps: Real) -> bool {
    for i in 0..3 {
        let (box_min, box_max) = obb.project_on_own_axis(i);
        let eps = eps * (box_max - box_min).sqrt();

        let mut seg_min = p0.coords.dot(&obb.axes[i]);
        let mut seg_max = p1.coords.dot(&obb.axes[i]);
        if seg_min > seg_max {
            core::mem::swap(&mut seg_min, &mut seg_max);
        }

        if box_max + eps < seg_min || seg_max + eps < box_min {
            return false;
        }
    }

    true
}
