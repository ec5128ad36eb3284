//! Various unsorted geometrical and logical operators.

pub use self::ccw_face_normal::{ccw_face_normal, polygon_normal};
pub use self::center::center;
pub use self::cov::{center_cov, cov, TriangleMoments};
pub use self::modified_time::ModifiedTime;
pub use self::obb::{obb, principal_axes};
pub use self::point_in_poly2d::{point_in_poly2d, point_in_polygon};
pub use self::point_in_triangle::{is_point_in_triangle, point_segment_distance_squared};
pub use self::segments_intersection::{
    closest_points_segment_segment_params, segments_intersection3d,
};

mod ccw_face_normal;
mod center;
mod cov;
mod modified_time;
mod obb;
mod point_in_poly2d;
mod point_in_triangle;
mod segments_intersection;
