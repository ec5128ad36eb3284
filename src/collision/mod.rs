//! Collision detection between two placed polygonal meshes.

pub use self::collision_detection::{
    CollisionConfig, CollisionDetection, CollisionInputError, CollisionMode, LinearTransform,
    CONTACT_CELLS_ARRAY,
};
pub use self::contact_colors::{contact_cell_colors, contact_color, hsv_to_rgb, NEUTRAL_COLOR};
pub use self::polygon_intersection::{
    intersect_polygon_with_polygon, segment_plane_intersection, ContactPoints,
    SegmentPlaneIntersection, PLANE_PARALLEL_EPSILON,
};

mod collision_detection;
mod contact_colors;
mod polygon_intersection;
