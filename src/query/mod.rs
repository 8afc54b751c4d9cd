//! Stateless distance and intersection queries between primitive pairs.
//!
//! Every module covers one ordered pair of shapes. Distance modules expose
//! `distance`, intersection modules expose `test` (boolean only) and `find`
//! (full result). Results are plain `Copy` values built fresh per call.
//!
//! All classifications use exact comparisons against zero; tolerance policy is
//! left to the caller.

pub mod dist_line_segment;
pub mod dist_point_aligned_box;
pub mod dist_point_frustum;
pub mod dist_point_line;
pub mod dist_point_segment;
pub mod dist_point_triangle;
pub mod intr_aligned_box_circle;
pub mod intr_aligned_box_sphere;
pub mod intr_halfspace_triangle;
pub mod intr_line_triangle;
pub mod intr_linear_aligned_box;
pub mod intr_linear_sphere;

pub use dist_line_segment::LineSegmentDistance;
pub use dist_point_aligned_box::PointBoxDistance;
pub use dist_point_frustum::PointFrustumDistance;
pub use dist_point_line::PointLineDistance;
pub use dist_point_segment::PointSegmentDistance;
pub use dist_point_triangle::PointTriangleDistance;
pub use intr_aligned_box_circle::BoxCircleContact;
pub use intr_aligned_box_sphere::BoxSphereContact;
pub use intr_halfspace_triangle::HalfspaceTriangleClip;
pub use intr_line_triangle::LineTriangleIntersection;
pub use intr_linear_aligned_box::LinearBoxIntersection;
pub use intr_linear_sphere::LinearSphereIntersection;

/// Relation between two moving objects at the start of a dynamic query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum IntersectionType {
    /// The objects overlap at time zero.
    Overlapping,
    /// The objects never touch.
    #[default]
    None,
    /// The objects first touch at a positive contact time. Also used when they are
    /// exactly touching at time zero.
    Future,
}

impl IntersectionType {
    /// The conventional `-1 / 0 / +1` encoding.
    pub fn code(self) -> i32 {
        match self {
            IntersectionType::Overlapping => -1,
            IntersectionType::None => 0,
            IntersectionType::Future => 1,
        }
    }
}
