//! # querythree
//!
//! `querythree` is a Rust library of closed-form geometric queries in two and three
//! dimensions, together with a banded Cholesky solver and a ray picker over scene
//! hierarchies.
//!
//! ## Features
//!
//! - **Distance queries**: Closest points between points, lines, segments, triangles, boxes and frusta.
//! - **Intersection queries**: Static and dynamic tests for lines, rays, segments, halfspaces, boxes, circles and spheres.
//! - **Banded solver**: Cholesky factorization, linear solves and inversion of symmetric banded matrices.
//! - **Quadrics**: Conversion between hyperellipsoids and their quadratic equations.
//! - **Picking**: Bounding-volume culled picking of triangles, segments and points, with triangle batches split across `rayon` workers.
//!
//! ## Main Interface
//!
//! Queries are free functions grouped per shape pair in [`query`], e.g.
//! [`query::dist_point_triangle::distance`]. Picking goes through [`Picker::execute`] on a [`Scene`].

pub mod banded;
pub mod error;
pub mod matrix;
pub mod picker;
pub mod primitives;
pub mod query;
pub mod scene;
pub mod vector;

pub use banded::{BandedMatrix, StorageOrder};
pub use error::Error;
pub use matrix::{Matrix, Matrix2, Matrix3, Matrix4, SymmetricEigen};
pub use picker::{PickRecord, Picker, PickerConfig};
pub use primitives::{
    AlignedBox, AlignedBox2, AlignedBox3, Circle2, Ellipse2, Ellipsoid3, Frustum3, Halfspace, Halfspace3,
    Hyperellipsoid, Hypersphere, Line, Line3, Ray, Ray3, Segment, Segment3, Sphere3, Triangle, Triangle3,
};
pub use query::IntersectionType;
pub use scene::{Bound, IndexBuffer, NodeId, NodeKind, Scene, SceneNode, Topology, Transform, VertexBuffer, Visual};
pub use vector::{Vector, Vector2, Vector3, Vector4};
