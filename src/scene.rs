use crate::error::Error;
use crate::matrix::Matrix4;
use crate::primitives::{AlignedBox3, Sphere3};
use crate::query::{intr_linear_aligned_box, intr_linear_sphere};
use crate::vector::Vector3;
use tracing::{debug, warn};

/// Handle of a node in a [`Scene`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// World-space bounding volume of a scene node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Bound {
    Sphere(Sphere3),
    Box(AlignedBox3),
}

impl Bound {
    /// Whether `origin + t * direction` meets the volume for some `t` in `[t_min, t_max]`.
    pub fn test_linear(&self, origin: Vector3, direction: Vector3, t_min: f64, t_max: f64) -> bool {
        match self {
            Bound::Sphere(sphere) => intr_linear_sphere::test_interval(origin, direction, t_min, t_max, sphere),
            Bound::Box(aligned_box) => {
                intr_linear_aligned_box::test_interval(origin, direction, t_min, t_max, aligned_box)
            }
        }
    }

    /// The smallest axis-aligned box containing the volume.
    pub fn to_box(&self) -> AlignedBox3 {
        match self {
            Bound::Sphere(sphere) => AlignedBox3::from_center_extent(sphere.center, Vector3::splat(sphere.radius)),
            Bound::Box(aligned_box) => *aligned_box,
        }
    }

    /// A sphere containing the volume, the circumscribed sphere for boxes.
    pub fn to_sphere(&self) -> Sphere3 {
        match self {
            Bound::Sphere(sphere) => *sphere,
            Bound::Box(aligned_box) => Sphere3::new(aligned_box.center(), aligned_box.extent().length()),
        }
    }

    /// Sphere around `points`, centered on their bounding box. `None` when empty.
    pub fn sphere_from_points<I>(points: I) -> Option<Bound>
    where
        I: IntoIterator<Item = Vector3>,
        I::IntoIter: Clone,
    {
        let points = points.into_iter();
        let center = AlignedBox3::from_points(points.clone())?.center();
        let radius = points.map(|p| (p - center).length()).fold(0.0, f64::max);
        Some(Bound::Sphere(Sphere3::new(center, radius)))
    }

    /// The smallest sphere containing the spheres of both volumes.
    pub fn merge(&self, other: &Bound) -> Bound {
        let s0 = self.to_sphere();
        let s1 = other.to_sphere();
        let center_diff = s1.center - s0.center;
        let sqr_length = center_diff.squared_length();
        let radius_diff = s1.radius - s0.radius;
        if radius_diff * radius_diff >= sqr_length {
            return Bound::Sphere(if radius_diff >= 0.0 { s1 } else { s0 });
        }
        let length = sqr_length.sqrt();
        let center = s0.center + center_diff * ((length + radius_diff) / (2.0 * length));
        Bound::Sphere(Sphere3::new(center, 0.5 * (length + s0.radius + s1.radius)))
    }
}

/// Affine transform together with its inverse, acting on column vectors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    matrix: Matrix4,
    inverse: Matrix4,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        matrix: Matrix4::IDENTITY,
        inverse: Matrix4::IDENTITY,
    };

    /// Fails when `matrix` is singular.
    pub fn from_matrix(matrix: Matrix4) -> Result<Self, Error> {
        let inverse = matrix.inverse().ok_or(Error::SingularTransform)?;
        Ok(Self { matrix, inverse })
    }

    pub fn from_translation(t: Vector3) -> Self {
        Self {
            matrix: Matrix4::from_translation(t),
            inverse: Matrix4::from_translation(-t),
        }
    }

    pub fn matrix(&self) -> &Matrix4 {
        &self.matrix
    }

    pub fn inverse(&self) -> &Matrix4 {
        &self.inverse
    }

    /// `self` applied after `local`.
    pub fn compose(&self, local: &Transform) -> Transform {
        Transform {
            matrix: self.matrix * local.matrix,
            inverse: local.inverse * self.inverse,
        }
    }

    pub fn apply_point(&self, p: Vector3) -> Vector3 {
        self.matrix.transform_point(p)
    }

    pub fn apply_vector(&self, v: Vector3) -> Vector3 {
        self.matrix.transform_vector(v)
    }

    pub fn inverse_point(&self, p: Vector3) -> Vector3 {
        self.inverse.transform_point(p)
    }

    pub fn inverse_vector(&self, v: Vector3) -> Vector3 {
        self.inverse.transform_vector(v)
    }
}

/// Vertex data stored as interleaved `f64` attributes.
///
/// `stride` counts `f64` values per vertex. The position channel, when present, is
/// three consecutive values starting at `position_offset`.
#[derive(Clone, Debug, PartialEq)]
pub struct VertexBuffer {
    data: Vec<f64>,
    stride: usize,
    position_offset: Option<usize>,
}

impl VertexBuffer {
    /// Vertex data without a position channel.
    pub fn new(data: Vec<f64>, stride: usize) -> Self {
        Self {
            data,
            stride,
            position_offset: None,
        }
    }

    pub fn with_positions(data: Vec<f64>, stride: usize, position_offset: usize) -> Self {
        assert!(position_offset + 3 <= stride, "position channel does not fit in the vertex stride");
        Self {
            data,
            stride,
            position_offset: Some(position_offset),
        }
    }

    /// Tightly packed positions.
    pub fn from_positions(positions: &[Vector3]) -> Self {
        let data = positions.iter().flat_map(|p| p.0).collect();
        Self::with_positions(data, 3, 0)
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn num_vertices(&self) -> usize {
        if self.stride == 0 { 0 } else { self.data.len() / self.stride }
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Read access to the positions, `None` when the buffer has no position channel.
    pub fn positions(&self) -> Option<Positions<'_>> {
        self.position_offset.map(|offset| Positions {
            data: &self.data,
            stride: self.stride,
            offset,
        })
    }
}

/// Borrowed view of the position channel of a [`VertexBuffer`].
#[derive(Clone, Copy, Debug)]
pub struct Positions<'a> {
    data: &'a [f64],
    stride: usize,
    offset: usize,
}

impl Positions<'_> {
    pub fn len(&self) -> usize {
        self.data.len() / self.stride
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Position of vertex `i`. Panics when `i` is out of range.
    pub fn get(&self, i: usize) -> Vector3 {
        let base = i * self.stride + self.offset;
        assert!(
            base + 2 < self.data.len(),
            "vertex {} is outside a vertex buffer of {} values",
            i,
            self.data.len()
        );
        Vector3::xyz(self.data[base], self.data[base + 1], self.data[base + 2])
    }

    pub fn iter(&self) -> impl Iterator<Item = Vector3> + Clone + '_ {
        (0..self.len()).map(move |i| self.get(i))
    }
}

/// How the vertices of a leaf are grouped into primitives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Topology {
    Polypoint,
    /// Segments `(2i, 2i + 1)`.
    PolysegmentDisjoint,
    /// Segments `(i, i + 1)`.
    PolysegmentContiguous,
    /// Triangles `(3i, 3i + 1, 3i + 2)`.
    TriMesh,
    /// Triangles `(i, i + 1, i + 2)` with alternating winding.
    TriStrip,
}

impl Topology {
    pub fn is_points(self) -> bool {
        matches!(self, Topology::Polypoint)
    }

    pub fn is_segments(self) -> bool {
        matches!(self, Topology::PolysegmentDisjoint | Topology::PolysegmentContiguous)
    }

    pub fn is_triangles(self) -> bool {
        matches!(self, Topology::TriMesh | Topology::TriStrip)
    }

    /// Number of primitives spanned by `num_elements` vertices or indices.
    pub fn num_primitives(self, num_elements: usize) -> usize {
        match self {
            Topology::Polypoint => num_elements,
            Topology::PolysegmentDisjoint => num_elements / 2,
            Topology::PolysegmentContiguous => num_elements.saturating_sub(1),
            Topology::TriMesh => num_elements / 3,
            Topology::TriStrip => num_elements.saturating_sub(2),
        }
    }
}

/// Primitive topology of a leaf, optionally indexed, with an active primitive range.
#[derive(Clone, Debug, PartialEq)]
pub struct IndexBuffer {
    topology: Topology,
    indices: Option<Vec<usize>>,
    num_primitives: usize,
    first_primitive: usize,
    num_active_primitives: usize,
}

impl IndexBuffer {
    /// Non-indexed primitives over consecutive vertices.
    pub fn new(topology: Topology, num_primitives: usize) -> Self {
        Self {
            topology,
            indices: None,
            num_primitives,
            first_primitive: 0,
            num_active_primitives: num_primitives,
        }
    }

    pub fn indexed(topology: Topology, indices: Vec<usize>) -> Self {
        let num_primitives = topology.num_primitives(indices.len());
        Self {
            topology,
            indices: Some(indices),
            num_primitives,
            first_primitive: 0,
            num_active_primitives: num_primitives,
        }
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn is_indexed(&self) -> bool {
        self.indices.is_some()
    }

    pub fn num_primitives(&self) -> usize {
        self.num_primitives
    }

    pub fn first_primitive(&self) -> usize {
        self.first_primitive
    }

    pub fn num_active_primitives(&self) -> usize {
        self.num_active_primitives
    }

    /// Restricts picking to `[first, first + count)`, clamped to the available primitives.
    pub fn set_active_range(&mut self, first: usize, count: usize) {
        self.first_primitive = first.min(self.num_primitives);
        self.num_active_primitives = count.min(self.num_primitives - self.first_primitive);
    }

    #[inline]
    fn vertex(&self, element: usize) -> Option<usize> {
        match &self.indices {
            Some(indices) => indices.get(element).copied(),
            None => Some(element),
        }
    }

    /// Vertex indices of triangle `i`, `None` for non-triangle topologies or out of range.
    pub fn triangle(&self, i: usize) -> Option<[usize; 3]> {
        if i >= self.num_primitives {
            return None;
        }
        let elements = match self.topology {
            Topology::TriMesh => [3 * i, 3 * i + 1, 3 * i + 2],
            Topology::TriStrip => {
                let offset = i & 1;
                [i + offset, i + 1 - offset, i + 2]
            }
            _ => return None,
        };
        Some([
            self.vertex(elements[0])?,
            self.vertex(elements[1])?,
            self.vertex(elements[2])?,
        ])
    }

    /// Vertex indices of segment `i`, `None` for non-segment topologies or out of range.
    pub fn segment(&self, i: usize) -> Option<[usize; 2]> {
        if i >= self.num_primitives {
            return None;
        }
        let elements = match self.topology {
            Topology::PolysegmentDisjoint => [2 * i, 2 * i + 1],
            Topology::PolysegmentContiguous => [i, i + 1],
            _ => return None,
        };
        Some([self.vertex(elements[0])?, self.vertex(elements[1])?])
    }

    /// Vertex index of point `i`, `None` for non-point topologies or out of range.
    pub fn point(&self, i: usize) -> Option<usize> {
        if i >= self.num_primitives || self.topology != Topology::Polypoint {
            return None;
        }
        self.vertex(i)
    }
}

/// A leaf batch of primitives.
#[derive(Clone, Debug, PartialEq)]
pub struct Visual {
    pub vertex_buffer: VertexBuffer,
    pub index_buffer: IndexBuffer,
}

impl Visual {
    pub fn new(vertex_buffer: VertexBuffer, index_buffer: IndexBuffer) -> Self {
        Self {
            vertex_buffer,
            index_buffer,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Internal { children: Vec<NodeId> },
    Leaf(Visual),
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneNode {
    pub parent: Option<NodeId>,
    pub local_transform: Transform,
    pub world_transform: Transform,
    /// `None` means the node has no bound and is never culled.
    pub world_bound: Option<Bound>,
    pub kind: NodeKind,
}

/// Scene hierarchy stored as an arena. Node 0 is the root, an internal node.
///
/// Children are always created after their parent, so every child id is larger than
/// its parent id.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    nodes: Vec<SceneNode>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            nodes: vec![SceneNode {
                parent: None,
                local_transform: Transform::IDENTITY,
                world_transform: Transform::IDENTITY,
                world_bound: None,
                kind: NodeKind::Internal { children: Vec::new() },
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &SceneNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut SceneNode {
        &mut self.nodes[id.0]
    }

    /// Adds an internal node under `parent`. Panics when `parent` is a leaf.
    pub fn add_internal(&mut self, parent: NodeId, local_transform: Transform) -> NodeId {
        self.attach(parent, local_transform, NodeKind::Internal { children: Vec::new() })
    }

    /// Adds a leaf under `parent`. Panics when `parent` is a leaf.
    pub fn add_leaf(&mut self, parent: NodeId, local_transform: Transform, visual: Visual) -> NodeId {
        self.attach(parent, local_transform, NodeKind::Leaf(visual))
    }

    fn attach(&mut self, parent: NodeId, local_transform: Transform, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        let world_transform = match &mut self.nodes[parent.0] {
            SceneNode {
                kind: NodeKind::Internal { children },
                world_transform,
                ..
            } => {
                children.push(id);
                world_transform.compose(&local_transform)
            }
            _ => panic!("parent {:?} is not an internal node", parent),
        };
        self.nodes.push(SceneNode {
            parent: Some(parent),
            local_transform,
            world_transform,
            world_bound: None,
            kind,
        });
        id
    }

    pub fn set_world_bound(&mut self, id: NodeId, bound: Bound) {
        self.nodes[id.0].world_bound = Some(bound);
    }

    /// Recomputes world transforms top-down from the local transforms.
    pub fn update_world_transforms(&mut self) {
        for i in 1..self.nodes.len() {
            let Some(parent) = self.nodes[i].parent else {
                continue;
            };
            let parent_world = self.nodes[parent.0].world_transform;
            self.nodes[i].world_transform = parent_world.compose(&self.nodes[i].local_transform);
        }
    }

    /// Recomputes world bounds bottom-up.
    ///
    /// A leaf is bounded by a sphere around its transformed vertex positions. An internal
    /// node is bounded by the sphere enclosing its children, and left unbounded when any
    /// child is. Bounds only enclose vertices; picking with a positive max distance may
    /// miss segments and points that lie outside them.
    pub fn update_world_bounds(&mut self) {
        for i in (0..self.nodes.len()).rev() {
            let bound = match &self.nodes[i].kind {
                NodeKind::Leaf(visual) => match visual.vertex_buffer.positions() {
                    Some(positions) => {
                        let world = &self.nodes[i].world_transform;
                        Bound::sphere_from_points(positions.iter().map(|p| world.apply_point(p)))
                    }
                    None => {
                        warn!(node = i, "leaf has no position channel, leaving it unbounded");
                        None
                    }
                },
                NodeKind::Internal { children } => {
                    let mut merged: Option<Bound> = None;
                    let mut bounded = true;
                    for child in children {
                        match self.nodes[child.0].world_bound {
                            Some(b) => merged = Some(merged.map_or(b, |m| m.merge(&b))),
                            None => bounded = false,
                        }
                    }
                    if bounded { merged } else { None }
                }
            };
            self.nodes[i].world_bound = bound;
        }
        debug!(nodes = self.nodes.len(), "updated world bounds");
    }

    /// Transforms first, then bounds.
    pub fn update(&mut self) {
        self.update_world_transforms();
        self.update_world_bounds();
    }
}
