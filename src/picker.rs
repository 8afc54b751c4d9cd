use crate::primitives::{Line3, Segment3, Triangle3};
use crate::query::{dist_line_segment, dist_point_line, intr_line_triangle};
use crate::scene::{NodeId, NodeKind, Positions, Scene, Topology, Transform, Visual};
use crate::vector::Vector3;
use rayon::prelude::*;
use tracing::{debug, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tunables of a [`Picker`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PickerConfig {
    /// Number of chunks triangle batches are split into.
    pub num_threads: usize,
    /// Largest model-space distance at which segments and points are picked.
    pub max_distance: f64,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            num_threads: 1,
            max_distance: 0.0,
        }
    }
}

/// One primitive hit by a pick.
///
/// `t` and `bary` are measured in the model space of the leaf. The points are in world
/// space and the distances are measured from the world-space pick origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickRecord {
    pub visual: NodeId,
    pub primitive_type: Topology,
    pub primitive_index: usize,
    /// Vertex indices of the primitive, trailing entries are `None` for segments and points.
    pub vertex_index: [Option<usize>; 3],
    pub t: f64,
    pub bary: [f64; 3],
    pub line_point: Vector3,
    pub primitive_point: Vector3,
    pub distance_to_line_point: f64,
    pub distance_to_primitive_point: f64,
    pub distance_between_line_primitive: f64,
}

/// Finds the primitives of a [`Scene`] met by a line, ray or segment.
#[derive(Clone, Debug)]
pub struct Picker {
    num_threads: usize,
    max_distance: f64,
    origin: Vector3,
    direction: Vector3,
    t_min: f64,
    t_max: f64,
    records: Vec<PickRecord>,
}

impl Default for Picker {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Picker {
    /// A zero thread count is treated as one.
    pub fn new(num_threads: usize) -> Self {
        Self {
            num_threads: num_threads.max(1),
            max_distance: 0.0,
            origin: Vector3::ZERO,
            direction: Vector3::ZERO,
            t_min: 0.0,
            t_max: 0.0,
            records: Vec::new(),
        }
    }

    pub fn from_config(config: &PickerConfig) -> Self {
        let mut picker = Self::new(config.num_threads);
        picker.set_max_distance(config.max_distance);
        picker
    }

    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    /// Negative distances are clamped to zero.
    pub fn set_max_distance(&mut self, max_distance: f64) {
        self.max_distance = max_distance.max(0.0);
    }

    /// Records of the last [`Picker::execute`], in scene traversal order.
    pub fn records(&self) -> &[PickRecord] {
        &self.records
    }

    /// Picks the primitives of `scene` met by `origin + t * direction`, `t` in
    /// `[t_min, t_max]`.
    ///
    /// The interval must describe a line (`-inf`, `+inf`), a ray (`0`, `+inf`) or a
    /// segment (`0`, `t_max > 0`). Any other interval panics. The direction must be unit
    /// length. Previous records are discarded.
    pub fn execute(&mut self, scene: &Scene, origin: Vector3, direction: Vector3, t_min: f64, t_max: f64) {
        let valid = if t_min == f64::NEG_INFINITY {
            t_max == f64::INFINITY
        } else {
            t_min == 0.0 && t_max > 0.0
        };
        assert!(valid, "invalid pick interval [{}, {}]", t_min, t_max);

        self.origin = origin;
        self.direction = direction;
        self.t_min = t_min;
        self.t_max = t_max;
        self.records.clear();
        self.execute_recursive(scene, scene.root());
        debug!(records = self.records.len(), "pick complete");
    }

    fn execute_recursive(&mut self, scene: &Scene, id: NodeId) {
        let node = scene.node(id);
        if let Some(bound) = &node.world_bound {
            if !bound.test_linear(self.origin, self.direction, self.t_min, self.t_max) {
                trace!(node = id.0, "bound missed");
                return;
            }
        }

        match &node.kind {
            NodeKind::Internal { children } => {
                for &child in children {
                    self.execute_recursive(scene, child);
                }
            }
            NodeKind::Leaf(visual) => {
                let before = self.records.len();
                self.pick_visual(id, visual, &node.world_transform);
                debug!(leaf = id.0, hits = self.records.len() - before, "picked leaf");
            }
        }
    }

    fn pick_visual(&mut self, id: NodeId, visual: &Visual, world: &Transform) {
        let Some(positions) = visual.vertex_buffer.positions() else {
            panic!("leaf {:?} is expecting 3D positions", id);
        };

        // The world transform may scale, so the model-space direction is renormalized.
        let model_origin = world.inverse_point(self.origin);
        let mut model_direction = world.inverse_vector(self.direction);
        model_direction.normalize();

        let leaf = LeafPick {
            visual: id,
            positions,
            topology: visual.index_buffer.topology(),
            world,
            line: Line3::new(model_origin, model_direction),
            world_origin: self.origin,
            t_min: self.t_min,
            t_max: self.t_max,
            max_distance: self.max_distance,
        };

        let index_buffer = &visual.index_buffer;
        let first = index_buffer.first_primitive();
        let count = index_buffer.num_active_primitives();
        let topology = index_buffer.topology();

        if topology.is_triangles() {
            self.pick_triangles(&leaf, visual, first, count);
        } else if topology.is_segments() {
            for i in first..first + count {
                if let Some(record) = index_buffer.segment(i).and_then(|v| leaf.segment(i, v)) {
                    self.records.push(record);
                }
            }
        } else {
            for i in first..first + count {
                if let Some(record) = index_buffer.point(i).and_then(|v| leaf.point(i, v)) {
                    self.records.push(record);
                }
            }
        }
    }

    /// Splits the active triangles into `min(count, num_threads)` contiguous chunks, the
    /// last one taking the remainder, and appends the chunk results in chunk order.
    fn pick_triangles(&mut self, leaf: &LeafPick<'_>, visual: &Visual, first: usize, count: usize) {
        if count == 0 {
            return;
        }
        let num_chunks = self.num_threads.min(count);
        let per_chunk = count / num_chunks;
        let index_buffer = &visual.index_buffer;

        let chunks: Vec<Vec<PickRecord>> = (0..num_chunks)
            .into_par_iter()
            .map(|c| {
                let i_min = first + c * per_chunk;
                let i_max = if c + 1 == num_chunks { first + count } else { i_min + per_chunk };
                (i_min..i_max)
                    .filter_map(|i| index_buffer.triangle(i).and_then(|v| leaf.triangle(i, v)))
                    .collect()
            })
            .collect();

        for chunk in chunks {
            self.records.extend(chunk);
        }
    }

    /// The record whose line point is nearest the pick origin.
    pub fn closest_to_zero(&self) -> Option<&PickRecord> {
        let mut closest: Option<&PickRecord> = None;
        for record in &self.records {
            if closest.is_none_or(|c| record.distance_to_line_point < c.distance_to_line_point) {
                closest = Some(record);
            }
        }
        closest
    }

    /// The record with `t >= 0` whose line point is nearest the pick origin.
    pub fn closest_nonnegative(&self) -> Option<&PickRecord> {
        let mut closest: Option<&PickRecord> = None;
        for record in self.records.iter().filter(|r| r.t >= 0.0) {
            if closest.is_none_or(|c| record.distance_to_line_point < c.distance_to_line_point) {
                closest = Some(record);
            }
        }
        closest
    }

    /// Among records with `t <= 0`, the one selected by a strict `current < candidate`
    /// comparison of `distance_to_line_point`.
    ///
    /// The comparison keeps replacing the current choice with records whose distance is
    /// larger, so the result is the farthest such record, the first one on ties.
    pub fn closest_nonpositive(&self) -> Option<&PickRecord> {
        let mut closest: Option<&PickRecord> = None;
        for record in self.records.iter().filter(|r| r.t <= 0.0) {
            if closest.is_none_or(|c| c.distance_to_line_point < record.distance_to_line_point) {
                closest = Some(record);
            }
        }
        closest
    }
}

/// Per-leaf state shared by the primitive tests. Borrowed immutably by the chunk workers.
struct LeafPick<'a> {
    visual: NodeId,
    positions: Positions<'a>,
    topology: Topology,
    world: &'a Transform,
    /// The pick line in model space.
    line: Line3,
    world_origin: Vector3,
    t_min: f64,
    t_max: f64,
    max_distance: f64,
}

impl LeafPick<'_> {
    fn in_range(&self, t: f64) -> bool {
        self.t_min <= t && t <= self.t_max
    }

    fn record(
        &self,
        primitive_index: usize,
        vertex_index: [Option<usize>; 3],
        t: f64,
        bary: [f64; 3],
        model_line_point: Vector3,
        model_primitive_point: Vector3,
    ) -> PickRecord {
        let line_point = self.world.apply_point(model_line_point);
        let primitive_point = self.world.apply_point(model_primitive_point);
        PickRecord {
            visual: self.visual,
            primitive_type: self.topology,
            primitive_index,
            vertex_index,
            t,
            bary,
            line_point,
            primitive_point,
            distance_to_line_point: (line_point - self.world_origin).length(),
            distance_to_primitive_point: (primitive_point - self.world_origin).length(),
            distance_between_line_primitive: (line_point - primitive_point).length(),
        }
    }

    fn triangle(&self, i: usize, v: [usize; 3]) -> Option<PickRecord> {
        let triangle = Triangle3::new(self.positions.get(v[0]), self.positions.get(v[1]), self.positions.get(v[2]));
        let hit = intr_line_triangle::find(&self.line, &triangle);
        if !hit.intersect || !self.in_range(hit.parameter) {
            return None;
        }
        let on_triangle = triangle.point_from_barycentric(hit.triangle_bary);
        Some(self.record(
            i,
            [Some(v[0]), Some(v[1]), Some(v[2])],
            hit.parameter,
            hit.triangle_bary,
            hit.point,
            on_triangle,
        ))
    }

    fn segment(&self, i: usize, v: [usize; 2]) -> Option<PickRecord> {
        let segment = Segment3::new(self.positions.get(v[0]), self.positions.get(v[1]));
        let query = dist_line_segment::distance(&self.line, &segment);
        let t = query.parameter[0];
        if query.distance > self.max_distance || !self.in_range(t) {
            return None;
        }
        let s = query.parameter[1];
        Some(self.record(
            i,
            [Some(v[0]), Some(v[1]), None],
            t,
            [1.0 - s, s, 0.0],
            query.closest[0],
            query.closest[1],
        ))
    }

    fn point(&self, i: usize, v: usize) -> Option<PickRecord> {
        let point = self.positions.get(v);
        let query = dist_point_line::distance(point, &self.line);
        if query.distance > self.max_distance || !self.in_range(query.parameter) {
            return None;
        }
        Some(self.record(
            i,
            [Some(v), None, None],
            query.parameter,
            [1.0, 0.0, 0.0],
            query.closest[1],
            point,
        ))
    }
}
