use approx::assert_relative_eq;
use querythree::{
    Bound, IndexBuffer, Matrix4, Picker, Scene, Sphere3, Topology, Transform, Vector3, VertexBuffer, Visual,
};

/// A stack of `count` parallel triangles, one every 0.01 along z starting at z = 1.
fn triangle_stack(count: usize) -> Visual {
    let mut positions = Vec::with_capacity(3 * count);
    for i in 0..count {
        let z = 1.0 + i as f64 * 0.01;
        positions.push(Vector3::xyz(-1.0, -1.0, z));
        positions.push(Vector3::xyz(2.0, -1.0, z));
        positions.push(Vector3::xyz(-1.0, 2.0, z));
    }
    Visual::new(VertexBuffer::from_positions(&positions), IndexBuffer::new(Topology::TriMesh, count))
}

fn points_on_axis(z: &[f64]) -> Visual {
    let positions: Vec<Vector3> = z.iter().map(|&z| Vector3::xyz(0.0, 0.0, z)).collect();
    Visual::new(VertexBuffer::from_positions(&positions), IndexBuffer::new(Topology::Polypoint, z.len()))
}

fn single_leaf_scene(visual: Visual) -> Scene {
    let mut scene = Scene::new();
    scene.add_leaf(scene.root(), Transform::IDENTITY, visual);
    scene.update();
    scene
}

#[test]
fn test_thread_count_does_not_change_records() {
    let mut scene = Scene::new();
    let group = scene.add_internal(scene.root(), Transform::IDENTITY);
    scene.add_leaf(group, Transform::IDENTITY, triangle_stack(601));
    scene.add_leaf(
        scene.root(),
        Transform::from_translation(Vector3::xyz(0.0, 0.0, 10.0)),
        triangle_stack(37),
    );
    scene.update();

    let origin = Vector3::xyz(0.1, 0.2, 0.0);
    let direction = Vector3::unit(2);
    let mut single = Picker::new(1);
    single.execute(&scene, origin, direction, 0.0, f64::INFINITY);
    let mut parallel = Picker::new(8);
    parallel.execute(&scene, origin, direction, 0.0, f64::INFINITY);

    assert_eq!(single.records().len(), 638);
    assert_eq!(single.records(), parallel.records());

    // Records follow primitive order within each leaf.
    let first_leaf: Vec<usize> = parallel.records()[..601].iter().map(|r| r.primitive_index).collect();
    assert_eq!(first_leaf, (0..601).collect::<Vec<_>>());

    // Repeating the pick gives the same answer.
    let previous = parallel.records().to_vec();
    parallel.execute(&scene, origin, direction, 0.0, f64::INFINITY);
    assert_eq!(parallel.records(), previous.as_slice());
}

#[test]
fn test_more_threads_than_triangles() {
    let scene = single_leaf_scene(triangle_stack(3));
    let mut picker = Picker::new(16);
    picker.execute(&scene, Vector3::ZERO, Vector3::unit(2), 0.0, f64::INFINITY);
    assert_eq!(picker.records().len(), 3);
}

#[test]
fn test_active_range_limits_triangles() {
    let mut visual = triangle_stack(10);
    visual.index_buffer.set_active_range(4, 3);
    let scene = single_leaf_scene(visual);
    let mut picker = Picker::new(2);
    picker.execute(&scene, Vector3::ZERO, Vector3::unit(2), 0.0, f64::INFINITY);
    let indices: Vec<usize> = picker.records().iter().map(|r| r.primitive_index).collect();
    assert_eq!(indices, vec![4, 5, 6]);
}

#[test]
fn test_records_in_world_space() {
    let positions = [
        Vector3::xyz(-1.0, -1.0, 1.0),
        Vector3::xyz(1.0, -1.0, 1.0),
        Vector3::xyz(-1.0, 1.0, 1.0),
    ];
    let visual = Visual::new(VertexBuffer::from_positions(&positions), IndexBuffer::new(Topology::TriMesh, 1));
    let scale = Transform::from_matrix(Matrix4::from_scale(Vector3::splat(2.0))).expect("invertible");
    let local = Transform::from_translation(Vector3::xyz(10.0, 0.0, 0.0)).compose(&scale);

    let mut scene = Scene::new();
    let leaf = scene.add_leaf(scene.root(), local, visual);
    scene.update();

    let mut picker = Picker::new(1);
    picker.execute(&scene, Vector3::xyz(9.5, -0.5, 0.0), Vector3::unit(2), 0.0, f64::INFINITY);
    assert_eq!(picker.records().len(), 1);
    let record = picker.records()[0];
    assert_eq!(record.visual, leaf);
    assert_eq!(record.primitive_type, Topology::TriMesh);
    assert_eq!(record.vertex_index, [Some(0), Some(1), Some(2)]);
    // t is measured along the normalized model-space direction.
    assert_relative_eq!(record.t, 1.0, epsilon = 1e-12);
    assert_relative_eq!(record.line_point[0], 9.5, epsilon = 1e-12);
    assert_relative_eq!(record.line_point[1], -0.5, epsilon = 1e-12);
    assert_relative_eq!(record.line_point[2], 2.0, epsilon = 1e-12);
    assert_relative_eq!(record.distance_to_line_point, 2.0, epsilon = 1e-12);
    assert_relative_eq!(record.distance_between_line_primitive, 0.0, epsilon = 1e-12);
}

#[test]
fn test_segments_honour_max_distance() {
    let positions = [Vector3::xyz(0.5, -1.0, 3.0), Vector3::xyz(0.5, 1.0, 3.0)];
    let visual = Visual::new(
        VertexBuffer::from_positions(&positions),
        IndexBuffer::indexed(Topology::PolysegmentContiguous, vec![0, 1]),
    );
    let scene = single_leaf_scene(visual);

    let mut picker = Picker::new(1);
    picker.set_max_distance(0.4);
    picker.execute(&scene, Vector3::ZERO, Vector3::unit(2), f64::NEG_INFINITY, f64::INFINITY);
    assert!(picker.records().is_empty());

    picker.set_max_distance(0.6);
    picker.execute(&scene, Vector3::ZERO, Vector3::unit(2), f64::NEG_INFINITY, f64::INFINITY);
    assert_eq!(picker.records().len(), 1);
    let record = picker.records()[0];
    assert_eq!(record.vertex_index, [Some(0), Some(1), None]);
    assert_relative_eq!(record.t, 3.0, epsilon = 1e-12);
    assert_relative_eq!(record.bary[0], 0.5, epsilon = 1e-12);
    assert_relative_eq!(record.bary[1], 0.5, epsilon = 1e-12);
    assert_eq!(record.bary[2], 0.0);
    assert_relative_eq!(record.distance_between_line_primitive, 0.5, epsilon = 1e-12);
}

#[test]
fn test_points_honour_max_distance_and_interval() {
    let visual = Visual::new(
        VertexBuffer::from_positions(&[Vector3::xyz(0.3, 0.0, 2.0), Vector3::xyz(0.0, 0.0, -2.0)]),
        IndexBuffer::new(Topology::Polypoint, 2),
    );
    let scene = single_leaf_scene(visual);

    let mut picker = Picker::new(1);
    picker.set_max_distance(0.5);
    picker.execute(&scene, Vector3::ZERO, Vector3::unit(2), 0.0, f64::INFINITY);
    assert_eq!(picker.records().len(), 1);
    assert_eq!(picker.records()[0].primitive_index, 0);

    picker.set_max_distance(0.1);
    picker.execute(&scene, Vector3::ZERO, Vector3::unit(2), 0.0, f64::INFINITY);
    assert!(picker.records().is_empty());
}

#[test]
fn test_closest_selection() {
    let scene = single_leaf_scene(points_on_axis(&[-3.0, -1.0, 2.0, 5.0]));
    let mut picker = Picker::new(1);
    picker.execute(&scene, Vector3::ZERO, Vector3::unit(2), f64::NEG_INFINITY, f64::INFINITY);
    assert_eq!(picker.records().len(), 4);

    let t = |r: Option<&querythree::PickRecord>| r.map(|r| r.t);
    assert_eq!(t(picker.closest_to_zero()), Some(-1.0));
    assert_eq!(t(picker.closest_nonnegative()), Some(2.0));
    // The non-positive selection compares the other way round and keeps the farthest hit.
    assert_eq!(t(picker.closest_nonpositive()), Some(-3.0));
}

#[test]
fn test_closest_nonnegative_without_candidates() {
    let scene = single_leaf_scene(points_on_axis(&[-3.0, -1.0]));
    let mut picker = Picker::new(1);
    picker.execute(&scene, Vector3::ZERO, Vector3::unit(2), f64::NEG_INFINITY, f64::INFINITY);
    assert!(picker.closest_nonnegative().is_none());
    assert!(picker.closest_nonpositive().is_some());
}

#[test]
fn test_missed_bound_prunes_leaf() {
    let mut scene = Scene::new();
    let leaf = scene.add_leaf(scene.root(), Transform::IDENTITY, triangle_stack(5));
    scene.update();
    scene.set_world_bound(leaf, Bound::Sphere(Sphere3::new(Vector3::xyz(100.0, 0.0, 0.0), 1.0)));

    let mut picker = Picker::new(4);
    picker.execute(&scene, Vector3::ZERO, Vector3::unit(2), 0.0, f64::INFINITY);
    assert!(picker.records().is_empty());
}

#[test]
fn test_segment_interval_stops_early() {
    let scene = single_leaf_scene(triangle_stack(100));
    let mut picker = Picker::new(4);
    picker.execute(&scene, Vector3::ZERO, Vector3::unit(2), 0.0, 1.505);
    // z = 1.00 through 1.50
    assert_eq!(picker.records().len(), 51);
}

#[test]
#[should_panic(expected = "invalid pick interval")]
fn test_negative_segment_end_panics() {
    let scene = single_leaf_scene(triangle_stack(1));
    Picker::new(1).execute(&scene, Vector3::ZERO, Vector3::unit(2), 0.0, -1.0);
}

#[test]
#[should_panic(expected = "invalid pick interval")]
fn test_half_infinite_line_panics() {
    let scene = single_leaf_scene(triangle_stack(1));
    Picker::new(1).execute(&scene, Vector3::ZERO, Vector3::unit(2), f64::NEG_INFINITY, 4.0);
}

#[test]
#[should_panic(expected = "expecting 3D positions")]
fn test_leaf_without_positions_panics() {
    let visual = Visual::new(VertexBuffer::new(vec![0.0; 9], 3), IndexBuffer::new(Topology::TriMesh, 1));
    let scene = single_leaf_scene(visual);
    Picker::new(1).execute(&scene, Vector3::ZERO, Vector3::unit(2), 0.0, f64::INFINITY);
}
