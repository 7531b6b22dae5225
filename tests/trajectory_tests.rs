// Host-side tests for trajectory ownership in the navigation core.

use std::f64::consts::FRAC_PI_2;
use std::sync::Arc;

use nav_core::{
    LatLon, NavigationError, NavigationParams, Node, StateCore, StateSnapshot, TransitionMode,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn make_node(id: &str, lat: f64, lon: f64) -> Arc<Node> {
    Arc::new(Node {
        id: id.to_string(),
        lat_lon: LatLon { lat, lon },
        alt: 0.0,
        original_lat_lon: LatLon { lat, lon },
        orientation: 1,
        width: 640.0,
        height: 480.0,
        focal: 0.85,
        scale: 1.0,
        rotation: [FRAC_PI_2, 0.0, 0.0],
        gpano: None,
        full_pano: false,
        merged: true,
        merge_cc: Some(1),
        assets_cached: true,
    })
}

fn make_nodes(prefix: &str, count: usize) -> Vec<Arc<Node>> {
    (0..count)
        .map(|i| make_node(&format!("{prefix}{i}"), 0.0001 * i as f64, 0.0))
        .collect()
}

fn make_core(trajectory: Vec<Arc<Node>>, current_index: Option<usize>) -> StateCore {
    let snapshot = StateSnapshot::with_trajectory(
        trajectory,
        current_index,
        TransitionMode::Default,
        NavigationParams::default(),
    );
    StateCore::new(&snapshot).unwrap()
}

fn ids(core: &StateCore) -> Vec<String> {
    core.trajectory().iter().map(|n| n.id.clone()).collect()
}

fn assert_consistent(core: &StateCore) {
    match core.current_index() {
        Some(i) => {
            assert!(i < core.trajectory().len(), "index {i} out of range");
            assert!(core.current_node().is_some());
            assert!(core.current_transform().is_some());
            assert_eq!(core.previous_node().is_some(), i > 0);
            assert_eq!(core.previous_transform().is_some(), i > 0);
        }
        None => {
            assert!(core.trajectory().is_empty());
            assert!(core.current_node().is_none());
            assert!(core.current_transform().is_none());
        }
    }
}

#[test]
fn empty_core_has_no_current_node() {
    let core = make_core(Vec::new(), None);
    assert_eq!(core.current_index(), None);
    assert!(core.current_node().is_none());
    assert!(core.previous_node().is_none());
    assert!(!core.motionless());
}

#[test]
fn append_to_empty_sets_first_node_current() {
    let mut core = make_core(Vec::new(), None);
    core.append(make_nodes("a", 3)).unwrap();
    assert_eq!(core.current_index(), Some(0));
    assert_eq!(core.current_node().unwrap().id, "a0");
    assert_eq!(core.trajectory().len(), 3);
    assert_consistent(&core);
}

#[test]
fn append_keeps_current_index() {
    let mut core = make_core(make_nodes("a", 2), Some(1));
    core.append(make_nodes("b", 2)).unwrap();
    assert_eq!(core.current_index(), Some(1));
    assert_eq!(ids(&core), vec!["a0", "a1", "b0", "b1"]);
    assert_consistent(&core);
}

#[test]
fn prepend_shifts_current_index() {
    let mut core = make_core(make_nodes("a", 2), Some(1));
    core.prepend(make_nodes("b", 3)).unwrap();
    assert_eq!(core.current_index(), Some(4));
    assert_eq!(core.current_node().unwrap().id, "a1");
    assert_eq!(core.previous_node().unwrap().id, "a0");
    assert_consistent(&core);
}

#[test]
fn prepend_to_empty_makes_last_prepended_current() {
    let mut core = make_core(Vec::new(), None);
    core.prepend(make_nodes("b", 3)).unwrap();
    assert_eq!(core.current_index(), Some(2));
    assert_eq!(core.current_node().unwrap().id, "b2");
    assert_consistent(&core);
}

#[test]
fn empty_node_lists_are_rejected() {
    let mut core = make_core(make_nodes("a", 2), Some(1));
    assert_eq!(
        core.append(Vec::new()),
        Err(NavigationError::InvalidTrajectoryOperation)
    );
    assert_eq!(
        core.prepend(Vec::new()),
        Err(NavigationError::InvalidTrajectoryOperation)
    );
    assert_eq!(
        core.set(Vec::new()),
        Err(NavigationError::InvalidTrajectoryOperation)
    );
    assert_eq!(core.trajectory().len(), 2);
}

#[test]
fn uncached_nodes_are_rejected_without_mutation() {
    let mut core = make_core(make_nodes("a", 2), Some(1));
    let mut uncached = (*make_node("u", 0.0, 0.0)).clone();
    uncached.assets_cached = false;
    let batch = vec![make_node("ok", 0.0, 0.0), Arc::new(uncached)];

    match core.append(batch.clone()) {
        Err(NavigationError::UncachedAsset { node_id }) => assert_eq!(node_id, "u"),
        other => panic!("expected uncached asset error, got {other:?}"),
    }
    assert!(core.prepend(batch.clone()).is_err());
    assert!(core.set(batch).is_err());
    assert_eq!(ids(&core), vec!["a0", "a1"]);
    assert_eq!(core.current_index(), Some(1));
}

#[test]
fn uncached_snapshot_fails_construction() {
    let mut node = (*make_node("u", 0.0, 0.0)).clone();
    node.assets_cached = false;
    let snapshot = StateSnapshot::with_trajectory(
        vec![Arc::new(node)],
        Some(0),
        TransitionMode::Default,
        NavigationParams::default(),
    );
    assert!(matches!(
        StateCore::new(&snapshot),
        Err(NavigationError::UncachedAsset { .. })
    ));
}

#[test]
fn remove_drops_leading_entries() {
    let mut core = make_core(make_nodes("a", 5), Some(3));
    core.remove(2).unwrap();
    assert_eq!(ids(&core), vec!["a2", "a3", "a4"]);
    assert_eq!(core.current_index(), Some(1));
    assert_eq!(core.current_node().unwrap().id, "a3");
    assert_consistent(&core);
}

#[test]
fn remove_refuses_previous_and_current() {
    let mut core = make_core(make_nodes("a", 5), Some(3));
    assert!(matches!(
        core.remove(3),
        Err(NavigationError::InvalidRemoval { count: 3, .. })
    ));
    assert_eq!(core.trajectory().len(), 5);

    let mut core = make_core(make_nodes("a", 3), Some(1));
    core.remove(0).unwrap();
    assert!(core.remove(1).is_err());
    assert_eq!(core.current_index(), Some(1));
}

#[test]
fn remove_of_huge_count_fails_without_mutating() {
    let mut core = make_core(make_nodes("a", 4), Some(3));
    assert!(matches!(
        core.remove(usize::MAX),
        Err(NavigationError::InvalidRemoval { count: i64::MAX, .. })
    ));
    assert_eq!(ids(&core), vec!["a0", "a1", "a2", "a3"]);
    assert_eq!(core.current_index(), Some(3));
    assert_consistent(&core);
}

#[test]
fn remove_at_first_node_is_rejected_even_for_zero() {
    let mut core = make_core(make_nodes("a", 3), Some(0));
    assert!(matches!(
        core.remove(0),
        Err(NavigationError::InvalidRemoval { count: 0, .. })
    ));
}

#[test]
fn negative_removal_reports_count() {
    let err = NavigationError::negative_removal(-2);
    assert!(matches!(err, NavigationError::InvalidRemoval { count: -2, .. }));
    assert!(err.to_string().contains("-2"));
}

#[test]
fn cut_drops_future_entries() {
    let mut core = make_core(make_nodes("a", 5), Some(2));
    core.cut();
    assert_eq!(ids(&core), vec!["a0", "a1", "a2"]);
    assert_eq!(core.current_index(), Some(2));
    assert_consistent(&core);

    let mut empty = make_core(Vec::new(), None);
    empty.cut();
    assert_eq!(empty.current_index(), None);
}

#[test]
fn set_keeps_current_node_as_previous() {
    let mut core = make_core(make_nodes("a", 4), Some(2));
    core.set(make_nodes("b", 2)).unwrap();
    assert_eq!(ids(&core), vec!["a2", "b0", "b1"]);
    assert_eq!(core.current_index(), Some(1));
    assert_eq!(core.previous_node().unwrap().id, "a2");
    assert_eq!(core.current_node().unwrap().id, "b0");
    assert_consistent(&core);
}

#[test]
fn set_on_empty_starts_at_first_node() {
    let mut core = make_core(Vec::new(), None);
    core.set(make_nodes("b", 2)).unwrap();
    assert_eq!(core.current_index(), Some(0));
    assert_eq!(core.current_node().unwrap().id, "b0");
}

#[test]
fn out_of_range_snapshot_index_is_clamped() {
    let core = make_core(make_nodes("a", 3), Some(7));
    assert_eq!(core.current_index(), Some(2));
    assert_consistent(&core);
}

#[test]
fn reference_follows_first_node() {
    let mut core = make_core(Vec::new(), None);
    core.append(vec![make_node("far", 55.6, 13.0)]).unwrap();
    let reference = core.reference();
    assert!((reference.lat - 55.6).abs() < 1e-12);
    assert!((reference.lon - 13.0).abs() < 1e-12);

    // The current node sits at the origin of the local frame.
    let position = core.current_camera().position;
    assert!(position.length() < 1e-6, "position {position:?}");
}

#[test]
fn reference_is_kept_for_nearby_nodes() {
    let mut core = make_core(vec![make_node("a", 55.6, 13.0)], Some(0));
    core.set(vec![make_node("b", 55.605, 13.0)]).unwrap();
    let reference = core.reference();
    assert!((reference.lat - 55.6).abs() < 1e-12);
}

#[test]
fn reference_moves_after_motionless_jump() {
    let mut core = make_core(vec![make_node("a", 55.6, 13.0)], Some(0));
    // More than 25 m away, so the cut into it is motionless and the frame
    // may be re-anchored.
    core.set(vec![make_node("b", 55.7, 13.0)]).unwrap();
    assert!(core.motionless_transition());
    assert!((core.reference().lat - 55.7).abs() < 1e-12);
    let position = core.current_camera().position;
    assert!(position.length() < 1e-6, "position {position:?}");
}

#[test]
fn nearby_nodes_keep_metric_spacing() {
    let core = make_core(
        vec![make_node("a", 0.0, 0.0), make_node("b", 0.0001, 0.0)],
        Some(1),
    );
    let a = core.previous_camera().position;
    let b = core.current_camera().position;
    // 1e-4 degrees of latitude is about 11 m north.
    assert!(((b - a).length() - 11.06).abs() < 0.1);
    assert!(b.y > a.y);
}

#[test]
fn motionless_classification() {
    let base = make_node("a", 0.0, 0.0);
    let close = make_node("b", 0.0001, 0.0);
    let core = make_core(vec![base.clone(), close.clone()], Some(1));
    assert!(!core.motionless_transition());

    let far = make_node("far", 0.001, 0.0);
    let core = make_core(vec![base.clone(), far], Some(1));
    assert!(core.motionless_transition());

    let mut other_cc = (*close).clone();
    other_cc.merge_cc = Some(2);
    let core = make_core(vec![base.clone(), Arc::new(other_cc)], Some(1));
    assert!(core.motionless_transition());

    let mut unmerged = (*close).clone();
    unmerged.merged = false;
    let core = make_core(vec![base.clone(), Arc::new(unmerged)], Some(1));
    assert!(core.motionless_transition());

    let mut no_cc = (*close).clone();
    no_cc.merge_cc = None;
    let mut base_no_cc = (*base).clone();
    base_no_cc.merge_cc = None;
    let core = make_core(vec![Arc::new(base_no_cc), Arc::new(no_cc)], Some(1));
    assert!(core.motionless_transition());
}

#[test]
fn instantaneous_mode_is_always_motionless() {
    let mut core = make_core(
        vec![make_node("a", 0.0, 0.0), make_node("b", 0.0001, 0.0)],
        Some(1),
    );
    core.set_transition_mode(TransitionMode::Instantaneous);
    assert!(core.motionless_transition());
}

#[test]
fn random_operations_keep_index_invariant() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut core = make_core(Vec::new(), None);
    let mut next_id = 0usize;
    for _ in 0..500 {
        let before = core.trajectory().len();
        match rng.gen_range(0..5) {
            0 => {
                let count = rng.gen_range(1..4);
                let nodes = make_nodes(&format!("n{next_id}-"), count);
                next_id += 1;
                core.append(nodes).unwrap();
                assert_eq!(core.trajectory().len(), before + count);
            }
            1 => {
                let count = rng.gen_range(1..4);
                let nodes = make_nodes(&format!("n{next_id}-"), count);
                next_id += 1;
                let current = core.current_node().map(|n| n.id.clone());
                core.prepend(nodes).unwrap();
                assert_eq!(core.trajectory().len(), before + count);
                if current.is_some() {
                    assert_eq!(core.current_node().map(|n| n.id.clone()), current);
                }
            }
            2 => {
                let n = rng.gen_range(0..4);
                let current = core.current_node().map(|n| n.id.clone());
                match core.remove(n) {
                    Ok(()) => {
                        assert_eq!(core.trajectory().len(), before - n);
                        assert_eq!(core.current_node().map(|n| n.id.clone()), current);
                    }
                    Err(NavigationError::InvalidRemoval { .. }) => {
                        assert_eq!(core.trajectory().len(), before);
                    }
                    Err(other) => panic!("unexpected error {other:?}"),
                }
            }
            3 => {
                core.cut();
                if let Some(i) = core.current_index() {
                    assert_eq!(core.trajectory().len(), i + 1);
                }
            }
            _ => {
                let count = rng.gen_range(1..3);
                let nodes = make_nodes(&format!("n{next_id}-"), count);
                next_id += 1;
                core.set(nodes).unwrap();
            }
        }
        assert_consistent(&core);
    }
}

#[test]
fn cameras_start_at_node_center_along_principal_axis() {
    let core = make_core(
        vec![make_node("a", 0.0, 0.0), make_node("b", 0.0001, 0.0001)],
        Some(1),
    );
    let transform = core.current_transform().unwrap();
    let camera = core.current_camera();
    assert!((transform.center() - camera.position).length() < 1e-9);
    assert!(transform.project_sfm(camera.lookat).length() < 1e-9);
    let center = transform.project_basic(camera.lookat);
    assert!((center - glam::DVec2::new(0.5, 0.5)).length() < 1e-9);
    assert!(transform.gpano().is_none());
}

#[test]
fn cameras_look_at_the_configured_depth() {
    let params = NavigationParams {
        lookat_depth: 4.0,
        ..NavigationParams::default()
    };
    let snapshot = StateSnapshot::with_trajectory(
        make_nodes("a", 2),
        Some(1),
        TransitionMode::Default,
        params,
    );
    let core = StateCore::new(&snapshot).unwrap();
    for camera in [core.current_camera(), core.previous_camera()] {
        assert!(((camera.lookat - camera.position).length() - 4.0).abs() < 1e-9);
    }
}
