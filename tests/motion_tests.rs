// Host-side tests for rotation deltas, the motion buffer and the geo helpers.

use glam::{DVec2, DVec3};
use nav_core::geo::{distance_from_lat_lon, geodetic_to_enu, rotate_about_up, wrap};
use nav_core::{
    CenterPolicy, LatLon, LatLonAlt, MotionBuffer, NavigationParams, PendingMotion,
    RotationDelta, SmoothingParams,
};

fn make_buffer() -> MotionBuffer {
    MotionBuffer::new(SmoothingParams::default())
}

#[test]
fn rotation_delta_lerp_reaches_target_at_one() {
    let mut delta = RotationDelta::new(0.3, -0.2);
    let target = RotationDelta::new(-1.0, 2.0);
    delta.lerp(&target, 1.0);
    assert_eq!(delta, target);

    let mut delta = RotationDelta::new(0.3, -0.2);
    delta.lerp(&target, 0.0);
    assert_eq!(delta, RotationDelta::new(0.3, -0.2));

    let mut delta = RotationDelta::ZERO;
    delta.lerp(&RotationDelta::new(1.0, 1.0), 0.25);
    assert!((delta.phi - 0.25).abs() < 1e-12);
    assert!((delta.theta - 0.25).abs() < 1e-12);
}

#[test]
fn rotation_delta_threshold_is_per_component() {
    let mut delta = RotationDelta::new(0.001, -0.5);
    delta.threshold(0.001);
    assert_eq!(delta.phi, 0.0);
    assert_eq!(delta.theta, -0.5);

    let mut delta = RotationDelta::new(0.0011, -0.0005);
    delta.threshold(0.001);
    assert_eq!(delta.phi, 0.0011);
    assert_eq!(delta.theta, 0.0);
}

#[test]
fn rotation_delta_multiply_reset_and_clamp() {
    let mut delta = RotationDelta::new(2.0, -4.0);
    delta.multiply(0.5);
    assert_eq!(delta, RotationDelta::new(1.0, -2.0));
    assert_eq!(delta.clamped(1.5), RotationDelta::new(1.0, -1.5));
    delta.reset();
    assert!(delta.is_zero());
}

#[test]
fn rotation_request_is_blended_and_consumed() {
    let mut buffer = make_buffer();
    buffer.push_rotation(RotationDelta::new(0.1, 0.0));
    buffer.push_rotation(RotationDelta::new(0.1, 0.0));
    assert_eq!(
        buffer.pending(),
        PendingMotion::Rotation(RotationDelta::new(0.2, 0.0))
    );

    let applied = buffer.integrate_rotation(1.0);
    // Speeding up uses the increase coefficient.
    assert!((applied.phi - 0.97 * 0.2).abs() < 1e-12);
    assert_eq!(buffer.pending(), PendingMotion::None);
}

#[test]
fn rotation_decays_to_zero_without_requests() {
    let mut buffer = make_buffer();
    buffer.push_rotation(RotationDelta::new(0.1, -0.1));
    let first = buffer.integrate_rotation(1.0);
    let second = buffer.integrate_rotation(1.0);
    assert!((second.phi - first.phi * 0.86).abs() < 1e-12);
    assert!(second.phi.abs() < first.phi.abs());

    let mut frames = 0;
    while !buffer.rotation().is_zero() {
        buffer.integrate_rotation(1.0);
        frames += 1;
        assert!(frames < 100, "rotation never settled");
    }
}

#[test]
fn zero_frame_factor_stops_rotation_at_once() {
    let mut buffer = make_buffer();
    buffer.push_rotation(RotationDelta::new(0.1, 0.1));
    buffer.integrate_rotation(0.0);
    let applied = buffer.integrate_rotation(0.0);
    assert!(applied.is_zero());
}

#[test]
fn pending_slot_holds_one_kind_of_motion() {
    let mut buffer = make_buffer();
    buffer.push_rotation(RotationDelta::new(0.1, 0.0));
    buffer.push_basic(DVec2::new(0.01, 0.0), 0.0);
    assert_eq!(
        buffer.pending(),
        PendingMotion::BasicRotation(DVec2::new(0.01, 0.0))
    );

    // The replaced rotation request is gone.
    let applied = buffer.integrate_rotation(1.0);
    assert!(applied.is_zero());

    buffer.push_basic_unbounded(DVec2::new(0.2, 0.0));
    buffer.push_basic_unbounded(DVec2::new(0.2, 0.0));
    assert_eq!(
        buffer.pending(),
        PendingMotion::UnboundedBasicRotation(DVec2::new(0.4, 0.0))
    );
}

#[test]
fn basic_request_is_bounded_by_zoom() {
    let mut buffer = make_buffer();
    buffer.push_basic(DVec2::new(1.0, -1.0), 0.0);
    assert_eq!(
        buffer.pending(),
        PendingMotion::BasicRotation(DVec2::new(0.05, -0.05))
    );

    let mut buffer = make_buffer();
    buffer.push_basic(DVec2::new(1.0, -1.0), 1.0);
    assert_eq!(
        buffer.pending(),
        PendingMotion::BasicRotation(DVec2::new(0.025, -0.025))
    );
}

#[test]
fn basic_step_reports_unbounded_requests() {
    let mut buffer = make_buffer();
    buffer.push_basic_unbounded(DVec2::new(0.3, 0.0));
    let step = buffer.integrate_basic(0.0);
    assert_eq!(step.unbounded, Some(DVec2::new(0.3, 0.0)));
    assert!(step.applied.x > 0.0);

    let step = buffer.integrate_basic(0.0);
    assert_eq!(step.unbounded, None);
}

#[test]
fn clear_drops_pending_and_applied_motion() {
    let mut buffer = make_buffer();
    buffer.push_basic(DVec2::new(0.04, 0.0), 0.0);
    buffer.integrate_basic(0.0);
    assert!(buffer.basic_rotation().x > 0.0);
    buffer.push_rotation(RotationDelta::new(0.1, 0.0));
    buffer.clear();
    assert_eq!(buffer.pending(), PendingMotion::None);
    assert!(buffer.rotation().is_zero());
    assert_eq!(buffer.basic_rotation(), DVec2::ZERO);
}

#[test]
fn full_pano_center_wraps_horizontally() {
    let center = CenterPolicy::FullPano.constrain(DVec2::new(0.95 + 0.1, 0.5));
    assert!((center.x - 0.05).abs() < 1e-9);
    assert!((center.y - 0.5).abs() < 1e-12);

    let center = CenterPolicy::FullPano.constrain(DVec2::new(-0.25, 0.0));
    assert!((center.x - 0.75).abs() < 1e-9);
    assert!((center.y - 0.05).abs() < 1e-12);
}

#[test]
fn cropped_and_rectilinear_centers_clamp() {
    let center = CenterPolicy::FullWidthCrop.constrain(DVec2::new(1.2, 1.3));
    assert!((center.x - 0.2).abs() < 1e-9);
    assert_eq!(center.y, 1.0);

    let center = CenterPolicy::Rectilinear.constrain(DVec2::new(1.2, -0.3));
    assert_eq!(center, DVec2::new(1.0, 0.0));
    assert!(!CenterPolicy::Rectilinear.wraps());
    assert!(CenterPolicy::FullPano.wraps());
}

#[test]
fn wrap_leaves_in_range_values_alone() {
    assert_eq!(wrap(0.0, 0.0, 1.0), 0.0);
    assert_eq!(wrap(1.0, 0.0, 1.0), 1.0);
    assert!((wrap(2.25, 0.0, 1.0) - 0.25).abs() < 1e-12);
    assert!((wrap(-190.0, -180.0, 180.0) - 170.0).abs() < 1e-9);
}

#[test]
fn haversine_distance_of_one_degree() {
    let d = distance_from_lat_lon(LatLon { lat: 0.0, lon: 0.0 }, LatLon { lat: 1.0, lon: 0.0 });
    assert!((d - 111_194.9).abs() < 1.0, "distance {d}");
    let zero = distance_from_lat_lon(LatLon { lat: 55.0, lon: 13.0 }, LatLon { lat: 55.0, lon: 13.0 });
    assert!(zero.abs() < 1e-9);
}

#[test]
fn enu_axes_point_east_north_up() {
    let reference = LatLonAlt {
        lat: 55.0,
        lon: 13.0,
        alt: 10.0,
    };
    assert!(geodetic_to_enu(reference, reference).length() < 1e-6);

    let north = geodetic_to_enu(LatLonAlt { lat: 55.001, ..reference }, reference);
    assert!(north.y > 100.0 && north.x.abs() < 1e-3);
    let east = geodetic_to_enu(LatLonAlt { lon: 13.001, ..reference }, reference);
    assert!(east.x > 50.0 && east.y.abs() < 1.0);
    let up = geodetic_to_enu(LatLonAlt { alt: 15.0, ..reference }, reference);
    assert!((up.z - 5.0).abs() < 1e-6);
}

#[test]
fn rotate_about_up_preserves_length_and_clamps_polar() {
    let offset = DVec3::new(3.0, 4.0, 0.0);
    let rotated = rotate_about_up(offset, DVec3::Z, 0.7, 0.2);
    assert!((rotated.length() - 5.0).abs() < 1e-9);

    let straight_up = rotate_about_up(offset, DVec3::Z, 0.0, -10.0);
    let polar = straight_up.truncate().length().atan2(straight_up.z);
    assert!((polar - 0.1).abs() < 1e-9);

    let quarter = rotate_about_up(DVec3::X, DVec3::Z, std::f64::consts::FRAC_PI_2, 0.0);
    assert!((quarter - DVec3::Y).length() < 1e-9);
}

#[test]
fn frame_speed_scales_with_fps() {
    let params = NavigationParams::default();
    assert!((params.frame_speed(60.0) - 0.025).abs() < 1e-12);
    assert!((params.frame_speed(30.0) - 0.05).abs() < 1e-12);
    assert!((params.frame_speed(0.0) - 0.025).abs() < 1e-12);
    assert!((params.frame_speed(f64::NAN) - 0.025).abs() < 1e-12);
    assert_eq!(params.clamp_zoom(5.0), 3.0);
    assert_eq!(params.clamp_zoom(-1.0), 0.0);
}

#[test]
fn params_deserialize_with_defaults() {
    let params: NavigationParams =
        serde_json::from_str(r#"{"max_zoom": 2.0, "smoothing": {"rotation_threshold": 0.01}}"#)
            .unwrap();
    assert_eq!(params.max_zoom, 2.0);
    assert_eq!(params.min_zoom, 0.0);
    assert_eq!(params.smoothing.rotation_threshold, 0.01);
    assert_eq!(params.smoothing.rotation_acceleration, 0.86);
}
