use glam::DVec3;

use crate::node::{LatLon, LatLonAlt};

// WGS84 ellipsoid
const WGS84_A: f64 = 6_378_137.0;
const WGS84_B: f64 = 6_356_752.314_245_18;

// Mean earth radius used for great-circle distances
const EARTH_RADIUS: f64 = 6_371_000.0;

pub fn geodetic_to_ecef(position: LatLonAlt) -> DVec3 {
    let a2 = WGS84_A * WGS84_A;
    let b2 = WGS84_B * WGS84_B;
    let lat = position.lat.to_radians();
    let lon = position.lon.to_radians();
    let (sin_lat, cos_lat) = lat.sin_cos();
    let (sin_lon, cos_lon) = lon.sin_cos();

    let l = 1.0 / (a2 * cos_lat * cos_lat + b2 * sin_lat * sin_lat).sqrt();
    let nh = a2 * l + position.alt;
    DVec3::new(
        nh * cos_lat * cos_lon,
        nh * cos_lat * sin_lon,
        (b2 * l + position.alt) * sin_lat,
    )
}

/// East-north-up coordinates of `position` in the tangent plane at `reference`.
pub fn geodetic_to_enu(position: LatLonAlt, reference: LatLonAlt) -> DVec3 {
    let p = geodetic_to_ecef(position);
    let r = geodetic_to_ecef(reference);
    let d = p - r;
    let (sin_lat, cos_lat) = reference.lat.to_radians().sin_cos();
    let (sin_lon, cos_lon) = reference.lon.to_radians().sin_cos();
    DVec3::new(
        -sin_lon * d.x + cos_lon * d.y,
        -sin_lat * cos_lon * d.x - sin_lat * sin_lon * d.y + cos_lat * d.z,
        cos_lat * cos_lon * d.x + cos_lat * sin_lon * d.y + sin_lat * d.z,
    )
}

/// Haversine distance in meters.
pub fn distance_from_lat_lon(a: LatLon, b: LatLon) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Wraps `value` into `[min, max]` by whole intervals.
#[inline]
pub fn wrap(value: f64, min: f64, max: f64) -> f64 {
    if (min..=max).contains(&value) {
        return value;
    }
    let interval = max - min;
    min + (value - min).rem_euclid(interval)
}
