//! Coordinate projection into geographic (longitude/latitude) pairs.
//!
//! Sources declare their frame by wkid. The three Web-Mercator aliases get
//! the inverse spherical transform; anything else is treated as already
//! geographic and only has its axis order fixed up. Output order is always
//! `(latitude, longitude)`.

use crate::models::LatLng;
use serde_json::Value;

/// Spherical Earth radius used by the Web-Mercator projection, in meters.
const EARTH_RADIUS_M: f64 = 6378137.0;

/// The wkid aliases under which upstream exports declare Web-Mercator.
pub const WEB_MERCATOR_WKIDS: [i32; 3] = [3857, 102100, 102113];

pub fn is_web_mercator(wkid: Option<i32>) -> bool {
    wkid.is_some_and(|w| WEB_MERCATOR_WKIDS.contains(&w))
}

/// Inverse spherical Web-Mercator transform.
pub fn mercator_to_lat_lng(x: f64, y: f64) -> LatLng {
    let lng = (x / EARTH_RADIUS_M).to_degrees();
    let lat = (2.0 * (y / EARTH_RADIUS_M).exp().atan() - std::f64::consts::FRAC_PI_2).to_degrees();
    LatLng::new(lat, lng)
}

fn finite_pair(x: Option<f64>, y: Option<f64>) -> Option<(f64, f64)> {
    match (x, y) {
        (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Some((x, y)),
        _ => None,
    }
}

/// Project one raw point. Accepts both source encodings, `[x, y]` arrays and
/// `{x, y}` objects; returns `None` for anything else.
pub fn point_to_lat_lng(pt: &Value, wkid: Option<i32>) -> Option<LatLng> {
    let (x, y) = match pt {
        Value::Array(a) if a.len() >= 2 => finite_pair(a[0].as_f64(), a[1].as_f64())?,
        Value::Object(o) => finite_pair(
            o.get("x").and_then(Value::as_f64),
            o.get("y").and_then(Value::as_f64),
        )?,
        _ => return None,
    };
    if is_web_mercator(wkid) {
        Some(mercator_to_lat_lng(x, y))
    } else {
        // Already geographic: source order is (lon, lat).
        Some(LatLng::new(y, x))
    }
}

/// Project a ring point-by-point, dropping points that do not parse.
pub fn project_ring(ring: &[Value], wkid: Option<i32>) -> Vec<LatLng> {
    ring.iter()
        .filter_map(|pt| point_to_lat_lng(pt, wkid))
        .collect()
}

/// Project every ring of a polygon; rings with fewer than 3 surviving points
/// are discarded. An empty result renders nothing but is not an error.
pub fn project_rings(rings: &[Vec<Value>], wkid: Option<i32>) -> Vec<Vec<LatLng>> {
    rings
        .iter()
        .map(|r| project_ring(r, wkid))
        .filter(|r| r.len() >= 3)
        .collect()
}
