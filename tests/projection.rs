use firemap_rs::project::{mercator_to_lat_lng, point_to_lat_lng, project_rings};
use serde_json::json;

const TOL: f64 = 1e-9;
const R: f64 = 6378137.0;

#[test]
fn mercator_origin_maps_to_null_island() {
    let p = mercator_to_lat_lng(0.0, 0.0);
    assert!(p.lat.abs() < TOL);
    assert!(p.lng.abs() < TOL);
}

#[test]
fn mercator_round_trip_within_tolerance() {
    // Forward spherical Web-Mercator for (lat 45, lon 10), inverted by the
    // projector.
    let lon: f64 = 10.0;
    let lat: f64 = 45.0;
    let x = lon.to_radians() * R;
    let y = (lat.to_radians() / 2.0 + std::f64::consts::FRAC_PI_4).tan().ln() * R;
    let p = mercator_to_lat_lng(x, y);
    assert!((p.lat - lat).abs() < TOL, "lat {}", p.lat);
    assert!((p.lng - lon).abs() < TOL, "lng {}", p.lng);
}

#[test]
fn all_mercator_aliases_project() {
    for wkid in [3857, 102100, 102113] {
        let p = point_to_lat_lng(&json!([0.0, 0.0]), Some(wkid)).unwrap();
        assert!(p.lat.abs() < TOL && p.lng.abs() < TOL, "wkid {wkid}");
    }
}

#[test]
fn geographic_pairs_swap_axis_order() {
    // Source order is (lon, lat); output contract is (lat, lng).
    let p = point_to_lat_lng(&json!([-79.64, 43.59]), Some(4326)).unwrap();
    assert_eq!((p.lat, p.lng), (43.59, -79.64));

    let p = point_to_lat_lng(&json!({"x": -79.64, "y": 43.59}), None).unwrap();
    assert_eq!((p.lat, p.lng), (43.59, -79.64));
}

#[test]
fn malformed_points_are_rejected() {
    assert!(point_to_lat_lng(&json!("nope"), Some(4326)).is_none());
    assert!(point_to_lat_lng(&json!([1.0]), Some(4326)).is_none());
    assert!(point_to_lat_lng(&json!({"x": 1.0}), Some(4326)).is_none());
    assert!(point_to_lat_lng(&json!({"x": "NaN", "y": 2.0}), Some(4326)).is_none());
}

#[test]
fn short_rings_are_discarded_not_errors() {
    let rings = vec![
        // Survives: 4 valid points.
        vec![json!([0.0, 0.0]), json!([1.0, 0.0]), json!([1.0, 1.0]), json!([0.0, 0.0])],
        // Collapses below 3 once the junk point is dropped.
        vec![json!([0.0, 0.0]), json!([1.0, 0.0]), json!("junk")],
    ];
    let projected = project_rings(&rings, Some(4326));
    assert_eq!(projected.len(), 1);
    assert_eq!(projected[0].len(), 4);

    let none = project_rings(&[vec![json!([0.0, 0.0])]], Some(4326));
    assert!(none.is_empty());
}
