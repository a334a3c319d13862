use firemap_rs::layers::build_service_area_layer;
use firemap_rs::models::StationId;
use firemap_rs::normalize::normalize_document;
use firemap_rs::registry::MapContext;
use firemap_rs::stats::{coverage_summary, incident_summary};
use serde_json::json;

#[test]
fn incident_summary_counts_and_medians() {
    let values = vec![Some(3.0), Some(1.0), None, Some(f64::NAN), Some(5.0)];
    let s = incident_summary(&values);
    assert_eq!(s.count, 3);
    assert_eq!(s.missing, 2);
    assert_eq!(s.min, Some(1.0));
    assert_eq!(s.max, Some(5.0));
    assert_eq!(s.mean, Some(3.0));
    assert_eq!(s.median, Some(3.0));

    let even = incident_summary(&[Some(1.0), Some(2.0), Some(3.0), Some(4.0)]);
    assert_eq!(even.median, Some(2.5));

    let empty = incident_summary(&[]);
    assert_eq!(empty.count, 0);
    assert_eq!(empty.median, None);
}

#[test]
fn coverage_groups_deterministically_by_layer_and_station() {
    let feature = |station: &str, x: f64| {
        json!({
            "type": "Feature",
            "properties": {"Low_Hazard1": station},
            "geometry": {"type": "Polygon", "coordinates": [[[x, 0.0], [x + 1.0, 0.0], [x + 1.0, 1.0], [x, 0.0]]]}
        })
    };
    let doc = json!({
        "type": "FeatureCollection",
        "features": [feature("102", 0.0), feature("101", 2.0), feature("101", 4.0)]
    });
    let set = normalize_document(&doc).unwrap();

    let mut ctx = MapContext::new();
    build_service_area_layer(&mut ctx, &set, "existing", "Existing Service Areas", &["Low_Hazard1"]);
    build_service_area_layer(&mut ctx, &set, "aug", "Optimized – Augmented Service Areas", &["Low_Hazard1"]);

    let rows = coverage_summary(&ctx.registry);
    assert_eq!(rows.len(), 4);
    // BTreeMap ordering: layer key first, then station.
    assert_eq!(rows[0].key.layer_key, "aug");
    assert_eq!(rows[0].key.station, Some(StationId::number(101)));
    assert_eq!(rows[0].features, 2);
    assert_eq!(rows[3].key.layer_key, "existing");
    assert_eq!(rows[3].key.station, Some(StationId::number(102)));
}
