use crate::registry::{FeatureStyle, MapContext, Shape};
use crate::stats::Coverage;
use anyhow::Result;
use csv::WriterBuilder;
use serde_json::{json, Value};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Save the coverage summary as CSV with header.
pub fn save_coverage_csv<P: AsRef<Path>>(rows: &[Coverage], path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.serialize(("layer", "station", "features"))?;
    for row in rows {
        let station = row
            .key
            .station
            .as_ref()
            .map(|s| s.to_string())
            .unwrap_or_default();
        wtr.serialize((&row.key.layer_key, station, row.features))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save every loaded layer as one GeoJSON FeatureCollection.
///
/// Geometry is emitted in GeoJSON axis order (`[lng, lat]`); the layer key,
/// style, and popup fields ride in `properties`.
pub fn save_geojson<P: AsRef<Path>>(ctx: &MapContext, path: P) -> Result<()> {
    let mut features = Vec::new();
    for group in ctx.registry.groups() {
        for feature in group.features() {
            let geometry = match &feature.shape {
                Shape::Polygon(rings) => json!({
                    "type": "Polygon",
                    "coordinates": rings
                        .iter()
                        .map(|r| r.iter().map(|p| json!([p.lng, p.lat])).collect::<Vec<_>>())
                        .collect::<Vec<_>>(),
                }),
                Shape::Marker(p) | Shape::Label { at: p, .. } => json!({
                    "type": "Point",
                    "coordinates": [p.lng, p.lat],
                }),
            };
            let mut properties = serde_json::Map::new();
            properties.insert("layer".to_string(), json!(group.key));
            if let Shape::Label { text, .. } = &feature.shape {
                properties.insert("label".to_string(), json!(text));
            }
            match &feature.style {
                FeatureStyle::Polygon(s) => {
                    properties.insert("style".to_string(), serde_json::to_value(s)?);
                }
                FeatureStyle::Marker(s) => {
                    properties.insert("style".to_string(), serde_json::to_value(s)?);
                }
                FeatureStyle::Text => {}
            }
            for (name, value) in &feature.info {
                properties.insert(name.clone(), json!(value));
            }
            features.push(json!({
                "type": "Feature",
                "geometry": geometry,
                "properties": Value::Object(properties),
            }));
        }
    }
    let doc = json!({ "type": "FeatureCollection", "features": features });
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(&doc)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StationId;
    use crate::stats::CoverageKey;
    use tempfile::tempdir;

    #[test]
    fn write_coverage_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("coverage.csv");
        let rows = vec![Coverage {
            key: CoverageKey {
                layer_key: "existing".into(),
                station: Some(StationId::number(101)),
            },
            features: 3,
        }];
        save_coverage_csv(&rows, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("layer,station,features"));
        assert!(text.contains("existing,101,3"));
    }
}
