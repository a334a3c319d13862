//! Format normalization for the three incompatible export families.
//!
//! The upstream data exporter emits a GeoJSON `FeatureCollection`, a bare
//! feature set with a declared spatial reference, or a multi-layer wrapper,
//! all from the same conceptual source. Detection is ordered and the first
//! match wins, because the shapes overlap superficially; everything
//! downstream only ever sees the canonical [`NormalizedFeatureSet`].

use crate::error::SourceError;
use crate::models::{NormalizedFeatureSet, RawFeature, RawGeometry};
use serde_json::{Map, Value};

/// wkid of the geographic (longitude/latitude) reference.
pub const GEOGRAPHIC_WKID: i32 = 4326;

/// Detect the document shape and yield the canonical feature list.
///
/// Detection order:
/// 1. GeoJSON `FeatureCollection`: spatial reference fixed at 4326.
/// 2. A feature set (`features` array and/or a `spatialReference` object);
///    a missing document-level reference is inherited from the first
///    feature's geometry.
/// 3. A multi-layer wrapper (`layers` or `featureCollection.layers`); every
///    layer's features are merged, and the first non-null spatial reference
///    across layers is taken.
///
/// Anything else is a [`SourceError::Format`].
pub fn normalize_document(doc: &Value) -> Result<NormalizedFeatureSet, SourceError> {
    // 1. GeoJSON FeatureCollection
    if doc.get("type").and_then(Value::as_str) == Some("FeatureCollection") {
        if let Some(features) = doc.get("features").and_then(Value::as_array) {
            return Ok(NormalizedFeatureSet {
                wkid: Some(GEOGRAPHIC_WKID),
                features: features.iter().map(canonical_feature).collect(),
            });
        }
    }

    // 2. Feature set with a declared (possibly projected) reference
    let doc_wkid = doc.get("spatialReference").and_then(wkid_of);
    if let Some(features) = doc.get("features").and_then(Value::as_array) {
        let wkid = doc_wkid.or_else(|| {
            features
                .first()
                .and_then(|f| f.get("geometry"))
                .and_then(|g| g.get("spatialReference"))
                .and_then(wkid_of)
        });
        return Ok(NormalizedFeatureSet {
            wkid,
            features: features.iter().map(canonical_feature).collect(),
        });
    }
    if doc_wkid.is_some() {
        return Ok(NormalizedFeatureSet {
            wkid: doc_wkid,
            features: Vec::new(),
        });
    }

    // 3. Multi-layer wrapper
    let layers = doc
        .get("layers")
        .and_then(Value::as_array)
        .or_else(|| {
            doc.get("featureCollection")
                .and_then(|fc| fc.get("layers"))
                .and_then(Value::as_array)
        });
    if let Some(layers) = layers {
        let mut wkid = None;
        let mut merged = Vec::new();
        for layer in layers {
            let features = layer
                .get("featureSet")
                .and_then(|fs| fs.get("features"))
                .and_then(Value::as_array)
                .or_else(|| layer.get("features").and_then(Value::as_array));
            if let Some(features) = features {
                merged.extend(features.iter().map(canonical_feature));
            }
            if wkid.is_none() {
                wkid = layer
                    .get("layerDefinition")
                    .and_then(|d| d.get("spatialReference"))
                    .and_then(wkid_of)
                    .or_else(|| layer.get("spatialReference").and_then(wkid_of));
            }
        }
        if !merged.is_empty() {
            return Ok(NormalizedFeatureSet {
                wkid,
                features: merged,
            });
        }
    }

    Err(SourceError::Format)
}

/// Pull a wkid out of a `spatialReference` object (`wkid` first, then the
/// `latestWkid` alias).
fn wkid_of(sr: &Value) -> Option<i32> {
    sr.get("wkid")
        .and_then(Value::as_i64)
        .or_else(|| sr.get("latestWkid").and_then(Value::as_i64))
        .map(|w| w as i32)
}

/// Canonicalize one feature, whichever family it came from.
///
/// Attributes come from `attributes` (ESRI) or `properties` (GeoJSON);
/// geometry from `rings`/`curveRings`/`x,y` (ESRI) or typed GeoJSON
/// geometry. Geometry kinds the map never renders (lines, multipoints)
/// canonicalize to no geometry.
fn canonical_feature(raw: &Value) -> RawFeature {
    let attributes = raw
        .get("attributes")
        .or_else(|| raw.get("properties"))
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_else(Map::new);
    let geometry = raw.get("geometry").and_then(canonical_geometry);
    RawFeature {
        geometry,
        attributes,
    }
}

fn canonical_geometry(g: &Value) -> Option<RawGeometry> {
    let rings = g.get("rings").or_else(|| g.get("curveRings"));
    if let Some(rings) = rings.and_then(Value::as_array) {
        return Some(RawGeometry::Polygon {
            rings: rings
                .iter()
                .filter_map(Value::as_array)
                .cloned()
                .collect(),
        });
    }
    if g.get("x").is_some() && g.get("y").is_some() {
        return Some(RawGeometry::Point(g.clone()));
    }
    match g.get("type").and_then(Value::as_str) {
        Some("Polygon") => {
            let rings = g.get("coordinates").and_then(Value::as_array)?;
            Some(RawGeometry::Polygon {
                rings: rings
                    .iter()
                    .filter_map(Value::as_array)
                    .cloned()
                    .collect(),
            })
        }
        Some("MultiPolygon") => {
            let polys = g.get("coordinates").and_then(Value::as_array)?;
            let rings = polys
                .iter()
                .filter_map(Value::as_array)
                .flatten()
                .filter_map(Value::as_array)
                .cloned()
                .collect();
            Some(RawGeometry::Polygon { rings })
        }
        Some("Point") => g.get("coordinates").map(|c| RawGeometry::Point(c.clone())),
        _ => None,
    }
}
