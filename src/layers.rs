//! Layer builders: normalized feature sets in, display groups out.
//!
//! Each builder is format-transparent; by the time it runs, the normalizer
//! and projector have erased the source family. Service-area polygons are
//! the only features registered for station filtering.

use crate::attrs;
use crate::heat::{self, HeatScale};
use crate::models::{LatLng, NormalizedFeatureSet, RawGeometry, StationId};
use crate::project;
use crate::registry::{FeatureStyle, GroupId, GroupKind, MapContext, RenderedFeature, Shape};
use crate::style;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

/// Trailing candidates appended to every service-area station lookup; the
/// per-source candidates from the catalog stay most-specific, first.
const COMMON_STATION_KEYS: [&str; 4] = ["Station", "Fire Station", "Fire_Station", "Station_ID"];

const AREA_KEYS: [&str; 2] = ["Shape__Area", "Shape_Area"];
const PERIMETER_KEYS: [&str; 2] = ["Shape__Length", "Shape_Length"];
const SPREAD_STATION_KEYS: [&str; 1] = ["STATION"];
const NAME_KEYS: [&str; 3] = ["LANDMARKNA", "NAME", "STATION"];
const OID_KEYS: [&str; 2] = ["OBJECTID", "FID"];

const DARK_STROKE: style::Rgba = style::Rgba::rgb(51, 51, 51);

/// Display text for an optional attribute value; the em dash is what the
/// popups show for absent fields.
fn field_text(v: Option<&Value>) -> String {
    match v {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => "—".to_string(),
        Some(other) => other.to_string(),
    }
}

fn station_text(st: Option<&StationId>) -> String {
    st.map(|s| s.to_string()).unwrap_or_else(|| "—".to_string())
}

fn shape_fields(a: &Map<String, Value>) -> Vec<(String, String)> {
    vec![
        ("Area".to_string(), field_text(attrs::get_ci(a, &AREA_KEYS))),
        (
            "Perimeter".to_string(),
            field_text(attrs::get_ci(a, &PERIMETER_KEYS)),
        ),
    ]
}

/// Build a service-area polygon layer and register every rendered feature
/// for station filtering.
///
/// Features with the excluded station id are suppressed entirely; features
/// whose rings all collapse below 3 points render nothing. Both are silent.
pub fn build_service_area_layer(
    ctx: &mut MapContext,
    set: &NormalizedFeatureSet,
    key: &str,
    label: &str,
    station_keys: &[&str],
) -> GroupId {
    let group = ctx
        .registry
        .add_group(key, label, GroupKind::ServiceArea);
    let candidates: Vec<&str> = station_keys
        .iter()
        .chain(COMMON_STATION_KEYS.iter())
        .copied()
        .collect();
    for feature in &set.features {
        let Some(RawGeometry::Polygon { rings }) = &feature.geometry else {
            continue;
        };
        let station = attrs::resolve_station_id(&feature.attributes, &candidates);
        let Some(spec) = style::style_for_station(station.as_ref()) else {
            continue; // excluded station: never added to any group
        };
        let projected = project::project_rings(rings, set.wkid);
        if projected.is_empty() {
            continue;
        }
        let mut info = vec![("Station".to_string(), station_text(station.as_ref()))];
        info.extend(shape_fields(&feature.attributes));
        let fr = ctx.registry.add_feature(
            group,
            RenderedFeature {
                shape: Shape::Polygon(projected),
                style: FeatureStyle::Polygon(spec),
                info,
            },
        );
        ctx.registry.register(fr, station);
    }
    group
}

/// Incident spread: categorical-by-station polygons. Not station-filtered,
/// so nothing is registered.
pub fn build_spread_layer(
    ctx: &mut MapContext,
    set: &NormalizedFeatureSet,
    key: &str,
    label: &str,
) -> GroupId {
    let group = ctx.registry.add_group(key, label, GroupKind::Spread);
    for feature in &set.features {
        let Some(RawGeometry::Polygon { rings }) = &feature.geometry else {
            continue;
        };
        let station = attrs::resolve_station_id(&feature.attributes, &SPREAD_STATION_KEYS);
        let Some(spec) = style::style_for_station(station.as_ref()) else {
            continue;
        };
        let projected = project::project_rings(rings, set.wkid);
        if projected.is_empty() {
            continue;
        }
        let mut info = vec![("Station".to_string(), station_text(station.as_ref()))];
        info.extend(shape_fields(&feature.attributes));
        ctx.registry.add_feature(
            group,
            RenderedFeature {
                shape: Shape::Polygon(projected),
                style: FeatureStyle::Polygon(spec),
                info,
            },
        );
    }
    group
}

/// Incident heat: continuous-by-count polygons. Returns the group together
/// with the dataset scale the legend gradient needs.
pub fn build_heat_layer(
    ctx: &mut MapContext,
    set: &NormalizedFeatureSet,
    key: &str,
    label: &str,
) -> (GroupId, HeatScale) {
    let values = heat::incident_values(set);
    let scale = HeatScale::from_values(values.iter().filter_map(|v| *v));
    let group = ctx.registry.add_group(
        key,
        label,
        GroupKind::Heat {
            min: scale.min,
            max: scale.max,
        },
    );
    for (feature, value) in set.features.iter().zip(values.iter().copied()) {
        let Some(RawGeometry::Polygon { rings }) = &feature.geometry else {
            continue;
        };
        let projected = project::project_rings(rings, set.wkid);
        if projected.is_empty() {
            continue;
        }
        let v = value.unwrap_or(f64::NAN);
        let spec = style::StyleSpec {
            stroke: DARK_STROKE,
            weight: 0.4,
            fill: scale.color(v),
            fill_opacity: 0.55,
        };
        let mut info = vec![(
            "Incidents".to_string(),
            value.map(format_count).unwrap_or_else(|| "—".to_string()),
        )];
        info.extend(shape_fields(&feature.attributes));
        ctx.registry.add_feature(
            group,
            RenderedFeature {
                shape: Shape::Polygon(projected),
                style: FeatureStyle::Polygon(spec),
                info,
            },
        );
    }
    (group, scale)
}

fn format_count(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}

fn station_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b1?\d{2,3}\b").expect("station pattern"))
}

/// Station identity for a point feature: a station number embedded in the
/// landmark name, else the object id.
pub fn station_id_from_name(a: &Map<String, Value>) -> Option<StationId> {
    if let Some(name) = attrs::get_ci(a, &NAME_KEYS) {
        let text = match name {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        if let Some(m) = station_pattern().find(&text) {
            if let Ok(n) = m.as_str().parse::<i64>() {
                return Some(StationId::Number(n));
            }
        }
    }
    attrs::get_ci(a, &OID_KEYS).and_then(attrs::station_id_from_value)
}

/// Point location: geometry when present, else the centroid attributes
/// (`CENT_X_385`/`CENT_Y_385` are Web-Mercator, `CENT_X`/`CENT_Y`
/// geographic).
fn point_location(feature_geometry: Option<&RawGeometry>, a: &Map<String, Value>, wkid: Option<i32>) -> Option<LatLng> {
    if let Some(RawGeometry::Point(pt)) = feature_geometry {
        return project::point_to_lat_lng(pt, wkid);
    }
    let num = |keys: &[&str]| attrs::get_ci(a, keys).and_then(heat::value_as_f64);
    if let (Some(x), Some(y)) = (num(&["CENT_X_385"]), num(&["CENT_Y_385"])) {
        return Some(project::mercator_to_lat_lng(x, y));
    }
    if let (Some(x), Some(y)) = (num(&["CENT_X"]), num(&["CENT_Y"])) {
        return Some(LatLng::new(y, x));
    }
    None
}

/// Fire-station point markers plus their number labels.
pub fn build_points_layer(
    ctx: &mut MapContext,
    set: &NormalizedFeatureSet,
    key: &str,
    label: &str,
) -> GroupId {
    let group = ctx.registry.add_group(key, label, GroupKind::Points);
    for feature in &set.features {
        let a = &feature.attributes;
        let Some(at) = point_location(feature.geometry.as_ref(), a, set.wkid) else {
            continue;
        };
        let station = station_id_from_name(a);
        let Some(spec) = style::marker_style_for_station(station.as_ref()) else {
            continue;
        };
        let info = vec![
            ("Station".to_string(), station_text(station.as_ref())),
            (
                "Name".to_string(),
                field_text(attrs::get_ci(a, &["LANDMARKNA"])),
            ),
            (
                "Type".to_string(),
                field_text(attrs::get_ci(a, &["LANDMARKTY"])),
            ),
        ];
        ctx.registry.add_feature(
            group,
            RenderedFeature {
                shape: Shape::Marker(at),
                style: FeatureStyle::Marker(spec),
                info,
            },
        );
        ctx.registry.add_feature(
            group,
            RenderedFeature {
                shape: Shape::Label {
                    at,
                    text: station_text(station.as_ref()),
                },
                style: FeatureStyle::Text,
                info: Vec::new(),
            },
        );
    }
    group
}

/// Municipal boundary: one fixed-style overlay, no station identity and no
/// registry participation.
pub fn build_boundary_layer(
    ctx: &mut MapContext,
    set: &NormalizedFeatureSet,
    key: &str,
    label: &str,
) -> GroupId {
    let group = ctx.registry.add_group(key, label, GroupKind::Boundary);
    let spec = style::StyleSpec {
        stroke: DARK_STROKE,
        weight: 1.5,
        fill: DARK_STROKE,
        fill_opacity: 0.0,
    };
    for feature in &set.features {
        let Some(RawGeometry::Polygon { rings }) = &feature.geometry else {
            continue;
        };
        let projected = project::project_rings(rings, set.wkid);
        if projected.is_empty() {
            continue;
        }
        ctx.registry.add_feature(
            group,
            RenderedFeature {
                shape: Shape::Polygon(projected),
                style: FeatureStyle::Polygon(spec),
                info: Vec::new(),
            },
        );
    }
    group
}
