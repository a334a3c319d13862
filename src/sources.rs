//! The fixed source catalog and the per-source load pipeline.
//!
//! Sources load independently and may complete in any order; one failing
//! source is logged and omitted, and never blocks its siblings. That
//! best-effort posture is deliberate: the upstream exports are uncurated.

use crate::error::SourceError;
use crate::fetch::{self, Client};
use crate::heat::HeatScale;
use crate::layers;
use crate::normalize;
use crate::registry::{GroupId, MapContext};
use log::{info, warn};
use std::path::PathBuf;

/// How one catalog entry is turned into a display group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    ServiceArea,
    Spread,
    Heat,
    Points,
    Boundary,
}

/// One entry of the source catalog.
#[derive(Debug, Clone, Copy)]
pub struct SourceSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub file: &'static str,
    pub kind: SourceKind,
    /// Station-column candidates for service-area sources, most-specific
    /// first. Each upstream export names the column differently.
    pub station_keys: &'static [&'static str],
}

/// Every data source the map knows about.
pub const SOURCES: [SourceSpec; 10] = [
    SourceSpec {
        key: "existing",
        label: "Existing Service Areas",
        file: "Existing_Service_Areas.json",
        kind: SourceKind::ServiceArea,
        station_keys: &["Low_Hazard1"],
    },
    SourceSpec {
        key: "nfpa",
        label: "Optimized – NFPA Service Areas",
        file: "Optimized_NFPA_Service_Areas.json",
        kind: SourceKind::ServiceArea,
        station_keys: &["Areas", "Low_Hazard1"],
    },
    SourceSpec {
        key: "aug",
        label: "Optimized – Augmented Service Areas",
        file: "Optimized_Augmented_Service_Areas.json",
        kind: SourceKind::ServiceArea,
        station_keys: &["Low_Hazard1"],
    },
    SourceSpec {
        key: "ful",
        label: "Optimized – Fulfilled Service Areas",
        file: "Optimized_Fulfilled_Service_Areas.json",
        kind: SourceKind::ServiceArea,
        station_keys: &["Low_Hazard1"],
    },
    SourceSpec {
        key: "bmed",
        label: "Backups – Medium",
        file: "Service_Areas_Backups_Medium.json",
        kind: SourceKind::ServiceArea,
        station_keys: &["Low_Hazard2"],
    },
    SourceSpec {
        key: "bhigh",
        label: "Backups – High",
        file: "Service_Areas_Backups_High.json",
        kind: SourceKind::ServiceArea,
        station_keys: &["High_Hazard2"],
    },
    SourceSpec {
        key: "spread",
        label: "Incidents – Spread",
        file: "Incidents_Spread.json",
        kind: SourceKind::Spread,
        station_keys: &[],
    },
    SourceSpec {
        key: "heat",
        label: "Incidents – Heat Map",
        file: "Incidents_Heat_Map.json",
        kind: SourceKind::Heat,
        station_keys: &[],
    },
    SourceSpec {
        key: "points",
        label: "Fire Stations",
        file: "Fire_Stations.json",
        kind: SourceKind::Points,
        station_keys: &[],
    },
    SourceSpec {
        key: "boundary",
        label: "City Boundary",
        file: "City_Boundary.json",
        kind: SourceKind::Boundary,
        station_keys: &[],
    },
];

/// Layer-control display order (labels).
pub const LAYER_ORDER: [&str; 10] = [
    "Fire Stations",
    "City Boundary",
    "Incidents – Spread",
    "Incidents – Heat Map",
    "Existing Service Areas",
    "Optimized – NFPA Service Areas",
    "Optimized – Augmented Service Areas",
    "Optimized – Fulfilled Service Areas",
    "Backups – Medium",
    "Backups – High",
];

/// The one layer shown by default after a load.
pub const DEFAULT_ON_KEY: &str = "existing";

/// Where the export documents live.
#[derive(Debug, Clone)]
pub enum SourceRoot {
    Dir(PathBuf),
    Url(String),
}

impl SourceRoot {
    /// Heuristic used by the CLI: anything that looks like a URL is one.
    pub fn parse(root: &str) -> Self {
        if root.starts_with("http://") || root.starts_with("https://") {
            SourceRoot::Url(root.trim_end_matches('/').to_string())
        } else {
            SourceRoot::Dir(PathBuf::from(root))
        }
    }

    fn load(&self, client: &Client, file: &str) -> Result<serde_json::Value, SourceError> {
        match self {
            SourceRoot::Dir(dir) => fetch::load_file(dir.join(file)),
            SourceRoot::Url(base) => {
                let url = format!("{base}/{}", fetch::encode_segment(file));
                client.fetch_json(&url)
            }
        }
    }
}

/// One successfully built layer.
#[derive(Debug)]
pub struct LoadedLayer {
    pub key: &'static str,
    pub label: &'static str,
    pub group: GroupId,
    /// Per-feature incident counts (heat sources only).
    pub incidents: Option<Vec<Option<f64>>>,
    pub heat_scale: Option<HeatScale>,
}

/// Load every catalog source through the full pipeline.
///
/// Each source is an isolated unit of work: fetch, normalize, and build
/// errors are logged per-source and the source is omitted from the result.
/// After loading, the default layer is shown and reconciled.
pub fn load_all(ctx: &mut MapContext, root: &SourceRoot, client: &Client) -> Vec<LoadedLayer> {
    let mut loaded = Vec::new();
    for spec in &SOURCES {
        match load_one(ctx, root, client, spec) {
            Ok(layer) => {
                info!(
                    "{}: {} features",
                    spec.label,
                    ctx.registry.group(layer.group).features().len()
                );
                loaded.push(layer);
            }
            Err(err) => {
                warn!("{} failed: {err}", spec.label);
            }
        }
    }
    if let Some(default) = ctx.registry.group_by_key(DEFAULT_ON_KEY) {
        ctx.show_group(default);
    }
    loaded
}

fn load_one(
    ctx: &mut MapContext,
    root: &SourceRoot,
    client: &Client,
    spec: &SourceSpec,
) -> Result<LoadedLayer, SourceError> {
    let doc = root.load(client, spec.file)?;
    let set = normalize::normalize_document(&doc)?;
    let mut incidents = None;
    let mut heat_scale = None;
    let group = match spec.kind {
        SourceKind::ServiceArea => layers::build_service_area_layer(
            ctx,
            &set,
            spec.key,
            spec.label,
            spec.station_keys,
        ),
        SourceKind::Spread => layers::build_spread_layer(ctx, &set, spec.key, spec.label),
        SourceKind::Heat => {
            let values = crate::heat::incident_values(&set);
            let (group, scale) = layers::build_heat_layer(ctx, &set, spec.key, spec.label);
            incidents = Some(values);
            heat_scale = Some(scale);
            group
        }
        SourceKind::Points => layers::build_points_layer(ctx, &set, spec.key, spec.label),
        SourceKind::Boundary => layers::build_boundary_layer(ctx, &set, spec.key, spec.label),
    };
    Ok(LoadedLayer {
        key: spec.key,
        label: spec.label,
        group,
        incidents,
        heat_scale,
    })
}
