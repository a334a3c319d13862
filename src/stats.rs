use crate::models::StationId;
use crate::registry::VisibilityRegistry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Grouping key for coverage counts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct CoverageKey {
    pub layer_key: String,
    pub station: Option<StationId>,
}

/// Rendered-feature count for one (layer, station) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Coverage {
    pub key: CoverageKey,
    pub features: usize,
}

/// Count registered (station-filterable) features by layer and station.
pub fn coverage_summary(registry: &VisibilityRegistry) -> Vec<Coverage> {
    let mut groups: BTreeMap<CoverageKey, usize> = BTreeMap::new();
    for (fr, station) in registry.entries() {
        let key = CoverageKey {
            layer_key: registry.group(fr.group).key.clone(),
            station: station.clone(),
        };
        *groups.entry(key).or_default() += 1;
    }
    groups
        .into_iter()
        .map(|(key, features)| Coverage { key, features })
        .collect()
}

/// Summary statistics over one incident dataset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IncidentSummary {
    pub count: usize,
    pub missing: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
}

/// Compute incident-count statistics; `None` entries count as missing.
pub fn incident_summary(values: &[Option<f64>]) -> IncidentSummary {
    let mut vals: Vec<f64> = values
        .iter()
        .copied()
        .filter_map(|v| v.filter(|x| x.is_finite()))
        .collect();
    let missing = values.len() - vals.len();
    vals.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let count = vals.len();
    let min = vals.first().cloned();
    let max = vals.last().cloned();
    let mean = if count > 0 {
        Some(vals.iter().copied().sum::<f64>() / count as f64)
    } else {
        None
    };
    let median = if count == 0 {
        None
    } else if count % 2 == 1 {
        Some(vals[count / 2])
    } else {
        Some((vals[count / 2 - 1] + vals[count / 2]) / 2.0)
    };
    IncidentSummary {
        count,
        missing,
        min,
        max,
        mean,
        median,
    }
}
