//! Display groups, the visibility registry, and the station filter.
//!
//! Station filtering must apply retroactively across independently-loaded
//! layers, so registry state lives in one constructor-injected context
//! rather than ambient globals. Reconciliation is level-triggered: the
//! filter recomputes desired attachment from current state and is always
//! safe to call redundantly.

use crate::legend::Legend;
use crate::models::{Bounds, LatLng, StationId};
use crate::style::{MarkerStyle, StyleSpec, STATION_IDS};
use ahash::AHashSet;
use serde::Serialize;

/// Index of a display group within its context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GroupId(pub usize);

/// Non-owning reference to a rendered feature: the owning group plus the
/// feature's index within it. Features are never reassigned to a different
/// parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FeatureRef {
    pub group: GroupId,
    pub index: usize,
}

/// Projected geometry handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Shape {
    Polygon(Vec<Vec<LatLng>>),
    Marker(LatLng),
    /// Non-interactive text anchored at a point (station number tags).
    Label { at: LatLng, text: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum FeatureStyle {
    Polygon(StyleSpec),
    Marker(MarkerStyle),
    /// Labels carry no style of their own.
    Text,
}

/// One rendered feature, exclusively owned by its parent group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedFeature {
    pub shape: Shape,
    pub style: FeatureStyle,
    /// Ordered popup fields (name, display value).
    pub info: Vec<(String, String)>,
}

/// What a display group renders; the heat kind carries its dataset bounds
/// for the legend gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GroupKind {
    ServiceArea,
    Spread,
    Heat { min: f64, max: f64 },
    Points,
    Boundary,
}

/// A display group: the core-side handle for one map overlay.
#[derive(Debug)]
pub struct LayerGroup {
    pub key: String,
    pub label: String,
    pub kind: GroupKind,
    shown: bool,
    features: Vec<RenderedFeature>,
    attached: Vec<bool>,
}

impl LayerGroup {
    pub fn is_shown(&self) -> bool {
        self.shown
    }

    pub fn features(&self) -> &[RenderedFeature] {
        &self.features
    }

    pub fn is_attached(&self, index: usize) -> bool {
        self.attached.get(index).copied().unwrap_or(false)
    }

    /// Indices of the features currently attached to the group.
    pub fn attached_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.attached
            .iter()
            .enumerate()
            .filter_map(|(i, on)| on.then_some(i))
    }

    /// Geographic bounds over every feature, attached or not. Used for the
    /// initial viewport fit; may be invalid when the group is empty.
    pub fn bounds(&self) -> Bounds {
        let mut b = Bounds::empty();
        for f in &self.features {
            match &f.shape {
                Shape::Polygon(rings) => {
                    for ring in rings {
                        for p in ring {
                            b.extend(*p);
                        }
                    }
                }
                Shape::Marker(p) | Shape::Label { at: p, .. } => b.extend(*p),
            }
        }
        b
    }
}

/// One attach/detach performed by a reconciliation pass, in execution order.
/// The rendering collaborator replays these against its own layer objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FilterOp {
    Attach(FeatureRef),
    Detach(FeatureRef),
}

#[derive(Debug, Clone)]
struct RegistryEntry {
    feature: FeatureRef,
    station: Option<StationId>,
}

/// The visibility registry: every station-filterable feature across all
/// loaded layers, plus the mutable active-station set.
#[derive(Debug)]
pub struct VisibilityRegistry {
    groups: Vec<LayerGroup>,
    entries: Vec<RegistryEntry>,
    selected: AHashSet<StationId>,
}

impl VisibilityRegistry {
    /// Starts with every known station active.
    pub fn new() -> Self {
        Self {
            groups: Vec::new(),
            entries: Vec::new(),
            selected: STATION_IDS.iter().map(|&n| StationId::number(n)).collect(),
        }
    }

    pub fn add_group(
        &mut self,
        key: impl Into<String>,
        label: impl Into<String>,
        kind: GroupKind,
    ) -> GroupId {
        self.groups.push(LayerGroup {
            key: key.into(),
            label: label.into(),
            kind,
            shown: false,
            features: Vec::new(),
            attached: Vec::new(),
        });
        GroupId(self.groups.len() - 1)
    }

    /// Add a feature to its owning group; it starts attached.
    pub fn add_feature(&mut self, group: GroupId, feature: RenderedFeature) -> FeatureRef {
        let g = &mut self.groups[group.0];
        g.features.push(feature);
        g.attached.push(true);
        FeatureRef {
            group,
            index: g.features.len() - 1,
        }
    }

    /// Register a feature for station filtering, denormalizing the station
    /// id so later passes never re-read attributes.
    pub fn register(&mut self, feature: FeatureRef, station: Option<StationId>) {
        self.entries.push(RegistryEntry { feature, station });
    }

    pub fn groups(&self) -> &[LayerGroup] {
        &self.groups
    }

    pub fn group(&self, id: GroupId) -> &LayerGroup {
        &self.groups[id.0]
    }

    pub fn group_by_key(&self, key: &str) -> Option<GroupId> {
        self.groups.iter().position(|g| g.key == key).map(GroupId)
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Iterate the registered features with their denormalized station ids.
    pub fn entries(&self) -> impl Iterator<Item = (FeatureRef, &Option<StationId>)> {
        self.entries.iter().map(|e| (e.feature, &e.station))
    }

    /// Denormalized station id for a registered feature, if registered.
    pub fn station_of(&self, feature: FeatureRef) -> Option<&Option<StationId>> {
        self.entries
            .iter()
            .find(|e| e.feature == feature)
            .map(|e| &e.station)
    }

    pub fn selected_stations(&self) -> impl Iterator<Item = &StationId> {
        self.selected.iter()
    }

    pub fn is_selected(&self, station: &StationId) -> bool {
        self.selected.contains(station)
    }

    /// Low-level shown flag; legend wiring lives on [`MapContext`].
    pub fn set_shown(&mut self, id: GroupId, shown: bool) {
        self.groups[id.0].shown = shown;
    }

    pub fn select_station(&mut self, station: StationId) -> Vec<FilterOp> {
        self.selected.insert(station);
        self.apply_filter()
    }

    pub fn deselect_station(&mut self, station: &StationId) -> Vec<FilterOp> {
        self.selected.remove(station);
        self.apply_filter()
    }

    pub fn select_all(&mut self) -> Vec<FilterOp> {
        self.selected = STATION_IDS.iter().map(|&n| StationId::number(n)).collect();
        self.apply_filter()
    }

    pub fn select_none(&mut self) -> Vec<FilterOp> {
        self.selected.clear();
        self.apply_filter()
    }

    /// Reconcile attachment against the active-station set.
    ///
    /// Entries whose parent group is hidden are left untouched; a freshly
    /// shown group is reconciled by the show handler calling back in here.
    /// Idempotent: with no intervening state change a second pass performs
    /// no operations.
    pub fn apply_filter(&mut self) -> Vec<FilterOp> {
        let mut ops = Vec::new();
        for entry in &self.entries {
            let group = &mut self.groups[entry.feature.group.0];
            if !group.shown {
                continue;
            }
            let want_on = entry
                .station
                .as_ref()
                .is_some_and(|st| self.selected.contains(st));
            let has_it = group.attached[entry.feature.index];
            if want_on && !has_it {
                group.attached[entry.feature.index] = true;
                ops.push(FilterOp::Attach(entry.feature));
            } else if !want_on && has_it {
                group.attached[entry.feature.index] = false;
                ops.push(FilterOp::Detach(entry.feature));
            }
        }
        ops
    }
}

impl Default for VisibilityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Constructor-injected context shared by every component that registers or
/// queries rendered features: the visibility registry plus the legend.
#[derive(Debug, Default)]
pub struct MapContext {
    pub registry: VisibilityRegistry,
    pub legend: Legend,
}

impl MapContext {
    pub fn new() -> Self {
        Self {
            registry: VisibilityRegistry::new(),
            legend: Legend::new(),
        }
    }

    /// Show a group: update the legend section for its kind, then reconcile
    /// the freshly shown group against the current station selection.
    pub fn show_group(&mut self, id: GroupId) -> Vec<FilterOp> {
        self.registry.set_shown(id, true);
        match self.registry.group(id).kind {
            GroupKind::ServiceArea | GroupKind::Spread => {
                let key = self.registry.group(id).key.clone();
                self.legend.add_key(&key);
            }
            GroupKind::Heat { min, max } => {
                self.legend.set_heat_legend(true, Some(min), Some(max));
            }
            GroupKind::Points | GroupKind::Boundary => {}
        }
        self.registry.apply_filter()
    }

    /// Hide a group and retract its legend section. The group keeps its
    /// last attachment state so re-showing starts from it.
    pub fn hide_group(&mut self, id: GroupId) -> Vec<FilterOp> {
        self.registry.set_shown(id, false);
        match self.registry.group(id).kind {
            GroupKind::ServiceArea | GroupKind::Spread => {
                let key = self.registry.group(id).key.clone();
                self.legend.remove_key(&key);
            }
            GroupKind::Heat { .. } => {
                self.legend.set_heat_legend(false, None, None);
            }
            GroupKind::Points | GroupKind::Boundary => {}
        }
        self.registry.apply_filter()
    }
}
