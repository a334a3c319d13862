//! Legend state aggregation.
//!
//! The legend tracks which keyed sections are currently relevant and the
//! active heat-ramp bounds, and regenerates its presentation model on every
//! mutation. Section ordering is fixed and declarative; it never depends on
//! the order in which show/hide events arrived.

use crate::heat::{HEAT_LEFT, HEAT_RIGHT};
use crate::style::{station_color, Rgba, STATION_IDS};
use crate::models::StationId;
use ahash::AHashSet;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionKind {
    /// Structurally always-on station/color key.
    Stations,
    /// Shown only while heat is active with finite bounds.
    Heat,
    /// Shown only while the key is present in the visible set.
    Keyed,
}

struct SectionSpec {
    kind: SectionKind,
    key: &'static str,
    label: &'static str,
}

/// Declarative section order. Output order of [`Legend::sections`] follows
/// this table, full stop.
const SECTION_ORDER: [SectionSpec; 9] = [
    SectionSpec { kind: SectionKind::Stations, key: "stations", label: "Fire Stations" },
    SectionSpec { kind: SectionKind::Heat, key: "heat", label: "Incidents – Heat Map" },
    SectionSpec { kind: SectionKind::Keyed, key: "spread", label: "Incidents – Spread" },
    SectionSpec { kind: SectionKind::Keyed, key: "existing", label: "Existing Service Areas" },
    SectionSpec { kind: SectionKind::Keyed, key: "nfpa", label: "Optimized – NFPA Service Areas" },
    SectionSpec { kind: SectionKind::Keyed, key: "aug", label: "Optimized – Augmented Service Areas" },
    SectionSpec { kind: SectionKind::Keyed, key: "ful", label: "Optimized – Fulfilled Service Areas" },
    SectionSpec { kind: SectionKind::Keyed, key: "bmed", label: "Backups – Medium" },
    SectionSpec { kind: SectionKind::Keyed, key: "bhigh", label: "Backups – High" },
];

/// One rendered legend section, ready for the presentation collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LegendSection {
    /// The fixed station/color key.
    StationKey {
        label: String,
        entries: Vec<(StationId, Rgba)>,
    },
    /// Gradient bar with the dataset bounds at either end.
    HeatRamp {
        label: String,
        min: f64,
        max: f64,
        left: Rgba,
        right: Rgba,
    },
    /// Plain heading for a visible layer section.
    Heading { label: String },
}

/// Reactive legend state. Mutators are called from the show/hide and
/// selection handlers; each one synchronously regenerates the presentation
/// model.
#[derive(Debug, Default)]
pub struct Legend {
    visible_keys: AHashSet<String>,
    heat_active: bool,
    heat_min: Option<f64>,
    heat_max: Option<f64>,
    collapsed: bool,
    built: bool,
    model: Vec<LegendSection>,
}

impl Legend {
    pub fn new() -> Self {
        Self {
            collapsed: true, // starts collapsed
            ..Self::default()
        }
    }

    /// Idempotent construction. The first call builds the presentation
    /// model; later calls are no-ops.
    pub fn ensure(&mut self) {
        if !self.built {
            self.built = true;
            self.regenerate();
        }
    }

    pub fn add_key(&mut self, key: &str) {
        self.ensure();
        self.visible_keys.insert(key.to_string());
        self.regenerate();
    }

    pub fn remove_key(&mut self, key: &str) {
        self.visible_keys.remove(key);
        self.regenerate();
    }

    pub fn set_section_visible(&mut self, key: &str, visible: bool) {
        if visible {
            self.add_key(key);
        } else {
            self.remove_key(key);
        }
    }

    /// Set all heat fields atomically.
    pub fn set_heat_legend(&mut self, active: bool, min: Option<f64>, max: Option<f64>) {
        self.ensure();
        self.heat_active = active;
        self.heat_min = min;
        self.heat_max = max;
        self.regenerate();
    }

    /// No-op unless the flag actually changes.
    pub fn set_collapsed(&mut self, collapsed: bool) {
        if self.collapsed != collapsed {
            self.collapsed = collapsed;
            self.regenerate();
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.visible_keys.contains(key)
    }

    /// Current presentation model, in the fixed declarative order.
    pub fn sections(&self) -> &[LegendSection] {
        &self.model
    }

    fn regenerate(&mut self) {
        let mut out = Vec::new();
        for spec in &SECTION_ORDER {
            match spec.kind {
                SectionKind::Stations => {
                    let entries = STATION_IDS
                        .iter()
                        .filter_map(|&id| {
                            let st = StationId::number(id);
                            station_color(&st).map(|c| (st, c))
                        })
                        .collect();
                    out.push(LegendSection::StationKey {
                        label: spec.label.to_string(),
                        entries,
                    });
                }
                SectionKind::Heat => {
                    let bounds = match (self.heat_min, self.heat_max) {
                        (Some(min), Some(max)) if min.is_finite() && max.is_finite() => {
                            Some((min, max))
                        }
                        _ => None,
                    };
                    if self.heat_active {
                        if let Some((min, max)) = bounds {
                            out.push(LegendSection::HeatRamp {
                                label: spec.label.to_string(),
                                min,
                                max,
                                left: HEAT_LEFT,
                                right: HEAT_RIGHT,
                            });
                        }
                    }
                }
                SectionKind::Keyed => {
                    if self.visible_keys.contains(spec.key) {
                        out.push(LegendSection::Heading {
                            label: spec.label.to_string(),
                        });
                    }
                }
            }
        }
        self.model = out;
    }
}
