//! Continuous color ramp for the incident heat rendering.
//!
//! Bounds are computed once over a whole dataset, then each feature's count
//! is normalized into `[0, 1]` and linearly interpolated between the two
//! fixed ramp stops. Ties get identical colors.
//!
//! Known quirk, preserved for compatibility with the upstream rendering: a
//! feature with a non-finite count gets `t = 0` and is therefore
//! indistinguishable by color from a feature at the true minimum. Telling
//! them apart requires the underlying value.

use crate::attrs;
use crate::models::NormalizedFeatureSet;
use crate::style::Rgba;
use serde_json::Value;

/// Lightest ramp stop (#f7fbff).
pub const HEAT_LEFT: Rgba = Rgba::rgb(247, 251, 255);
/// Darkest ramp stop (#08306b).
pub const HEAT_RIGHT: Rgba = Rgba::rgb(8, 48, 107);

/// Attribute names carrying the incident count, most-specific first.
pub const INCIDENT_KEYS: [&str; 1] = ["Incidents"];

/// Dataset-wide normalization bounds for the heat ramp. Also feeds the
/// legend's gradient labels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatScale {
    pub min: f64,
    pub max: f64,
}

impl HeatScale {
    /// One pass over the finite values; defaults to `(0, 1)` when none exist
    /// so normalization stays well-defined.
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut any = false;
        for v in values {
            if v.is_finite() {
                any = true;
                min = min.min(v);
                max = max.max(v);
            }
        }
        if any {
            Self { min, max }
        } else {
            Self { min: 0.0, max: 1.0 }
        }
    }

    /// Normalized ramp parameter for a value. Non-finite values map to the
    /// lightest stop (see module docs).
    pub fn t(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return 0.0;
        }
        let span = match self.max - self.min {
            s if s == 0.0 => 1.0,
            s => s,
        };
        ((value - self.min) / span).clamp(0.0, 1.0)
    }

    pub fn color(&self, value: f64) -> Rgba {
        ramp_color(self.t(value))
    }
}

/// Two-stop linear interpolation between the ramp endpoints.
pub fn ramp_color(t: f64) -> Rgba {
    Rgba::rgb(
        lerp_channel(HEAT_LEFT.r, HEAT_RIGHT.r, t),
        lerp_channel(HEAT_LEFT.g, HEAT_RIGHT.g, t),
        lerp_channel(HEAT_LEFT.b, HEAT_RIGHT.b, t),
    )
}

fn lerp_channel(a: u8, b: u8, t: f64) -> u8 {
    let v = a as f64 + (b as f64 - a as f64) * t;
    v.round().clamp(0.0, 255.0) as u8
}

/// Per-feature incident counts, in feature order. Missing or non-numeric
/// attributes come back as `None`.
pub fn incident_values(set: &NormalizedFeatureSet) -> Vec<Option<f64>> {
    set.features
        .iter()
        .map(|f| {
            attrs::get_ci(&f.attributes, &INCIDENT_KEYS).and_then(value_as_f64)
        })
        .collect()
}

/// Numeric coercion matching the source quirks: counts arrive as JSON
/// numbers or as numeric strings.
pub fn value_as_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
