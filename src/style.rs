//! Deterministic station styling.
//!
//! Every known station id maps to a palette slot by its position in the
//! fixed, sorted station roster; the palette repeats cyclically if the roster
//! ever outgrows it. Polygon fills and point markers share the same lookup so
//! a station's color is consistent across every layer kind.
//!
//! # Design Principles
//!
//! - **Deterministic**: identical inputs always produce identical outputs
//! - **Exclusion**: the decommissioned station id is suppressed entirely,
//!   never merely hidden
//! - **Unknown owners stay visible**: a missing or zero station id gets a
//!   neutral gray style so mis-attributed features can be spotted on the map

use crate::models::StationId;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// RGBA color. Serializes as a `#rrggbb` hex string; the alpha channel rides
/// separately as a style opacity, the way the renderer expects it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Parse a `#rrggbb` hex string (leading `#` optional, case-insensitive).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let s = hex.strip_prefix('#').unwrap_or(hex);
        if s.len() != 6 || !s.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&s[0..2], 16).ok()?;
        let g = u8::from_str_radix(&s[2..4], 16).ok()?;
        let b = u8::from_str_radix(&s[4..6], 16).ok()?;
        Some(Self::rgb(r, g, b))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgba::from_hex(&s).ok_or_else(|| D::Error::custom(format!("invalid hex color: {s}")))
    }
}

/// Polygon style handed to the rendering collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StyleSpec {
    pub stroke: Rgba,
    pub weight: f64,
    pub fill: Rgba,
    pub fill_opacity: f64,
}

/// Circle-marker style for station points. Larger and fully opaque compared
/// to the translucent polygon fill.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    pub radius: f64,
    pub fill: Rgba,
    pub stroke: Rgba,
    pub weight: f64,
    pub fill_opacity: f64,
}

/// Station id suppressed from every layer (decommissioned).
pub const EXCLUDED_STATION: i64 = 113;

/// Fixed, sorted station roster. 113 is carved out.
pub const STATION_IDS: [i64; 21] = [
    101, 102, 103, 104, 105, 106, 107, 108, 109, 110, 111, 112, 114, 115, 116, 117, 118, 119, 120,
    121, 122,
];

/// Fingerprint-stable categorical palette; slot i belongs to `STATION_IDS[i]`
/// (modulo the palette length).
pub const PALETTE: [Rgba; 21] = [
    Rgba::rgb(141, 211, 199), // #8dd3c7
    Rgba::rgb(255, 255, 179), // #ffffb3
    Rgba::rgb(190, 186, 218), // #bebada
    Rgba::rgb(251, 128, 114), // #fb8072
    Rgba::rgb(128, 177, 211), // #80b1d3
    Rgba::rgb(253, 180, 98),  // #fdb462
    Rgba::rgb(179, 222, 105), // #b3de69
    Rgba::rgb(252, 205, 229), // #fccde5
    Rgba::rgb(217, 217, 217), // #d9d9d9
    Rgba::rgb(188, 128, 189), // #bc80bd
    Rgba::rgb(204, 235, 197), // #ccebc5
    Rgba::rgb(255, 237, 111), // #ffed6f
    Rgba::rgb(27, 158, 119),  // #1b9e77
    Rgba::rgb(217, 95, 2),    // #d95f02
    Rgba::rgb(117, 112, 179), // #7570b3
    Rgba::rgb(231, 41, 138),  // #e7298a
    Rgba::rgb(102, 166, 30),  // #66a61e
    Rgba::rgb(230, 171, 2),   // #e6ab02
    Rgba::rgb(166, 118, 29),  // #a6761d
    Rgba::rgb(102, 102, 102), // #666666
    Rgba::rgb(127, 201, 127), // #7fc97f
];

/// Pseudo-stations appearing only in the incident exports.
const PSEUDO_STATION_COLORS: [(&str, Rgba); 1] = [("1CH", Rgba::rgb(23, 190, 207))];

const STROKE_DARK: Rgba = Rgba::rgb(51, 51, 51); // #333
const STROKE_MARKER: Rgba = Rgba::rgb(34, 34, 34); // #222
const NEUTRAL_GRAY: Rgba = Rgba::rgb(153, 153, 153); // #999
const DEFAULT_MARKER_FILL: Rgba = Rgba::rgb(228, 26, 28); // #e41a1c

/// Palette color for a resolved station identity, or `None` when the id is
/// neither in the roster nor a known pseudo-station.
pub fn station_color(id: &StationId) -> Option<Rgba> {
    match id {
        StationId::Number(n) => STATION_IDS
            .iter()
            .position(|s| s == n)
            .map(|i| PALETTE[i % PALETTE.len()]),
        StationId::Token(t) => PSEUDO_STATION_COLORS
            .iter()
            .find(|(token, _)| token.eq_ignore_ascii_case(t))
            .map(|(_, c)| *c),
    }
}

fn is_excluded(id: &StationId) -> bool {
    matches!(id, StationId::Number(n) if *n == EXCLUDED_STATION)
}

/// Polygon style for a resolved station identity.
///
/// Priority order: the excluded station is suppressed entirely (`None`; the
/// feature must never reach a group); a missing id or the zero sentinel gets
/// the neutral unknown-owner style; everything else gets its palette color,
/// falling back to gray for ids outside the roster.
pub fn style_for_station(id: Option<&StationId>) -> Option<StyleSpec> {
    if id.is_some_and(is_excluded) {
        return None;
    }
    match id {
        None | Some(StationId::Number(0)) => Some(StyleSpec {
            stroke: NEUTRAL_GRAY,
            weight: 0.8,
            fill: NEUTRAL_GRAY,
            fill_opacity: 0.0,
        }),
        Some(id) => Some(StyleSpec {
            stroke: STROKE_DARK,
            weight: 0.6,
            fill: station_color(id).unwrap_or(NEUTRAL_GRAY),
            fill_opacity: 0.55,
        }),
    }
}

/// Marker style for a station point. Same palette lookup as the polygons,
/// with a red fallback so an unresolved point still stands out.
pub fn marker_style_for_station(id: Option<&StationId>) -> Option<MarkerStyle> {
    if id.is_some_and(is_excluded) {
        return None;
    }
    let fill = id.and_then(station_color).unwrap_or(DEFAULT_MARKER_FILL);
    Some(MarkerStyle {
        radius: 6.0,
        fill,
        stroke: STROKE_MARKER,
        weight: 1.0,
        fill_opacity: 0.9,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        let c = Rgba::from_hex("#8dd3c7").unwrap();
        assert_eq!(c, Rgba::rgb(141, 211, 199));
        assert_eq!(c.to_hex(), "#8dd3c7");
        assert!(Rgba::from_hex("#12345").is_none());
        assert!(Rgba::from_hex("zzzzzz").is_none());
    }

    #[test]
    fn roster_positions_are_stable() {
        // First roster slot, and the slot just past the 113 carve-out.
        assert_eq!(
            station_color(&StationId::number(101)),
            Some(Rgba::rgb(141, 211, 199))
        );
        assert_eq!(
            station_color(&StationId::number(114)),
            Some(Rgba::rgb(27, 158, 119))
        );
        assert_eq!(station_color(&StationId::number(999)), None);
    }

    #[test]
    fn pseudo_station_color() {
        assert_eq!(
            station_color(&StationId::token("1CH")),
            Some(Rgba::rgb(23, 190, 207))
        );
        assert_eq!(
            station_color(&StationId::token("1ch")),
            Some(Rgba::rgb(23, 190, 207))
        );
    }
}
