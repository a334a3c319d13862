//! Case-insensitive, multi-candidate attribute lookup.
//!
//! Each upstream export names its station column differently (`Low_Hazard1`,
//! `Areas`, `STATION`, ...), and key casing is inconsistent between the
//! families. Resolution is a pure function over an attribute mapping and an
//! ordered candidate list, most-specific first; matching is case-insensitive
//! on keys only and values come back verbatim.

use crate::models::StationId;
use ahash::AHashMap;
use serde_json::{Map, Value};

/// Pseudo-station labels recognized in station-identity position.
const PSEUDO_STATIONS: [&str; 1] = ["1CH"];

/// Return the first candidate's value, comparing keys case-insensitively.
pub fn get_ci<'a>(attrs: &'a Map<String, Value>, candidates: &[&str]) -> Option<&'a Value> {
    let index: AHashMap<String, &str> = attrs
        .keys()
        .map(|k| (k.to_lowercase(), k.as_str()))
        .collect();
    for cand in candidates {
        if let Some(real) = index.get(&cand.to_lowercase()) {
            return attrs.get(*real);
        }
    }
    None
}

/// Coerce a raw attribute value into a station identity.
///
/// Numeric-looking strings (`/^\d+$/`) are coerced to integers, which
/// normalizes sources that encode station numbers as zero-padded strings.
/// Known pseudo-station labels are kept as tokens (canonical uppercase).
/// Anything else resolves to no identity.
pub fn station_id_from_value(v: &Value) -> Option<StationId> {
    match v {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(StationId::Number(i))
            } else {
                // Fractional station numbers do not exist in any export.
                None
            }
        }
        Value::String(s) => {
            let s = s.trim();
            if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
                return s.parse::<i64>().ok().map(StationId::Number);
            }
            PSEUDO_STATIONS
                .iter()
                .find(|p| p.eq_ignore_ascii_case(s))
                .map(|p| StationId::Token((*p).to_string()))
        }
        _ => None,
    }
}

/// Resolve a feature's owning station through the candidate list.
pub fn resolve_station_id(attrs: &Map<String, Value>, candidates: &[&str]) -> Option<StationId> {
    get_ci(attrs, candidates).and_then(station_id_from_value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn lookup_ignores_key_case() {
        let a = attrs(json!({"LOW_hazard1": "101", "Name": "HQ"}));
        assert_eq!(get_ci(&a, &["Low_Hazard1"]), Some(&json!("101")));
        assert_eq!(get_ci(&a, &["name"]), Some(&json!("HQ")));
        assert_eq!(get_ci(&a, &["missing"]), None);
    }

    #[test]
    fn candidate_order_is_most_specific_first() {
        let a = attrs(json!({"Areas": 7, "Low_Hazard1": 101}));
        let got = resolve_station_id(&a, &["Areas", "Low_Hazard1"]);
        assert_eq!(got, Some(StationId::number(7)));
    }

    #[test]
    fn zero_padded_strings_coerce_to_integers() {
        assert_eq!(
            station_id_from_value(&json!("0101")),
            Some(StationId::number(101))
        );
        assert_eq!(station_id_from_value(&json!("113")), Some(StationId::number(113)));
        assert_eq!(station_id_from_value(&json!(102)), Some(StationId::number(102)));
    }

    #[test]
    fn tokens_and_junk() {
        assert_eq!(
            station_id_from_value(&json!("1ch")),
            Some(StationId::token("1CH"))
        );
        assert_eq!(station_id_from_value(&json!("bad")), None);
        assert_eq!(station_id_from_value(&json!(null)), None);
        assert_eq!(station_id_from_value(&json!(101.5)), None);
    }
}
