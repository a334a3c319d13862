use firemap_rs::legend::{Legend, LegendSection};

fn labels(legend: &Legend) -> Vec<String> {
    legend
        .sections()
        .iter()
        .map(|s| match s {
            LegendSection::StationKey { label, .. } => label.clone(),
            LegendSection::HeatRamp { label, .. } => label.clone(),
            LegendSection::Heading { label } => label.clone(),
        })
        .collect()
}

#[test]
fn ensure_is_idempotent_and_builds_the_station_key() {
    let mut legend = Legend::new();
    legend.ensure();
    let first = legend.sections().to_vec();
    legend.ensure();
    assert_eq!(legend.sections(), &first[..]);

    assert_eq!(first.len(), 1);
    match &first[0] {
        LegendSection::StationKey { entries, .. } => assert_eq!(entries.len(), 21),
        other => panic!("expected station key, got {:?}", other),
    }
}

#[test]
fn section_order_is_fixed_regardless_of_event_order() {
    let mut legend = Legend::new();
    legend.add_key("bmed");
    legend.add_key("existing");
    legend.add_key("spread");
    assert_eq!(
        labels(&legend),
        vec![
            "Fire Stations",
            "Incidents – Spread",
            "Existing Service Areas",
            "Backups – Medium",
        ]
    );

    legend.remove_key("existing");
    assert_eq!(
        labels(&legend),
        vec!["Fire Stations", "Incidents – Spread", "Backups – Medium"]
    );
}

#[test]
fn heat_section_requires_active_and_finite_bounds() {
    let mut legend = Legend::new();
    legend.set_heat_legend(true, Some(3.0), Some(9.0));
    let heat = legend
        .sections()
        .iter()
        .find(|s| matches!(s, LegendSection::HeatRamp { .. }));
    match heat {
        Some(LegendSection::HeatRamp { min, max, .. }) => {
            assert_eq!((*min, *max), (3.0, 9.0));
        }
        other => panic!("expected heat ramp, got {:?}", other),
    }

    legend.set_heat_legend(true, Some(f64::NAN), Some(9.0));
    assert!(
        !labels(&legend).iter().any(|l| l.contains("Heat")),
        "non-finite bound must hide the ramp"
    );

    legend.set_heat_legend(false, None, None);
    assert!(!labels(&legend).iter().any(|l| l.contains("Heat")));
}

#[test]
fn set_section_visible_mirrors_add_and_remove() {
    let mut legend = Legend::new();
    legend.set_section_visible("spread", true);
    assert!(legend.has_key("spread"));
    legend.set_section_visible("spread", false);
    assert!(!legend.has_key("spread"));
}

#[test]
fn collapse_toggle_is_a_no_op_on_the_same_value() {
    let mut legend = Legend::new();
    assert!(legend.is_collapsed());
    legend.set_collapsed(true);
    assert!(legend.is_collapsed());
    legend.set_collapsed(false);
    assert!(!legend.is_collapsed());
}
