use firemap_rs::layers::build_service_area_layer;
use firemap_rs::models::StationId;
use firemap_rs::normalize::normalize_document;
use firemap_rs::registry::{FilterOp, GroupId, MapContext};
use serde_json::json;

fn square(cx: f64, cy: f64) -> serde_json::Value {
    json!([[
        [cx, cy],
        [cx + 1.0, cy],
        [cx + 1.0, cy + 1.0],
        [cx, cy]
    ]])
}

/// Two-station service-area layer, built through the real pipeline.
fn fixture() -> (MapContext, GroupId) {
    let doc = json!({
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"Low_Hazard1": "101"},
                "geometry": {"type": "Polygon", "coordinates": square(0.0, 0.0)}
            },
            {
                "type": "Feature",
                "properties": {"Low_Hazard1": "102"},
                "geometry": {"type": "Polygon", "coordinates": square(2.0, 2.0)}
            }
        ]
    });
    let set = normalize_document(&doc).unwrap();
    let mut ctx = MapContext::new();
    let group = build_service_area_layer(&mut ctx, &set, "existing", "Existing Service Areas", &["Low_Hazard1"]);
    (ctx, group)
}

#[test]
fn apply_filter_is_idempotent() {
    let (mut ctx, group) = fixture();
    ctx.show_group(group);
    let first = ctx.registry.apply_filter();
    assert!(first.is_empty(), "shown group already reconciled: {first:?}");
    let second = ctx.registry.apply_filter();
    assert!(second.is_empty());
}

#[test]
fn deselecting_a_station_detaches_only_its_features() {
    let (mut ctx, group) = fixture();
    ctx.show_group(group);

    let ops = ctx.registry.deselect_station(&StationId::number(101));
    assert_eq!(ops.len(), 1);
    assert!(matches!(ops[0], FilterOp::Detach(fr) if fr.index == 0));
    assert!(!ctx.registry.group(group).is_attached(0));
    assert!(ctx.registry.group(group).is_attached(1));

    let ops = ctx.registry.select_station(StationId::number(101));
    assert_eq!(ops.len(), 1);
    assert!(matches!(ops[0], FilterOp::Attach(fr) if fr.index == 0));
    assert!(ctx.registry.group(group).is_attached(0));
}

#[test]
fn bulk_selection_reconciles_every_entry() {
    let (mut ctx, group) = fixture();
    ctx.show_group(group);

    let ops = ctx.registry.select_none();
    assert_eq!(ops.len(), 2);
    assert!(ops.iter().all(|op| matches!(op, FilterOp::Detach(_))));

    let ops = ctx.registry.select_all();
    assert_eq!(ops.len(), 2);
    assert!(ops.iter().all(|op| matches!(op, FilterOp::Attach(_))));
}

#[test]
fn hidden_groups_are_left_untouched_until_shown() {
    let (mut ctx, group) = fixture();
    // Never shown: selection changes must not disturb its attachment.
    let ops = ctx.registry.deselect_station(&StationId::number(101));
    assert!(ops.is_empty());
    assert!(ctx.registry.group(group).is_attached(0));

    // Showing reconciles against the current selection immediately.
    let ops = ctx.show_group(group);
    assert_eq!(ops.len(), 1);
    assert!(matches!(ops[0], FilterOp::Detach(fr) if fr.index == 0));
    assert!(!ctx.registry.group(group).is_attached(0));
}

#[test]
fn hiding_keeps_the_last_attachment_state() {
    let (mut ctx, group) = fixture();
    ctx.show_group(group);
    ctx.registry.deselect_station(&StationId::number(101));
    assert!(!ctx.registry.group(group).is_attached(0));

    ctx.hide_group(group);
    // Selection restored while hidden: the hidden group stays stale...
    ctx.registry.select_station(StationId::number(101));
    assert!(!ctx.registry.group(group).is_attached(0));

    // ...and re-showing starts from the last explicit state, then reconciles.
    let ops = ctx.show_group(group);
    assert_eq!(ops.len(), 1);
    assert!(ctx.registry.group(group).is_attached(0));
}
