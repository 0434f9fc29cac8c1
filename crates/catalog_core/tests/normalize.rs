use catalog_core::{normalize, CanonicalItem};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn name_of(raw: Value) -> Option<String> {
    normalize(&raw).map(|item| item.name)
}

fn value_of(raw: Value) -> i64 {
    normalize(&raw).expect("named item").value
}

#[test]
fn full_record_maps_every_field() {
    let raw = json!({
        "name": "  Dragon  ",
        "value": "3500000",
        "rarity": "Mythical",
        "demand": "10/10",
        "category": "Fruit",
        "ignored": [1, 2, 3]
    });

    assert_eq!(
        normalize(&raw),
        Some(CanonicalItem {
            name: "Dragon".to_string(),
            value: 3_500_000,
            rarity: Some("Mythical".to_string()),
            demand: Some(json!("10/10")),
            category: Some("Fruit".to_string()),
        })
    );
}

#[test]
fn nameless_items_are_dropped() {
    let cases = [
        json!({}),
        json!({"value": 10}),
        json!({"name": ""}),
        json!({"name": "   ", "title": "\t\n"}),
        json!({"name": null, "title": null}),
        json!({"name": 42}),
    ];
    for raw in cases {
        assert_eq!(normalize(&raw), None, "{raw} should be dropped");
    }
}

#[test]
fn non_object_items_are_dropped() {
    for raw in [json!("Dragon"), json!(7), json!(null), json!(["name"])] {
        assert_eq!(normalize(&raw), None);
    }
}

#[test]
fn name_falls_back_to_title() {
    let cases = [
        (json!({"title": "Leopard"}), Some("Leopard")),
        (json!({"name": "", "title": " Kitsune "}), Some("Kitsune")),
        (json!({"name": "  ", "title": "Dough"}), Some("Dough")),
        (json!({"name": "Buddha", "title": "ignored"}), Some("Buddha")),
    ];
    for (raw, expected) in cases {
        assert_eq!(name_of(raw), expected.map(str::to_string));
    }
}

#[test]
fn value_uses_first_coercible_field_in_priority_order() {
    let cases = [
        (json!({"name": "a", "value": 5, "pvalue": 6}), 5),
        (json!({"name": "a", "value": "n/a", "pvalue": "1200"}), 1200),
        (json!({"name": "a", "pvalue": "x", "maxValue": 900, "minValue": 100}), 900),
        (json!({"name": "a", "value": null, "minValue": "250"}), 250),
        (json!({"name": "a", "value": 12.9}), 12),
        (json!({"name": "a", "value": "  77 "}), 77),
        (json!({"name": "a", "value": 0, "pvalue": 8}), 0),
        (json!({"name": "a", "value": "4.5", "pvalue": "many"}), 0),
        (json!({"name": "a"}), 0),
    ];
    for (raw, expected) in cases {
        assert_eq!(value_of(raw.clone()), expected, "{raw}");
    }
}

#[test]
fn rarity_falls_back_to_tier() {
    let cases = [
        (json!({"name": "a", "rarity": "Epic", "tier": "Rare"}), Some("Epic")),
        (json!({"name": "a", "tier": "Rare"}), Some("Rare")),
        (json!({"name": "a", "rarity": "", "tier": "Common"}), Some("Common")),
        (json!({"name": "a"}), None),
    ];
    for (raw, expected) in cases {
        let item = normalize(&raw).unwrap();
        assert_eq!(item.rarity.as_deref(), expected);
    }
}

#[test]
fn demand_keeps_strings_and_numbers() {
    let cases = [
        (json!({"name": "a", "demand": "High"}), Some(json!("High"))),
        (json!({"name": "a", "demandScore": 8.5}), Some(json!(8.5))),
        (json!({"name": "a", "demand": 0, "popularity": 3}), Some(json!(3))),
        (json!({"name": "a", "demand": "", "demandScore": null, "popularity": "Low"}), Some(json!("Low"))),
        (json!({"name": "a", "demand": {"score": 1}}), None),
        (json!({"name": "a"}), None),
    ];
    for (raw, expected) in cases {
        let item = normalize(&raw).unwrap();
        assert_eq!(item.demand, expected);
    }
}

#[test]
fn category_falls_back_through_type_and_group() {
    let cases = [
        (json!({"name": "a", "category": "Fruit", "type": "x"}), Some("Fruit")),
        (json!({"name": "a", "type": "Gamepass", "group": "x"}), Some("Gamepass")),
        (json!({"name": "a", "group": "Limiteds"}), Some("Limiteds")),
        (json!({"name": "a", "category": 3}), None),
    ];
    for (raw, expected) in cases {
        let item = normalize(&raw).unwrap();
        assert_eq!(item.category.as_deref(), expected);
    }
}

#[test]
fn canonical_item_serializes_all_keys() {
    let item = normalize(&json!({"name": "Néon ☄"})).unwrap();
    let encoded = serde_json::to_value(&item).unwrap();
    assert_eq!(
        encoded,
        json!({
            "name": "Néon ☄",
            "value": 0,
            "rarity": null,
            "demand": null,
            "category": null
        })
    );
}
