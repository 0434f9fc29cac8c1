use catalog_core::{decode_page, PageMeta, ResponseShape};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn items(count: usize) -> Vec<Value> {
    (0..count).map(|i| json!({"name": format!("item-{i}")})).collect()
}

#[test]
fn bare_list_has_no_more_pages() {
    let body = Value::Array(items(3));
    let page = decode_page(&body).unwrap();
    assert_eq!(page.items.len(), 3);
    assert_eq!(page.meta, PageMeta::default());
    assert!(!page.meta.has_more());
    assert_eq!(ResponseShape::classify(&body).label(), "bare");
}

#[test]
fn wrapped_list_uses_top_level_pagination() {
    let body = json!({"items": items(2), "pagination": {"page": 1, "totalPages": 5}});
    let page = decode_page(&body).unwrap();
    assert_eq!(page.items.len(), 2);
    assert!(page.meta.has_more());
    assert_eq!(ResponseShape::classify(&body).label(), "wrapped");
}

#[test]
fn nested_container_yields_inner_list_and_single_page() {
    let body = json!({
        "items": {
            "items": items(4),
            "pagination": {"page": 1, "totalPages": 1}
        }
    });
    let page = decode_page(&body).unwrap();
    assert_eq!(page.items, items(4));
    assert!(!page.meta.has_more());
    assert_eq!(ResponseShape::classify(&body).label(), "nested");
}

#[test]
fn nested_container_falls_back_to_docs() {
    let body = json!({"items": {"docs": items(2), "pagination": {"hasMore": true}}});
    let page = decode_page(&body).unwrap();
    assert_eq!(page.items.len(), 2);
    assert!(page.meta.has_more());

    let empty_items = json!({"items": {"items": [], "docs": items(1)}});
    assert_eq!(decode_page(&empty_items).unwrap().items.len(), 1);
}

#[test]
fn top_level_pagination_wins_over_nested() {
    let body = json!({
        "items": {"items": items(1), "pagination": {"page": 1, "totalPages": 9}},
        "pagination": {"page": 2, "totalPages": 2}
    });
    assert!(!decode_page(&body).unwrap().meta.has_more());

    let empty_outer = json!({
        "items": {"items": items(1), "pagination": {"page": 1, "totalPages": 9}},
        "pagination": {}
    });
    assert!(decode_page(&empty_outer).unwrap().meta.has_more());
}

#[test]
fn empty_or_missing_lists_stop_the_walk() {
    let cases = [
        json!(null),
        json!([]),
        json!({}),
        json!(""),
        json!(false),
        json!({"items": []}),
        json!({"items": null}),
        json!({"items": "none"}),
        json!({"data": items(3)}),
        json!({"items": {"pagination": {"hasMore": true}}}),
        json!({"items": {"items": [], "docs": []}}),
        json!("plain text"),
    ];
    for body in cases {
        assert_eq!(decode_page(&body), None, "{body} should stop");
    }
}

#[test]
fn malformed_pagination_terminates() {
    let body = json!({"items": items(1), "pagination": "next"});
    assert!(!decode_page(&body).unwrap().meta.has_more());

    let body = json!({"items": items(1), "pagination": {"hasMore": null, "page": "?"}});
    assert!(!decode_page(&body).unwrap().meta.has_more());
}
