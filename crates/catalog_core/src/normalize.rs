use serde_json::{Map, Value};

use crate::value::{coerce_int, truthy};
use crate::{CanonicalItem, RawItem};

/// Ordered synonym fields for one canonical field; the first field whose
/// value passes `extract` wins.
struct FieldRule<T: 'static> {
    keys: &'static [&'static str],
    extract: fn(&Value) -> Option<T>,
}

impl<T> FieldRule<T> {
    fn apply(&self, fields: &Map<String, Value>) -> Option<T> {
        self.keys
            .iter()
            .filter_map(|key| fields.get(*key))
            .find_map(self.extract)
    }
}

const NAME: FieldRule<String> = FieldRule {
    keys: &["name", "title"],
    extract: trimmed_string,
};

const VALUE: FieldRule<i64> = FieldRule {
    keys: &["value", "pvalue", "maxValue", "minValue"],
    extract: coerce_int,
};

const RARITY: FieldRule<String> = FieldRule {
    keys: &["rarity", "tier"],
    extract: non_empty_string,
};

const DEMAND: FieldRule<Value> = FieldRule {
    keys: &["demand", "demandScore", "popularity"],
    extract: scalar,
};

const CATEGORY: FieldRule<String> = FieldRule {
    keys: &["category", "type", "group"],
    extract: non_empty_string,
};

/// Maps one raw item onto the canonical record.
///
/// Returns `None` for non-object items and for items without a usable name.
pub fn normalize(raw: &RawItem) -> Option<CanonicalItem> {
    let fields = raw.as_object()?;
    let name = NAME.apply(fields)?;

    Some(CanonicalItem {
        name,
        value: VALUE.apply(fields).unwrap_or(0),
        rarity: RARITY.apply(fields),
        demand: DEMAND.apply(fields),
        category: CATEGORY.apply(fields),
    })
}

fn trimmed_string(value: &Value) -> Option<String> {
    let trimmed = value.as_str()?.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn non_empty_string(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
}

fn scalar(value: &Value) -> Option<Value> {
    match value {
        Value::String(_) | Value::Number(_) if truthy(value) => Some(value.clone()),
        _ => None,
    }
}
