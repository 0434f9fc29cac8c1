use serde_json::{Map, Value};

use crate::value::truthy;
use crate::{PageMeta, RawItem};

/// Layout of one page response, ordered by nesting precedence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResponseShape<'a> {
    /// `{"items": {"items" | "docs": [...], "pagination": {...}}}`
    Nested {
        container: &'a Map<String, Value>,
        outer_pagination: Option<&'a Value>,
    },
    /// `{"items": [...], "pagination": {...}}`
    Wrapped {
        items: Option<&'a Value>,
        pagination: Option<&'a Value>,
    },
    /// `[...]`
    Bare(&'a Value),
}

impl<'a> ResponseShape<'a> {
    pub fn classify(body: &'a Value) -> Self {
        match body {
            Value::Object(fields) => {
                let pagination = fields.get("pagination");
                match fields.get("items") {
                    Some(Value::Object(container)) => Self::Nested {
                        container,
                        outer_pagination: pagination,
                    },
                    items => Self::Wrapped { items, pagination },
                }
            }
            other => Self::Bare(other),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Nested { .. } => "nested",
            Self::Wrapped { .. } => "wrapped",
            Self::Bare(_) => "bare",
        }
    }

    /// The item list, if the shape carries a non-empty one.
    ///
    /// For nested containers `items` is used unless it is missing or falsy,
    /// in which case `docs` is tried.
    pub fn items(&self) -> Option<&'a [Value]> {
        let candidate = match *self {
            Self::Nested { container, .. } => container
                .get("items")
                .filter(|items| truthy(items))
                .or_else(|| container.get("docs")),
            Self::Wrapped { items, .. } => items,
            Self::Bare(body) => Some(body),
        };
        candidate
            .and_then(Value::as_array)
            .filter(|items| !items.is_empty())
            .map(Vec::as_slice)
    }

    /// Top-level pagination wins when it is truthy; nested containers fall
    /// back to their own `pagination` object.
    pub fn pagination(&self) -> PageMeta {
        let source = match *self {
            Self::Nested {
                container,
                outer_pagination,
            } => outer_pagination
                .filter(|pagination| truthy(pagination))
                .or_else(|| container.get("pagination")),
            Self::Wrapped { pagination, .. } => pagination,
            Self::Bare(_) => None,
        };
        PageMeta::from_value(source)
    }
}

/// Items and metadata extracted from one page response.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemPage {
    pub items: Vec<RawItem>,
    pub meta: PageMeta,
}

/// Decodes one page response. `None` means the walk should stop: the body is
/// falsy or carries no non-empty item list.
pub fn decode_page(body: &Value) -> Option<ItemPage> {
    if !truthy(body) {
        return None;
    }
    let shape = ResponseShape::classify(body);
    let items = shape.items()?.to_vec();
    Some(ItemPage {
        items,
        meta: shape.pagination(),
    })
}
