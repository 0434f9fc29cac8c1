use serde_json::Value;

use crate::value::{coerce_int, truthy};

/// Pagination metadata decoded from a response.
///
/// Decoding is permissive: a missing or malformed object, or missing fields,
/// fall back to `hasMore = false, page = 1, totalPages = 1`, which reads as
/// "no more pages".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMeta {
    pub has_more: bool,
    pub page: i64,
    pub total_pages: i64,
}

impl Default for PageMeta {
    fn default() -> Self {
        Self {
            has_more: false,
            page: 1,
            total_pages: 1,
        }
    }
}

impl PageMeta {
    pub fn from_value(value: Option<&Value>) -> Self {
        let Some(fields) = value.and_then(Value::as_object) else {
            return Self::default();
        };
        let defaults = Self::default();
        Self {
            has_more: fields.get("hasMore").is_some_and(truthy),
            page: fields.get("page").and_then(coerce_int).unwrap_or(defaults.page),
            total_pages: fields
                .get("totalPages")
                .and_then(coerce_int)
                .unwrap_or(defaults.total_pages),
        }
    }

    /// An explicit `hasMore` flag wins; otherwise compare `page < totalPages`.
    pub fn has_more(&self) -> bool {
        self.has_more || self.page < self.total_pages
    }
}

/// Request cursor for one (group, rarity) walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    pub page: u32,
    pub has_more: bool,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            page: 1,
            has_more: true,
        }
    }
}

impl PaginationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the metadata of the page just fetched and moves to the next
    /// page if there is one. Returns whether another request should be made.
    pub fn advance(&mut self, meta: &PageMeta) -> bool {
        self.has_more = meta.has_more();
        if self.has_more {
            self.page = self.page.saturating_add(1);
        }
        self.has_more
    }
}
