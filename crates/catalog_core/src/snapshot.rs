use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Bucket, CanonicalItem};

/// Per-bucket accumulator for one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Buckets {
    fruits: Vec<CanonicalItem>,
    limiteds: Vec<CanonicalItem>,
    gamepasses: Vec<CanonicalItem>,
}

impl Buckets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bucket: Bucket, item: CanonicalItem) {
        self.slot_mut(bucket).push(item);
    }

    pub fn extend(&mut self, bucket: Bucket, items: impl IntoIterator<Item = CanonicalItem>) {
        self.slot_mut(bucket).extend(items);
    }

    pub fn get(&self, bucket: Bucket) -> &[CanonicalItem] {
        match bucket {
            Bucket::Fruits => &self.fruits,
            Bucket::Limiteds => &self.limiteds,
            Bucket::Gamepasses => &self.gamepasses,
        }
    }

    pub fn counts(&self) -> BucketCounts {
        BucketCounts {
            fruits: self.fruits.len(),
            limiteds: self.limiteds.len(),
            gamepasses: self.gamepasses.len(),
        }
    }

    /// Freezes the buckets and derives `all` as fruits, then limiteds, then
    /// gamepasses, each in insertion order.
    pub fn into_snapshot(self) -> CatalogSnapshot {
        let all = Bucket::ALL
            .into_iter()
            .flat_map(|bucket| self.get(bucket).iter().cloned())
            .collect();
        CatalogSnapshot {
            fruits: self.fruits,
            limiteds: self.limiteds,
            gamepasses: self.gamepasses,
            all,
        }
    }

    fn slot_mut(&mut self, bucket: Bucket) -> &mut Vec<CanonicalItem> {
        match bucket {
            Bucket::Fruits => &mut self.fruits,
            Bucket::Limiteds => &mut self.limiteds,
            Bucket::Gamepasses => &mut self.gamepasses,
        }
    }
}

/// The persisted document. Field order is the key order on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub fruits: Vec<CanonicalItem>,
    pub limiteds: Vec<CanonicalItem>,
    pub gamepasses: Vec<CanonicalItem>,
    pub all: Vec<CanonicalItem>,
}

impl CatalogSnapshot {
    pub fn counts(&self) -> BucketCounts {
        BucketCounts {
            fruits: self.fruits.len(),
            limiteds: self.limiteds.len(),
            gamepasses: self.gamepasses.len(),
        }
    }

    /// Two-space indented JSON; non-ASCII text is written as-is.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Bucket sizes, excluding the derived `all`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BucketCounts {
    pub fruits: usize,
    pub limiteds: usize,
    pub gamepasses: usize,
}

impl fmt::Display for BucketCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "fruits: {}, limiteds: {}, gamepasses: {}",
            self.fruits, self.limiteds, self.gamepasses
        )
    }
}
