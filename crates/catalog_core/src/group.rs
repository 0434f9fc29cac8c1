use std::fmt;

use serde::{Deserialize, Serialize};

/// Rarity tiers in fetch priority order.
pub const DEFAULT_RARITIES: [&str; 6] = [
    "Mythical",
    "Legendary",
    "Epic",
    "Rare",
    "Uncommon",
    "Common",
];

/// Output bucket an upstream group is collected into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Fruits,
    Limiteds,
    Gamepasses,
}

impl Bucket {
    /// Fixed order used for the derived `all` bucket.
    pub const ALL: [Bucket; 3] = [Bucket::Fruits, Bucket::Limiteds, Bucket::Gamepasses];

    pub fn key(self) -> &'static str {
        match self {
            Bucket::Fruits => "fruits",
            Bucket::Limiteds => "limiteds",
            Bucket::Gamepasses => "gamepasses",
        }
    }

    /// Upstream group path segment served into this bucket by default.
    pub fn default_group(self) -> &'static str {
        match self {
            Bucket::Fruits => "Bloxfruits",
            Bucket::Limiteds => "Limiteds",
            Bucket::Gamepasses => "Gamepasses",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One upstream group and the rarity tiers fetched for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSpec {
    pub bucket: Bucket,
    pub group: String,
    pub rarities: Vec<String>,
}

impl GroupSpec {
    pub fn new(bucket: Bucket, group: impl Into<String>, rarities: Vec<String>) -> Self {
        Self {
            bucket,
            group: group.into(),
            rarities,
        }
    }

    pub fn with_default_rarities(bucket: Bucket) -> Self {
        Self::new(
            bucket,
            bucket.default_group(),
            DEFAULT_RARITIES.iter().map(|r| r.to_string()).collect(),
        )
    }

    /// The built-in group set: one spec per bucket, in bucket order.
    pub fn defaults() -> Vec<GroupSpec> {
        Bucket::ALL
            .into_iter()
            .map(GroupSpec::with_default_rarities)
            .collect()
    }
}
