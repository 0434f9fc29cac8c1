use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One upstream item record as received; field naming varies by source.
pub type RawItem = Value;

/// Uniform item record written to the snapshot.
///
/// All five keys are always serialized; absent optionals become `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalItem {
    pub name: String,
    pub value: i64,
    pub rarity: Option<String>,
    pub demand: Option<Value>,
    pub category: Option<String>,
}
