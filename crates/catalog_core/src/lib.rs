//! Catalog core: pure item model, response decoding and bucket accounting.
mod group;
mod item;
mod normalize;
mod pagination;
mod shape;
mod snapshot;
mod value;

pub use group::{Bucket, GroupSpec, DEFAULT_RARITIES};
pub use item::{CanonicalItem, RawItem};
pub use normalize::normalize;
pub use pagination::{PageMeta, PaginationState};
pub use shape::{decode_page, ItemPage, ResponseShape};
pub use snapshot::{BucketCounts, Buckets, CatalogSnapshot};
pub use value::{coerce_int, truthy};
