//! Catalog engine: HTTP retrieval, pagination and snapshot persistence.
mod aggregate;
mod config;
mod fetch;
mod paginate;
mod persist;
mod retry;
mod types;

pub use aggregate::{collect_catalog, run, RunError, RunSummary};
pub use config::{CatalogConfig, DEFAULT_BASE_URL, DEFAULT_OUTPUT_PATH};
pub use fetch::{FetchSettings, JsonSource, ReqwestJsonClient};
pub use paginate::Paginator;
pub use persist::{ensure_output_dir, write_atomic, write_snapshot, PersistError};
pub use retry::RetryPolicy;
pub use types::{FailureKind, FetchError};
