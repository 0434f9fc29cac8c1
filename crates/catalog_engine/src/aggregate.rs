use std::path::PathBuf;

use catalog_core::{normalize, BucketCounts, Buckets, CatalogSnapshot};
use catalog_logging::catalog_info;
use thiserror::Error;

use crate::{write_snapshot, CatalogConfig, FetchError, JsonSource, Paginator, PersistError};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("invalid configuration: {0}")]
    Config(#[from] FetchError),
    #[error("failed to write snapshot: {0}")]
    Persist(#[from] PersistError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub counts: BucketCounts,
    pub output_path: PathBuf,
}

/// Fetches every configured (group, rarity) listing in order and collects the
/// normalized items into their buckets.
///
/// Fetch failures never abort the walk; a listing that fails contributes no
/// items. Only an unusable base URL is an error.
pub async fn collect_catalog(
    source: &dyn JsonSource,
    config: &CatalogConfig,
) -> Result<CatalogSnapshot, FetchError> {
    let paginator = Paginator::new(source, config)?;
    let mut buckets = Buckets::new();

    for spec in &config.groups {
        let mut total = 0;
        for (index, rarity) in spec.rarities.iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(config.rarity_delay).await;
            }
            let raw = paginator.fetch_all(&spec.group, rarity).await;
            catalog_info!("{}/{}: {} items", spec.group, rarity, raw.len());
            total += raw.len();
            buckets.extend(spec.bucket, raw.iter().filter_map(normalize));
        }
        catalog_info!("{}: {}", spec.bucket, total);
    }

    Ok(buckets.into_snapshot())
}

/// Collects the catalog and writes the snapshot to `config.output_path`.
pub async fn run(source: &dyn JsonSource, config: &CatalogConfig) -> Result<RunSummary, RunError> {
    let snapshot = collect_catalog(source, config).await?;
    let output_path = write_snapshot(&config.output_path, &snapshot)?;
    catalog_info!("wrote {}", output_path.display());
    Ok(RunSummary {
        counts: snapshot.counts(),
        output_path,
    })
}
