use std::path::PathBuf;
use std::time::Duration;

use catalog_core::GroupSpec;

use crate::FetchSettings;

pub const DEFAULT_BASE_URL: &str = "https://bloxfruitsvalues.com";
pub const DEFAULT_OUTPUT_PATH: &str = "blox_values.json";

/// Everything one run needs; passed in explicitly so tests can point it at a
/// stub server.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub base_url: String,
    pub page_limit: u32,
    /// Hard ceiling on pages requested per (group, rarity).
    pub max_pages: u32,
    /// Pause between pages of one listing.
    pub page_delay: Duration,
    /// Pause between rarity tiers of one group.
    pub rarity_delay: Duration,
    pub groups: Vec<GroupSpec>,
    pub output_path: PathBuf,
    pub fetch: FetchSettings,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_limit: 100,
            max_pages: 1000,
            page_delay: Duration::from_millis(250),
            rarity_delay: Duration::from_millis(250),
            groups: GroupSpec::defaults(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            fetch: FetchSettings::default(),
        }
    }
}

impl CatalogConfig {
    /// Defaults aimed at `base_url`, including the `Referer`/`Origin` headers.
    pub fn for_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            fetch: FetchSettings::for_site(&base_url),
            base_url,
            ..Self::default()
        }
    }
}
