//! Optional RON configuration for the `blox_values` binary.
//!
//! Every field may be omitted; omitted fields keep the built-in defaults of
//! [`CatalogConfig`]. Example:
//!
//! ```ron
//! (
//!     base_url: "https://bloxfruitsvalues.com",
//!     page_limit: 100,
//!     cf_clearance: "<cookie value>",
//!     groups: [
//!         (bucket: fruits, group: "Bloxfruits", rarities: ["Mythical", "Legendary"]),
//!     ],
//! )
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use catalog_core::GroupSpec;
use catalog_engine::CatalogConfig;
use catalog_logging::catalog_info;
use ron::extensions::Extensions;
use serde::Deserialize;

pub const CONFIG_ENV: &str = "BLOX_VALUES_CONFIG";
pub const COOKIE_ENV: &str = "CF_CLEARANCE";
pub const DEFAULT_CONFIG_FILE: &str = "blox_values.ron";

const COOKIE_NAME: &str = "cf_clearance";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub base_url: Option<String>,
    pub page_limit: Option<u32>,
    pub max_pages: Option<u32>,
    pub output_path: Option<PathBuf>,
    pub connect_timeout_secs: Option<u64>,
    pub read_timeout_secs: Option<u64>,
    pub courtesy_delay_ms: Option<u64>,
    pub cf_clearance: Option<String>,
    pub groups: Option<Vec<GroupSpec>>,
}

impl ConfigFile {
    pub fn parse(text: &str) -> Result<Self> {
        let options = ron::Options::default().with_default_extension(Extensions::IMPLICIT_SOME);
        let file: ConfigFile = options.from_str(text)?;
        Ok(file)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("failed to parse config {}", path.display()))
    }

    /// Layers the file over the defaults. A cookie given in `cookie_override`
    /// wins over the one in the file.
    pub fn into_catalog_config(self, cookie_override: Option<String>) -> CatalogConfig {
        let mut config = match self.base_url {
            Some(base_url) => CatalogConfig::for_base_url(base_url),
            None => CatalogConfig::default(),
        };
        if let Some(limit) = self.page_limit {
            config.page_limit = limit;
        }
        if let Some(max_pages) = self.max_pages {
            config.max_pages = max_pages;
        }
        if let Some(path) = self.output_path {
            config.output_path = path;
        }
        if let Some(secs) = self.connect_timeout_secs {
            config.fetch.connect_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = self.read_timeout_secs {
            config.fetch.read_timeout = Duration::from_secs(secs);
        }
        if let Some(ms) = self.courtesy_delay_ms {
            config.page_delay = Duration::from_millis(ms);
            config.rarity_delay = Duration::from_millis(ms);
        }
        if let Some(groups) = self.groups {
            config.groups = groups;
        }
        if let Some(cookie) = cookie_override.or(self.cf_clearance) {
            config.fetch.set_cookie(COOKIE_NAME, cookie);
        }
        config
    }
}

/// Resolves the configuration the way the binary does: an explicit
/// `BLOX_VALUES_CONFIG` path must exist, otherwise `./blox_values.ron` is used
/// when present. `CF_CLEARANCE` overrides the cookie last.
pub fn load_from_env() -> Result<CatalogConfig> {
    let explicit = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
    let cookie = std::env::var(COOKIE_ENV).ok().filter(|value| !value.is_empty());
    load(explicit.as_deref(), Path::new(DEFAULT_CONFIG_FILE), cookie)
}

fn load(explicit: Option<&Path>, fallback: &Path, cookie: Option<String>) -> Result<CatalogConfig> {
    let file = match explicit {
        Some(path) if !path.is_file() => {
            bail!("config file {} does not exist", path.display())
        }
        Some(path) => Some(path),
        None => fallback.is_file().then_some(fallback),
    };

    let parsed = match file {
        Some(path) => {
            catalog_info!("loading config from {}", path.display());
            ConfigFile::load(path)?
        }
        None => ConfigFile::default(),
    };
    Ok(parsed.into_catalog_config(cookie))
}
