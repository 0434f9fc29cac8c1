use std::time::Duration;

use catalog_core::{decode_page, PaginationState, RawItem, ResponseShape};
use catalog_logging::{catalog_debug, catalog_warn};
use url::Url;

use crate::{CatalogConfig, FailureKind, FetchError, JsonSource};

/// Walks every page of one (group, rarity) listing.
pub struct Paginator<'a> {
    source: &'a dyn JsonSource,
    base_url: Url,
    page_limit: u32,
    max_pages: u32,
    page_delay: Duration,
}

impl<'a> Paginator<'a> {
    pub fn new(source: &'a dyn JsonSource, config: &CatalogConfig) -> Result<Self, FetchError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(FetchError::new(
                FailureKind::InvalidUrl,
                format!("{} cannot be used as a base url", config.base_url),
            ));
        }
        Ok(Self {
            source,
            base_url,
            page_limit: config.page_limit,
            max_pages: config.max_pages,
            page_delay: config.page_delay,
        })
    }

    /// `{base}/api/v1/items/{group}/{rarity}`, with each segment escaped.
    pub fn endpoint(&self, group: &str, rarity: &str) -> Url {
        let mut url = self.base_url.clone();
        url.set_query(None);
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["api", "v1", "items", group, rarity]);
        }
        url
    }

    /// Fetches pages until the source runs dry, a page carries no items, or
    /// the pagination metadata reports no further pages.
    pub async fn fetch_all(&self, group: &str, rarity: &str) -> Vec<RawItem> {
        let url = self.endpoint(group, rarity);
        let mut state = PaginationState::new();
        let mut out = Vec::new();

        loop {
            let query = [
                ("limit", self.page_limit.to_string()),
                ("page", state.page.to_string()),
            ];
            let Some(body) = self.source.get_json(url.as_str(), &query).await else {
                break;
            };
            let Some(page) = decode_page(&body) else {
                catalog_debug!("{}/{} page {}: no items", group, rarity, state.page);
                break;
            };
            catalog_debug!(
                "{}/{} page {}: {} items ({} response)",
                group,
                rarity,
                state.page,
                page.items.len(),
                ResponseShape::classify(&body).label()
            );
            out.extend(page.items);

            if !state.advance(&page.meta) {
                break;
            }
            if state.page > self.max_pages {
                catalog_warn!(
                    "{}/{}: stopping after {} pages, server still reports more",
                    group,
                    rarity,
                    self.max_pages
                );
                break;
            }
            tokio::time::sleep(self.page_delay).await;
        }
        out
    }
}
