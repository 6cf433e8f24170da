//! Storage list: every pinned root enriched with its object stat

use futures_util::stream::{self, StreamExt, TryStreamExt};
use log::debug;

use super::client::RepositoryClient;
use super::types::PinEntry;
use crate::error::{RepoError, RepoResult};

/// Builds the consolidated pin table shown on the storage page.
///
/// All-or-nothing: a single failing `object/stat` fails the whole list and
/// the stats already fetched are dropped.
#[derive(Debug, Clone)]
pub struct StorageListAggregator {
    client: RepositoryClient,
    max_concurrent_stats: Option<usize>,
}

impl StorageListAggregator {
    pub fn new(client: RepositoryClient) -> Self {
        Self {
            client,
            max_concurrent_stats: None,
        }
    }

    /// Cap the number of in-flight stat requests. `None` issues them all at once.
    pub fn with_max_concurrent_stats(mut self, limit: Option<usize>) -> Self {
        self.max_concurrent_stats = limit;
        self
    }

    /// Non-indirect pins with their stats, in completion order.
    pub async fn storage_list(&self) -> RepoResult<Vec<PinEntry>> {
        let pins: Vec<PinEntry> = self
            .client
            .list_pins()
            .await?
            .into_iter()
            .filter(|pin| !pin.is_indirect())
            .collect();

        if pins.is_empty() {
            return Ok(Vec::new());
        }

        let width = self
            .max_concurrent_stats
            .filter(|limit| *limit > 0)
            .unwrap_or(pins.len());
        debug!(
            "storage list: fetching {} stats ({} at a time)",
            pins.len(),
            width
        );

        let client = &self.client;
        stream::iter(pins)
            .map(|mut pin| async move {
                match client.stat_object(&pin.hash).await {
                    Ok(stat) => {
                        pin.attach_stat(stat);
                        Ok(pin)
                    }
                    Err(source) => Err(RepoError::Aggregate {
                        hash: pin.hash,
                        source: Box::new(source),
                    }),
                }
            })
            .buffer_unordered(width)
            .try_collect()
            .await
    }
}
