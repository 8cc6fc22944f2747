//! In-process station store.
//!
//! Used when no document store URL is configured, and by tests. The store
//! can be taken offline to simulate an outage of the real backend.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::future::BoxFuture;
use tokio::sync::RwLock;

use crate::model::Station;
use crate::query::StationQuery;

use super::PrimaryStore;
use super::error::StoreError;

/// Station store held in memory, ordered by station number.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    stations: Arc<RwLock<BTreeMap<u32, Station>>>,
    offline: Arc<AtomicBool>,
}

impl InMemoryStore {
    /// Create a store holding `stations`. Later duplicates replace earlier ones.
    pub fn new(stations: impl IntoIterator<Item = Station>) -> Self {
        let map = stations.into_iter().map(|s| (s.number, s)).collect();
        Self {
            stations: Arc::new(RwLock::new(map)),
            offline: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Simulate the store going down (`false`) or coming back (`true`).
    pub fn set_online(&self, online: bool) {
        self.offline.store(!online, Ordering::SeqCst);
    }

    /// Number of stored stations, regardless of availability.
    pub async fn len(&self) -> usize {
        self.stations.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.stations.read().await.is_empty()
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable {
                message: "in-memory store is offline".to_string(),
            });
        }
        Ok(())
    }
}

impl PrimaryStore for InMemoryStore {
    fn list_all(&self) -> BoxFuture<'_, Result<Vec<Station>, StoreError>> {
        Box::pin(async move {
            self.check_online()?;
            Ok(self.stations.read().await.values().cloned().collect())
        })
    }

    fn read_by_key<'a>(
        &'a self,
        key: &'a str,
    ) -> BoxFuture<'a, Result<Option<Station>, StoreError>> {
        Box::pin(async move {
            self.check_online()?;
            let Ok(number) = key.parse::<u32>() else {
                return Ok(None);
            };
            Ok(self.stations.read().await.get(&number).cloned())
        })
    }

    fn create<'a>(&'a self, station: &'a Station) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            self.check_online()?;
            let mut stations = self.stations.write().await;
            if stations.contains_key(&station.number) {
                return Err(StoreError::Conflict { key: station.key() });
            }
            stations.insert(station.number, station.clone());
            Ok(())
        })
    }

    fn upsert<'a>(&'a self, station: &'a Station) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            self.check_online()?;
            self.stations
                .write()
                .await
                .insert(station.number, station.clone());
            Ok(())
        })
    }

    /// Filters under the read lock, cloning only the matches.
    fn query<'a>(
        &'a self,
        predicate: &'a StationQuery,
    ) -> BoxFuture<'a, Result<Vec<Station>, StoreError>> {
        Box::pin(async move {
            self.check_online()?;
            Ok(self
                .stations
                .read()
                .await
                .values()
                .filter(|s| predicate.matches(s))
                .cloned()
                .collect())
        })
    }
}
