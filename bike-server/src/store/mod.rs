//! Primary document store adapters.
//!
//! The repository only sees the [`PrimaryStore`] capability trait: list all,
//! point read by key, create, upsert and predicate query. Keys are the
//! decimal form of the station number, which is also the partition key.

mod error;
mod http;
mod memory;

use futures::future::BoxFuture;

use crate::model::Station;
use crate::query::StationQuery;

pub use error::StoreError;
pub use http::{HttpDocumentStore, HttpStoreConfig};
pub use memory::InMemoryStore;

/// Capabilities of the primary station store.
///
/// Futures are boxed so the trait stays object safe and the repository can
/// hold any backend behind an `Arc<dyn PrimaryStore>`.
pub trait PrimaryStore: Send + Sync {
    /// Fetch every station.
    fn list_all(&self) -> BoxFuture<'_, Result<Vec<Station>, StoreError>>;

    /// Fetch one station. Not-found is `Ok(None)`.
    fn read_by_key<'a>(&'a self, key: &'a str)
    -> BoxFuture<'a, Result<Option<Station>, StoreError>>;

    /// Insert a new station. Fails if the key is already taken.
    fn create<'a>(&'a self, station: &'a Station) -> BoxFuture<'a, Result<(), StoreError>>;

    /// Insert or replace a station.
    fn upsert<'a>(&'a self, station: &'a Station) -> BoxFuture<'a, Result<(), StoreError>>;

    /// Fetch the stations passing the filters of `predicate`.
    ///
    /// The repository never calls this: its listings must come from
    /// [`list_all`](Self::list_all) so they can be cached for fallback. It is
    /// for callers that talk to the store directly, such as maintenance
    /// tooling, and skips the snapshot entirely.
    ///
    /// Sorting and pagination in `predicate` are not applied here. The
    /// default implementation filters the full listing in process.
    fn query<'a>(
        &'a self,
        predicate: &'a StationQuery,
    ) -> BoxFuture<'a, Result<Vec<Station>, StoreError>> {
        Box::pin(async move {
            let stations = self.list_all().await?;
            Ok(stations
                .into_iter()
                .filter(|s| predicate.matches(s))
                .collect())
        })
    }
}
