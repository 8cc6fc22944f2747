//! Resilient station repository.
//!
//! Presents one logical station collection over two backing stores. Bulk
//! reads go to the primary store until it fails or comes back empty once;
//! from then on the repository serves its cached collection (loaded from
//! the snapshot file if nothing is cached) for the rest of its lifetime.
//! There is no re-probe of the primary for bulk reads.
//!
//! Point reads and writes always go to the primary. Every successful write
//! is mirrored into the snapshot file.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::model::Station;
use crate::query::{StationQuery, Summary, run_query, summarize};
use crate::snapshot::{SnapshotError, SnapshotStore};
use crate::store::{PrimaryStore, StoreError};

/// Page number used when a query does not specify one.
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when a query does not specify one.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// A page of query results and the size of the full filtered set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub data: Vec<Station>,
    pub total: usize,
    pub page: i64,
    #[serde(rename = "pageSize")]
    pub page_size: i64,
}

/// The primary write succeeded but the snapshot could not be updated.
#[derive(Debug, thiserror::Error)]
#[error("station stored, but snapshot write-through failed: {0}")]
pub struct PersistenceWarning(#[from] pub SnapshotError);

/// Result of a successful write.
#[derive(Debug)]
pub struct WriteReport {
    /// The station as stored in the primary.
    pub station: Station,
    /// Set when the snapshot write-through failed.
    pub warning: Option<PersistenceWarning>,
}

/// Result of an update.
#[derive(Debug)]
pub enum UpdateOutcome {
    Updated(WriteReport),
    NotFound,
}

/// Counts from seeding the primary store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub seeded: usize,
    pub failed: usize,
}

/// Availability flag and cached collection.
///
/// The collection is replaced wholesale, never edited in place, so a
/// reader holding an `Arc` always sees complete station records.
struct CacheState {
    primary_available: bool,
    cached: Option<Arc<Vec<Station>>>,
    /// Bumped on every write-through. A primary listing started under an
    /// older generation must not replace the cache.
    generation: u64,
}

/// Station repository with snapshot fallback and write-through.
pub struct StationRepository {
    primary: Arc<dyn PrimaryStore>,
    snapshot: SnapshotStore,
    state: RwLock<CacheState>,
    /// Serialises read-merge-save of the snapshot.
    snapshot_writes: Mutex<()>,
}

impl StationRepository {
    pub fn new(primary: Arc<dyn PrimaryStore>, snapshot: SnapshotStore) -> Self {
        Self {
            primary,
            snapshot,
            state: RwLock::new(CacheState {
                primary_available: true,
                cached: None,
                generation: 0,
            }),
            snapshot_writes: Mutex::new(()),
        }
    }

    /// Whether bulk reads still go to the primary store.
    pub async fn is_primary_available(&self) -> bool {
        self.state.read().await.primary_available
    }

    /// Get the whole station collection.
    ///
    /// Never fails: primary failures degrade the repository to its cache.
    pub async fn fetch_all(&self) -> Arc<Vec<Station>> {
        let started_at = {
            let state = self.state.read().await;
            state.primary_available.then_some(state.generation)
        };

        if let Some(generation) = started_at {
            match self.primary.list_all().await {
                Ok(stations) if !stations.is_empty() => {
                    let stations = Arc::new(stations);
                    let mut state = self.state.write().await;
                    if state.generation == generation {
                        state.cached = Some(stations.clone());
                    } else {
                        debug!("listing overtaken by a write, keeping cached collection");
                    }
                    return stations;
                }
                Ok(_) => self.degrade("primary store returned no stations").await,
                Err(e) => self.degrade(&e.to_string()).await,
            }
        }

        self.cached_or_snapshot().await
    }

    async fn degrade(&self, reason: &str) {
        let mut state = self.state.write().await;
        if state.primary_available {
            state.primary_available = false;
            warn!(reason, "primary store unavailable, serving snapshot from now on");
        }
    }

    async fn cached_or_snapshot(&self) -> Arc<Vec<Station>> {
        if let Some(cached) = &self.state.read().await.cached {
            return cached.clone();
        }

        let mut state = self.state.write().await;
        if let Some(cached) = &state.cached {
            return cached.clone();
        }

        let loaded = Arc::new(self.snapshot.load_off_runtime().await);
        info!(
            path = %self.snapshot.path().display(),
            count = loaded.len(),
            "loaded stations from snapshot"
        );
        state.cached = Some(loaded.clone());
        loaded
    }

    /// Read one station from the primary store.
    ///
    /// Point reads ignore the fallback state.
    pub async fn get_by_key(&self, number: u32) -> Result<Option<Station>, StoreError> {
        self.primary.read_by_key(&number.to_string()).await
    }

    /// Create a station in the primary store, then update the snapshot.
    pub async fn create(&self, station: Station) -> Result<WriteReport, StoreError> {
        self.primary.create(&station).await?;
        info!(number = station.number, "created station");

        let warning = self.write_through(&station).await;
        Ok(WriteReport { station, warning })
    }

    /// Overwrite the mutable fields of station `number`.
    ///
    /// Returns [`UpdateOutcome::NotFound`] without touching either store
    /// when the station does not exist.
    pub async fn update(
        &self,
        number: u32,
        updated: &Station,
    ) -> Result<UpdateOutcome, StoreError> {
        let Some(mut existing) = self.get_by_key(number).await? else {
            return Ok(UpdateOutcome::NotFound);
        };

        existing.apply_update(updated);
        self.primary.upsert(&existing).await?;

        let warning = self.write_through(&existing).await;
        Ok(UpdateOutcome::Updated(WriteReport {
            station: existing,
            warning,
        }))
    }

    /// Mirror a written station into the cache and the snapshot file.
    ///
    /// The collection is re-derived through [`fetch_all`](Self::fetch_all)
    /// and the written record merged in, so the snapshot also reflects the
    /// write while the repository is serving from its cache.
    async fn write_through(&self, written: &Station) -> Option<PersistenceWarning> {
        let _guard = self.snapshot_writes.lock().await;

        let current = self.fetch_all().await;
        let mut stations = Vec::clone(&current);
        match stations.iter_mut().find(|s| s.number == written.number) {
            Some(slot) => *slot = written.clone(),
            None => stations.push(written.clone()),
        }

        let stations = Arc::new(stations);
        {
            let mut state = self.state.write().await;
            state.generation = state.generation.wrapping_add(1);
            state.cached = Some(stations.clone());
        }

        match self.snapshot.save_off_runtime(stations).await {
            Ok(()) => None,
            Err(e) => {
                warn!(number = written.number, error = %e, "snapshot write-through failed");
                Some(PersistenceWarning(e))
            }
        }
    }

    /// Network-wide totals over the current collection.
    pub async fn summary(&self) -> Summary {
        summarize(&self.fetch_all().await)
    }

    /// Filter, sort and paginate the current collection.
    ///
    /// A missing page defaults to [`DEFAULT_PAGE`] and a missing page size
    /// to [`DEFAULT_PAGE_SIZE`].
    pub async fn query(&self, query: &StationQuery) -> Page {
        let page = query.page.unwrap_or(DEFAULT_PAGE);
        let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE);

        let query = StationQuery {
            page: Some(page),
            page_size: Some(page_size),
            ..query.clone()
        };

        let stations = self.fetch_all().await;
        let result = run_query(&stations, &query);

        Page {
            data: result.stations,
            total: result.total,
            page,
            page_size,
        }
    }

    /// Upsert the snapshot's stations into the primary store.
    ///
    /// Each station is written independently; failures are logged and
    /// counted but do not stop the run.
    pub async fn seed_from_snapshot(&self) -> SeedReport {
        let stations = self.snapshot.load_off_runtime().await;
        let mut report = SeedReport::default();

        for station in &stations {
            match self.primary.upsert(station).await {
                Ok(()) => report.seeded += 1,
                Err(e) => {
                    warn!(number = station.number, error = %e, "failed to seed station");
                    report.failed += 1;
                }
            }
        }

        info!(
            seeded = report.seeded,
            failed = report.failed,
            "seeded primary store from snapshot"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::station;
    use crate::snapshot::SnapshotConfig;
    use crate::store::InMemoryStore;
    use futures::future::BoxFuture;
    use std::path::Path;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::sync::Notify;
    use tempfile::{TempDir, tempdir};

    fn abc() -> Vec<Station> {
        vec![
            station(1, "A", 10, 20, "OPEN"),
            station(2, "B", 5, 15, "CLOSED"),
            station(3, "C", 15, 25, "OPEN"),
        ]
    }

    fn numbers(stations: &[Station]) -> Vec<u32> {
        stations.iter().map(|s| s.number).collect()
    }

    fn snapshot_at(path: &Path) -> SnapshotStore {
        SnapshotStore::new(SnapshotConfig::new(path))
    }

    struct Fixture {
        dir: TempDir,
        store: InMemoryStore,
        repo: StationRepository,
    }

    impl Fixture {
        fn new(primary: Vec<Station>, snapshot: Vec<Station>) -> Self {
            let dir = tempdir().unwrap();
            let snap = snapshot_at(&dir.path().join("stations.json"));
            if !snapshot.is_empty() {
                snap.save(&snapshot).unwrap();
            }
            let store = InMemoryStore::new(primary);
            let repo = StationRepository::new(Arc::new(store.clone()), snap);
            Self { dir, store, repo }
        }

        fn snapshot(&self) -> Vec<Station> {
            snapshot_at(&self.dir.path().join("stations.json")).load()
        }
    }

    /// Store whose bulk listing always fails while point operations work.
    struct BrokenListing(InMemoryStore);

    impl PrimaryStore for BrokenListing {
        fn list_all(&self) -> BoxFuture<'_, Result<Vec<Station>, StoreError>> {
            Box::pin(async {
                Err(StoreError::Unavailable {
                    message: "listing down".to_string(),
                })
            })
        }

        fn read_by_key<'a>(
            &'a self,
            key: &'a str,
        ) -> BoxFuture<'a, Result<Option<Station>, StoreError>> {
            self.0.read_by_key(key)
        }

        fn create<'a>(&'a self, station: &'a Station) -> BoxFuture<'a, Result<(), StoreError>> {
            self.0.create(station)
        }

        fn upsert<'a>(&'a self, station: &'a Station) -> BoxFuture<'a, Result<(), StoreError>> {
            self.0.upsert(station)
        }
    }

    /// Store that can hold one listing open after reading it, and can be
    /// switched to failing listings.
    struct GatedListing {
        inner: InMemoryStore,
        hold_next: AtomicBool,
        fail: AtomicBool,
        listed: Notify,
        release: Notify,
    }

    impl GatedListing {
        fn new(stations: Vec<Station>) -> Self {
            Self {
                inner: InMemoryStore::new(stations),
                hold_next: AtomicBool::new(false),
                fail: AtomicBool::new(false),
                listed: Notify::new(),
                release: Notify::new(),
            }
        }
    }

    impl PrimaryStore for GatedListing {
        fn list_all(&self) -> BoxFuture<'_, Result<Vec<Station>, StoreError>> {
            Box::pin(async move {
                if self.fail.load(Ordering::SeqCst) {
                    return Err(StoreError::Unavailable {
                        message: "listing down".to_string(),
                    });
                }
                let stations = self.inner.list_all().await?;
                if self.hold_next.swap(false, Ordering::SeqCst) {
                    self.listed.notify_one();
                    self.release.notified().await;
                }
                Ok(stations)
            })
        }

        fn read_by_key<'a>(
            &'a self,
            key: &'a str,
        ) -> BoxFuture<'a, Result<Option<Station>, StoreError>> {
            self.inner.read_by_key(key)
        }

        fn create<'a>(&'a self, station: &'a Station) -> BoxFuture<'a, Result<(), StoreError>> {
            self.inner.create(station)
        }

        fn upsert<'a>(&'a self, station: &'a Station) -> BoxFuture<'a, Result<(), StoreError>> {
            self.inner.upsert(station)
        }
    }

    #[tokio::test]
    async fn fetch_all_prefers_primary() {
        let fx = Fixture::new(abc(), vec![station(9, "Snap", 1, 2, "OPEN")]);
        assert_eq!(numbers(&fx.repo.fetch_all().await), vec![1, 2, 3]);
        assert!(fx.repo.is_primary_available().await);
    }

    #[tokio::test]
    async fn primary_failure_falls_back_to_snapshot() {
        let fx = Fixture::new(abc(), vec![station(9, "Snap", 1, 2, "OPEN")]);
        fx.store.set_online(false);

        assert_eq!(numbers(&fx.repo.fetch_all().await), vec![9]);
        assert!(!fx.repo.is_primary_available().await);
    }

    #[tokio::test]
    async fn empty_primary_falls_back_to_snapshot() {
        let fx = Fixture::new(Vec::new(), vec![station(9, "Snap", 1, 2, "OPEN")]);
        assert_eq!(numbers(&fx.repo.fetch_all().await), vec![9]);
        assert!(!fx.repo.is_primary_available().await);
    }

    #[tokio::test]
    async fn missing_snapshot_after_failure_is_empty() {
        let fx = Fixture::new(abc(), Vec::new());
        fx.store.set_online(false);
        assert!(fx.repo.fetch_all().await.is_empty());
    }

    #[tokio::test]
    async fn degrade_is_permanent() {
        let fx = Fixture::new(abc(), vec![station(9, "Snap", 1, 2, "OPEN")]);
        fx.store.set_online(false);
        assert_eq!(numbers(&fx.repo.fetch_all().await), vec![9]);

        fx.store.set_online(true);
        assert_eq!(numbers(&fx.repo.fetch_all().await), vec![9]);
        assert!(!fx.repo.is_primary_available().await);
    }

    #[tokio::test]
    async fn fallback_prefers_last_primary_listing() {
        let fx = Fixture::new(abc(), vec![station(9, "Snap", 1, 2, "OPEN")]);
        assert_eq!(fx.repo.fetch_all().await.len(), 3);

        fx.store.set_online(false);
        assert_eq!(numbers(&fx.repo.fetch_all().await), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn get_by_key_ignores_fallback_state() {
        let fx = Fixture::new(abc(), Vec::new());
        fx.store.set_online(false);
        fx.repo.fetch_all().await;
        assert!(fx.repo.get_by_key(1).await.is_err());

        fx.store.set_online(true);
        assert_eq!(fx.repo.get_by_key(1).await.unwrap().unwrap().name, "A");
        assert!(fx.repo.get_by_key(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let fx = Fixture::new(abc(), Vec::new());
        let mut new = station(4, "D", 3, 12, "OPEN");
        new.banking = true;
        new.position.lng = -6.3;

        let report = fx.repo.create(new.clone()).await.unwrap();
        assert!(report.warning.is_none());
        assert_eq!(report.station, new);

        assert_eq!(fx.repo.get_by_key(4).await.unwrap(), Some(new));
    }

    #[tokio::test]
    async fn create_writes_through_to_snapshot() {
        let fx = Fixture::new(abc(), Vec::new());
        fx.repo.create(station(4, "D", 3, 12, "OPEN")).await.unwrap();

        assert_eq!(numbers(&fx.snapshot()), vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn create_propagates_primary_failure() {
        let fx = Fixture::new(abc(), Vec::new());
        fx.store.set_online(false);

        let result = fx.repo.create(station(4, "D", 3, 12, "OPEN")).await;
        assert!(matches!(result, Err(StoreError::Unavailable { .. })));
        assert!(fx.snapshot().is_empty());
    }

    #[tokio::test]
    async fn create_duplicate_is_conflict() {
        let fx = Fixture::new(abc(), Vec::new());
        let result = fx.repo.create(station(1, "Again", 1, 2, "OPEN")).await;
        assert!(matches!(result, Err(StoreError::Conflict { .. })));
    }

    #[tokio::test]
    async fn snapshot_failure_is_a_warning() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();

        let store = InMemoryStore::new(abc());
        let repo = StationRepository::new(
            Arc::new(store.clone()),
            snapshot_at(&blocker.join("stations.json")),
        );

        let report = repo.create(station(4, "D", 3, 12, "OPEN")).await.unwrap();
        assert!(report.warning.is_some());
        assert_eq!(store.len().await, 4);
    }

    #[tokio::test]
    async fn update_missing_station_is_not_found() {
        let fx = Fixture::new(abc(), Vec::new());

        let outcome = fx
            .repo
            .update(99, &station(99, "Ghost", 1, 2, "OPEN"))
            .await
            .unwrap();

        assert!(matches!(outcome, UpdateOutcome::NotFound));
        assert_eq!(fx.repo.fetch_all().await.len(), 3);
        assert!(fx.snapshot().is_empty());
    }

    #[tokio::test]
    async fn update_overwrites_mutable_fields_only() {
        let fx = Fixture::new(abc(), Vec::new());
        let mut changes = station(555, "Renamed", 7, 30, "CLOSED");
        changes.contract_name = "elsewhere".to_string();
        changes.banking = true;
        changes.last_update = 1_800_000_000_000;

        let UpdateOutcome::Updated(report) = fx.repo.update(1, &changes).await.unwrap() else {
            panic!("station 1 should exist");
        };

        let stored = fx.repo.get_by_key(1).await.unwrap().unwrap();
        assert_eq!(stored, report.station);
        assert_eq!(stored.number, 1);
        assert_eq!(stored.contract_name, "dublin");
        assert!(!stored.banking);
        assert_eq!(stored.name, "Renamed");
        assert_eq!(stored.bike_stands, 30);
        assert_eq!(stored.available_bikes, 7);
        assert_eq!(stored.status, "CLOSED");
        assert_eq!(stored.last_update, 1_800_000_000_000);

        let snap = fx.snapshot();
        assert_eq!(snap.len(), 3);
        assert_eq!(snap[0], stored);
    }

    #[tokio::test]
    async fn update_propagates_read_failure() {
        let fx = Fixture::new(abc(), Vec::new());
        fx.store.set_online(false);
        assert!(fx.repo.update(1, &station(1, "X", 1, 2, "OPEN")).await.is_err());
    }

    #[tokio::test]
    async fn writes_while_degraded_reach_cache_and_snapshot() {
        let dir = tempdir().unwrap();
        let snap_path = dir.path().join("stations.json");
        snapshot_at(&snap_path).save(&abc()).unwrap();

        let repo = StationRepository::new(
            Arc::new(BrokenListing(InMemoryStore::new(abc()))),
            snapshot_at(&snap_path),
        );

        let changes = station(2, "B2", 9, 15, "OPEN");
        assert!(matches!(
            repo.update(2, &changes).await.unwrap(),
            UpdateOutcome::Updated(_)
        ));
        repo.create(station(4, "D", 1, 2, "OPEN")).await.unwrap();

        let all = repo.fetch_all().await;
        assert_eq!(numbers(&all), vec![1, 2, 3, 4]);
        assert_eq!(all[1].name, "B2");
        assert_eq!(snapshot_at(&snap_path).load(), *all);
    }

    #[tokio::test]
    async fn concurrent_degraded_writes_are_not_lost() {
        let dir = tempdir().unwrap();
        let snap_path = dir.path().join("stations.json");
        let initial: Vec<Station> = (1..=20)
            .map(|n| station(n, &format!("S{n}"), 0, 10, "OPEN"))
            .collect();
        snapshot_at(&snap_path).save(&initial).unwrap();

        let repo = Arc::new(StationRepository::new(
            Arc::new(BrokenListing(InMemoryStore::new(initial))),
            snapshot_at(&snap_path),
        ));

        let mut handles = Vec::new();
        for n in 1..=20u32 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                let changes = station(n, &format!("S{n}"), 5, 10, "OPEN");
                repo.update(n, &changes).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let all = repo.fetch_all().await;
        assert!(all.iter().all(|s| s.available_bikes == 5));
        assert!(
            snapshot_at(&snap_path)
                .load()
                .iter()
                .all(|s| s.available_bikes == 5)
        );
    }

    #[tokio::test]
    async fn slow_listing_does_not_overwrite_newer_write() {
        let dir = tempdir().unwrap();
        let snap_path = dir.path().join("stations.json");
        let store = Arc::new(GatedListing::new(abc()));
        let repo = Arc::new(StationRepository::new(store.clone(), snapshot_at(&snap_path)));

        // A reader lists the primary, then stalls before caching the result.
        store.hold_next.store(true, Ordering::SeqCst);
        let reader = tokio::spawn({
            let repo = repo.clone();
            async move { repo.fetch_all().await }
        });
        store.listed.notified().await;

        let changes = station(2, "B2", 9, 15, "OPEN");
        assert!(matches!(
            repo.update(2, &changes).await.unwrap(),
            UpdateOutcome::Updated(_)
        ));

        store.release.notify_one();
        let stale = reader.await.unwrap();
        assert_eq!(stale[1].name, "B");

        // Degrade, then write again so the snapshot is rebuilt from the cache.
        store.fail.store(true, Ordering::SeqCst);
        repo.create(station(4, "D", 1, 2, "OPEN")).await.unwrap();
        assert!(!repo.is_primary_available().await);

        let cached = repo.fetch_all().await;
        assert_eq!(numbers(&cached), vec![1, 2, 3, 4]);
        assert_eq!(cached[1].name, "B2");

        let snap = snapshot_at(&snap_path).load();
        assert_eq!(snap[1].name, "B2");
        assert_eq!(snap, *cached);
    }

    #[tokio::test]
    async fn query_wraps_page_envelope_with_defaults() {
        let stations: Vec<Station> = (1..=25)
            .map(|n| station(n, &format!("S{n:02}"), n, 30, "OPEN"))
            .collect();
        let fx = Fixture::new(stations, Vec::new());

        let page = fx.repo.query(&StationQuery::default()).await;
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 10);
        assert_eq!(page.total, 25);
        assert_eq!(page.data.len(), 10);
        assert_eq!(page.data[0].number, 1);
    }

    #[tokio::test]
    async fn query_filters_and_pages() {
        let fx = Fixture::new(abc(), Vec::new());
        let query = StationQuery {
            status: Some("OPEN".to_string()),
            sort: Some("occupancy".to_string()),
            direction: Some("asc".to_string()),
            page: Some(2),
            page_size: Some(1),
            ..StationQuery::default()
        };

        let page = fx.repo.query(&query).await;
        assert_eq!(numbers(&page.data), vec![3]);
        assert_eq!(page.total, 2);
        assert_eq!(page.page, 2);
        assert_eq!(page.page_size, 1);
    }

    #[tokio::test]
    async fn query_runs_against_snapshot_when_degraded() {
        let fx = Fixture::new(abc(), vec![station(9, "Snap", 1, 2, "CLOSED")]);
        fx.store.set_online(false);

        let page = fx.repo.query(&StationQuery::default()).await;
        assert_eq!(numbers(&page.data), vec![9]);
        assert_eq!(page.total, 1);
    }

    #[tokio::test]
    async fn page_serializes_envelope_names() {
        let fx = Fixture::new(abc(), Vec::new());
        let json = serde_json::to_value(fx.repo.query(&StationQuery::default()).await).unwrap();
        assert_eq!(json["total"], 3);
        assert_eq!(json["page"], 1);
        assert_eq!(json["pageSize"], 10);
        assert_eq!(json["data"][0]["bike_stands"], 20);
    }

    #[tokio::test]
    async fn summary_uses_full_collection() {
        let fx = Fixture::new(abc(), Vec::new());
        let summary = fx.repo.summary().await;
        assert_eq!(summary.total_stations, 3);
        assert_eq!(summary.total_available_bikes, 30);
        assert_eq!(summary.status_counts["OPEN"], 2);
    }

    #[tokio::test]
    async fn seed_upserts_snapshot_into_primary() {
        let fx = Fixture::new(
            vec![station(1, "Old", 1, 2, "OPEN")],
            vec![
                station(1, "New", 1, 2, "OPEN"),
                station(2, "B", 1, 2, "OPEN"),
            ],
        );

        let report = fx.repo.seed_from_snapshot().await;
        assert_eq!(
            report,
            SeedReport {
                seeded: 2,
                failed: 0
            }
        );
        assert_eq!(fx.store.len().await, 2);
        assert_eq!(fx.repo.get_by_key(1).await.unwrap().unwrap().name, "New");
    }

    #[tokio::test]
    async fn seed_counts_failures() {
        let fx = Fixture::new(Vec::new(), abc());
        fx.store.set_online(false);

        let report = fx.repo.seed_from_snapshot().await;
        assert_eq!(
            report,
            SeedReport {
                seeded: 0,
                failed: 3
            }
        );
    }
}
