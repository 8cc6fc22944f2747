//! Background station-state refresher.
//!
//! Simulates live telemetry: every cycle each station gets a new capacity
//! and bike count, with free docks derived so that
//! `available_bike_stands + available_bikes == bike_stands` always holds.

use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;
use tracing::{debug, info, warn};

use crate::model::Station;
use crate::repository::{StationRepository, UpdateOutcome};

/// Configuration for the refresher.
#[derive(Debug, Clone)]
pub struct RefresherConfig {
    /// Range of station capacities to draw from.
    pub capacity: RangeInclusive<u32>,

    /// Range of pauses between cycles.
    pub delay: RangeInclusive<Duration>,
}

impl RefresherConfig {
    /// Set the capacity range.
    pub fn with_capacity(mut self, capacity: RangeInclusive<u32>) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the pause range between cycles.
    pub fn with_delay(mut self, delay: RangeInclusive<Duration>) -> Self {
        self.delay = delay;
        self
    }
}

impl Default for RefresherConfig {
    fn default() -> Self {
        Self {
            capacity: 10..=50,
            delay: Duration::from_secs(10)..=Duration::from_secs(20),
        }
    }
}

/// Outcome of one refresh cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub updated: usize,
    pub failed: usize,
    /// Shutdown arrived before every station was visited.
    pub interrupted: bool,
}

/// Periodically rewrites every station's availability.
pub struct StationRefresher {
    repository: Arc<StationRepository>,
    config: RefresherConfig,
    rng: StdRng,
}

impl StationRefresher {
    pub fn new(repository: Arc<StationRepository>, config: RefresherConfig) -> Self {
        Self::with_rng(repository, config, StdRng::from_entropy())
    }

    /// Create a refresher with a fixed random source.
    pub fn with_rng(
        repository: Arc<StationRepository>,
        config: RefresherConfig,
        rng: StdRng,
    ) -> Self {
        Self {
            repository,
            config,
            rng,
        }
    }

    /// Run cycles until a shutdown signal arrives.
    ///
    /// Shutdown is checked between stations and raced against the pause
    /// between cycles. A station already being written is finished first.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        info!("station refresher started");

        loop {
            let report = self
                .cycle(|| !matches!(shutdown.try_recv(), Err(TryRecvError::Empty)))
                .await;
            if report.interrupted {
                break;
            }

            let delay = self.next_delay();
            debug!(?delay, "refresher sleeping");
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = shutdown.recv() => break,
            }
        }

        info!("station refresher stopped");
    }

    /// Run a single cycle over every station.
    pub async fn refresh_once(&mut self) -> CycleReport {
        self.cycle(|| false).await
    }

    async fn cycle(&mut self, mut stop_requested: impl FnMut() -> bool) -> CycleReport {
        let stations = self.repository.fetch_all().await;
        let mut report = CycleReport::default();

        for station in stations.iter() {
            if stop_requested() {
                report.interrupted = true;
                break;
            }

            let refreshed = self.refresh_station(station);
            match self.repository.update(station.number, &refreshed).await {
                Ok(UpdateOutcome::Updated(write)) => {
                    report.updated += 1;
                    if let Some(warning) = write.warning {
                        debug!(number = station.number, %warning, "refreshed without snapshot");
                    }
                }
                Ok(UpdateOutcome::NotFound) => {
                    warn!(number = station.number, "station vanished during refresh");
                    report.failed += 1;
                }
                Err(e) => {
                    warn!(number = station.number, error = %e, "failed to refresh station");
                    report.failed += 1;
                }
            }
        }

        info!(
            updated = report.updated,
            failed = report.failed,
            "refreshed stations"
        );
        report
    }

    /// Draw new availability for one station.
    fn refresh_station(&mut self, station: &Station) -> Station {
        let capacity = self.rng.gen_range(self.config.capacity.clone());
        let bikes = self.rng.gen_range(0..=capacity);

        let mut refreshed = station.clone();
        refreshed.bike_stands = capacity;
        refreshed.available_bikes = bikes;
        refreshed.available_bike_stands = capacity - bikes;
        refreshed.last_update = Utc::now().timestamp_millis().max(station.last_update);
        refreshed
    }

    fn next_delay(&mut self) -> Duration {
        let (min, max) = (*self.config.delay.start(), *self.config.delay.end());
        if min >= max {
            return min;
        }
        let millis = self
            .rng
            .gen_range(min.as_millis() as u64..=max.as_millis() as u64);
        Duration::from_millis(millis)
    }
}
