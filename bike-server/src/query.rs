//! Station query engine.
//!
//! Pure functions over an in-memory station collection. The pipeline is
//! fixed: status filter, minimum-bikes filter, text search, then the total
//! is captured, then sort, then pagination. The input is never mutated.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::Station;

/// Sort keys understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    AvailableBikes,
    Occupancy,
}

impl SortKey {
    /// Parse a sort key case-insensitively. Unknown keys yield `None`,
    /// which leaves the input order untouched.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Some(SortKey::Name),
            "availablebikes" => Some(SortKey::AvailableBikes),
            "occupancy" => Some(SortKey::Occupancy),
            _ => None,
        }
    }

    fn compare(self, a: &Station, b: &Station) -> Ordering {
        match self {
            SortKey::Name => a.name.cmp(&b.name),
            SortKey::AvailableBikes => a.available_bikes.cmp(&b.available_bikes),
            SortKey::Occupancy => a.occupancy_ratio().total_cmp(&b.occupancy_ratio()),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    /// Only `asc` (any case) is ascending; every other token, and no
    /// token at all, is descending.
    pub fn parse(s: Option<&str>) -> Self {
        match s {
            Some(s) if s.eq_ignore_ascii_case("asc") => SortDirection::Ascending,
            _ => SortDirection::Descending,
        }
    }
}

/// Query parameters for a station listing.
///
/// Parameter names follow the public API (`minBikes`, `name_address`,
/// `asc_desc`, `pageSize`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StationQuery {
    /// Exact status, compared case-insensitively.
    pub status: Option<String>,

    /// Inclusive lower bound on available bikes. Ignored when not positive.
    #[serde(rename = "minBikes")]
    pub min_bikes: Option<i64>,

    /// Case-insensitive substring of name or address.
    #[serde(rename = "name_address", alias = "search")]
    pub search: Option<String>,

    /// One of `name`, `availablebikes`, `occupancy`.
    pub sort: Option<String>,

    /// `asc` for ascending; anything else is descending.
    #[serde(rename = "asc_desc", alias = "direction")]
    pub direction: Option<String>,

    /// 1-based page number.
    pub page: Option<i64>,

    #[serde(rename = "pageSize")]
    pub page_size: Option<i64>,
}

impl StationQuery {
    fn status(&self) -> Option<&str> {
        self.status.as_deref().filter(|s| !s.is_empty())
    }

    fn min_bikes(&self) -> Option<u32> {
        self.min_bikes
            .filter(|&n| n > 0)
            .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
    }

    fn search(&self) -> Option<String> {
        self.search
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    fn sort(&self) -> Option<(SortKey, SortDirection)> {
        let key = SortKey::parse(self.sort.as_deref()?)?;
        Some((key, SortDirection::parse(self.direction.as_deref())))
    }

    /// Zero-based skip and take, when both page and page size are positive.
    fn window(&self) -> Option<(usize, usize)> {
        match (self.page, self.page_size) {
            (Some(page), Some(size)) if page > 0 && size > 0 => {
                let page = usize::try_from(page).unwrap_or(usize::MAX);
                let size = usize::try_from(size).unwrap_or(usize::MAX);
                Some(((page - 1).saturating_mul(size), size))
            }
            _ => None,
        }
    }

    /// Whether a station passes the status, bikes and search filters.
    pub fn matches(&self, station: &Station) -> bool {
        let search = self.search();
        self.matches_with(station, search.as_deref())
    }

    fn matches_with(&self, station: &Station, search: Option<&str>) -> bool {
        if let Some(status) = self.status()
            && station.status.to_lowercase() != status.to_lowercase()
        {
            return false;
        }

        if let Some(min) = self.min_bikes()
            && station.available_bikes < min
        {
            return false;
        }

        if let Some(term) = search
            && !station.name.to_lowercase().contains(term)
            && !station.address.to_lowercase().contains(term)
        {
            return false;
        }

        true
    }
}

/// Output of the engine: the requested page and the filtered total.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub stations: Vec<Station>,
    /// Number of stations matching the filters, before pagination.
    pub total: usize,
}

/// Run the filter, sort and paginate pipeline.
pub fn run_query(stations: &[Station], query: &StationQuery) -> QueryResult {
    let search = query.search();

    let mut matched: Vec<Station> = stations
        .iter()
        .filter(|s| query.matches_with(s, search.as_deref()))
        .cloned()
        .collect();

    let total = matched.len();

    if let Some((key, direction)) = query.sort() {
        // sort_by is stable; reversing the comparator keeps ties in input order.
        match direction {
            SortDirection::Ascending => matched.sort_by(|a, b| key.compare(a, b)),
            SortDirection::Descending => matched.sort_by(|a, b| key.compare(b, a)),
        }
    }

    let stations = match query.window() {
        Some((skip, take)) => matched.into_iter().skip(skip).take(take).collect(),
        None => matched,
    };

    QueryResult { stations, total }
}

/// Network-wide totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_stations: usize,
    pub total_bike_stands: u64,
    pub total_available_bikes: u64,
    /// Station count per distinct status value.
    pub status_counts: BTreeMap<String, usize>,
}

/// Summarise the full, unfiltered collection.
pub fn summarize(stations: &[Station]) -> Summary {
    let mut summary = Summary {
        total_stations: stations.len(),
        ..Summary::default()
    };

    for station in stations {
        summary.total_bike_stands += u64::from(station.bike_stands);
        summary.total_available_bikes += u64::from(station.available_bikes);
        *summary
            .status_counts
            .entry(station.status.clone())
            .or_insert(0) += 1;
    }

    summary
}
