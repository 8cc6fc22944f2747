//! Station record.
//!
//! Field names match the public bike-share feed (snake_case) so that the
//! snapshot file and the HTTP API stay drop-in compatible with it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Geographic position of a station.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

/// A bike-share station and its live availability.
///
/// `number` is the primary and partition key. The storage layer does not
/// check that `available_bike_stands + available_bikes == bike_stands`;
/// only the refresher produces records with that guarantee.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub number: u32,
    #[serde(default)]
    pub contract_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub banking: bool,
    #[serde(default)]
    pub bonus: bool,
    #[serde(default)]
    pub bike_stands: u32,
    #[serde(default)]
    pub available_bike_stands: u32,
    #[serde(default)]
    pub available_bikes: u32,
    #[serde(default)]
    pub status: String,
    /// Milliseconds since the Unix epoch, UTC.
    #[serde(default)]
    pub last_update: i64,
}

impl Station {
    /// The canonical external id: the decimal form of `number`.
    pub fn key(&self) -> String {
        self.number.to_string()
    }

    /// Percentage of docks holding a bike, rounded down.
    ///
    /// A station with no docks reports 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use bike_server::model::Station;
    ///
    /// let station = Station {
    ///     bike_stands: 20,
    ///     available_bikes: 10,
    ///     ..Station::default()
    /// };
    /// assert_eq!(station.occupancy(), 50);
    /// ```
    pub fn occupancy(&self) -> u32 {
        if self.bike_stands == 0 {
            return 0;
        }
        (u64::from(self.available_bikes) * 100 / u64::from(self.bike_stands)) as u32
    }

    /// Fraction of docks holding a bike, used for ordering.
    pub fn occupancy_ratio(&self) -> f64 {
        if self.bike_stands == 0 {
            0.0
        } else {
            f64::from(self.available_bikes) / f64::from(self.bike_stands)
        }
    }

    /// `last_update` as a UTC timestamp, if it is in range.
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.last_update)
    }

    /// Overwrite the fields that may change after creation.
    ///
    /// Identity fields (`number`, `contract_name`, `position`, `banking`,
    /// `bonus`) are left untouched.
    pub fn apply_update(&mut self, updated: &Station) {
        self.name.clone_from(&updated.name);
        self.address.clone_from(&updated.address);
        self.bike_stands = updated.bike_stands;
        self.available_bike_stands = updated.available_bike_stands;
        self.available_bikes = updated.available_bikes;
        self.status.clone_from(&updated.status);
        self.last_update = updated.last_update;
    }
}

#[cfg(test)]
pub(crate) fn station(number: u32, name: &str, bikes: u32, stands: u32, status: &str) -> Station {
    Station {
        number,
        contract_name: "dublin".to_string(),
        name: name.to_string(),
        address: format!("{number} {name} Street"),
        position: Position {
            lat: 53.34,
            lng: -6.26,
        },
        banking: false,
        bonus: false,
        bike_stands: stands,
        available_bike_stands: stands.saturating_sub(bikes),
        available_bikes: bikes,
        status: status.to_string(),
        last_update: 1_700_000_000_000,
    }
}
