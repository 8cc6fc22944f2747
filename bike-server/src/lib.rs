//! Bike-share station server.
//!
//! Serves station availability from a primary document store, falling back
//! to a local JSON snapshot when the store is unreachable, while a
//! background task keeps refreshing station state.

pub mod config;
pub mod model;
pub mod query;
pub mod refresher;
pub mod repository;
pub mod snapshot;
pub mod store;
pub mod web;
