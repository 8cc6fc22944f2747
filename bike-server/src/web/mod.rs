//! Web layer for the station service.
//!
//! JSON endpoints for querying, summarising, creating and updating
//! stations.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
