//! Web layer for the metro route planner.
//!
//! Provides JSON endpoints for point-to-point routes and patrols.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
