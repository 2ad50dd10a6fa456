//! icswap-api: HTTP API layer for icswap
//!
//! Exposes quoting, swap execution and the amount/account utilities as JSON
//! endpoints.

pub mod dto;
pub mod routes;
pub mod server;
pub mod state;

pub use server::*;
pub use state::AppState;
