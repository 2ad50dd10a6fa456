//! icswap-core: Shared types, errors, amount codec and configuration
//!
//! This crate provides the foundational types used across the icswap workspace.

pub mod amount;
pub mod config;
pub mod errors;
pub mod types;

pub use amount::{format_amount, minimum_received, parse_amount, parse_tolerance_percent};
pub use config::*;
pub use errors::*;
pub use types::*;
