//! Crop suitability scoring, rotation planning, scarce-resource allocation
//! and resource efficiency analysis for farms.
//!
//! The core functions in [`logic`] are pure: reference data and tuning come
//! in as arguments, and bad input is skipped with a `tracing` warning rather
//! than returned as an error.

pub mod app;
pub mod cli;
pub mod config;
pub mod datasources;
pub mod error;
pub mod logic;
pub mod models;

pub use error::{FarmError, Result};
