#![forbid(unsafe_code)]

//! Core domain model and conversion logic for the unit converter.
//!
//! This crate provides:
//! - Domain types (conversion rules, units, categories, history entries)
//! - The built-in catalog
//! - Conversion engine with runtime custom units
//! - Session history with CSV export

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod engine;
pub mod history;
pub mod info;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_registry, get_default_registry, CUSTOM_CATEGORY};
pub use config::Config;
pub use engine::{ConversionEngine, TemperatureMode};
pub use history::{load_csv, HistoryLog};
pub use info::unit_info;
