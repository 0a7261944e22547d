//! Shared test utilities
//!
//! - Fixed timestamps for reproducible records
//! - Temp-dir backed submission tables

pub mod determinism;
pub mod fixtures;
