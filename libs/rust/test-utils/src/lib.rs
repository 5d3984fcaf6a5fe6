//! Shared test utilities for the Password Safe checkout crates.
//!
//! This crate provides:
//! - Proptest generators for account, system and secret values
//! - JSON fixtures shaped like Password Safe v3 responses
//! - A wiremock-backed fake Password Safe appliance

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod mocks;

pub use generators::*;
