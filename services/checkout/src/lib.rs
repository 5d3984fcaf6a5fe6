//! `ps-checkout` library.
//!
//! Loads connection settings and writes checked-out credentials for a
//! consuming process.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod output;

pub use config::Config;
pub use output::write_credential;
