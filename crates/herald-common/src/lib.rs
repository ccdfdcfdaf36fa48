//! # Herald Common
//!
//! Shared types, error handling, and logging setup for Herald.
//!
//! This crate provides the foundational types used across all other crates
//! in the Herald workspace.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod logging;
pub mod types;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use error::{HeraldError, Result};
pub use logging::{
    init_default_logging, init_dev_logging, init_logging, init_prod_logging, LoggingConfig,
};
pub use types::*;
