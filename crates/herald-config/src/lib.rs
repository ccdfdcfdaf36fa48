//! # Herald Config
//!
//! Validated configuration for Herald and loading of translation definition
//! tables.
//!
//! Settings are read from TOML, overridden by `HERALD_*` environment
//! variables and validated with `validator`. Definition tables may be TOML,
//! YAML or JSON and are merged into one catalog.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod defaults;
pub mod loader;
pub mod schema;
pub mod validation;

pub use catalog::{build_catalog, build_translator, load_definition, DefinitionFormat};
pub use loader::{ConfigError, ConfigLoader};
pub use schema::{Config, LocalizationConfig, LoggingSettings};
