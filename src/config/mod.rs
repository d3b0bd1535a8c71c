// src/config/mod.rs

//! Configuration loading and validation for feedbridge.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate names, the debounce window and lookup settings (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_effective, load_from_path};
pub use model::{
    AppSection, ConfigFile, DebounceSection, HelperSection, LocatorSection, LookupSection,
    RawConfigFile,
};
