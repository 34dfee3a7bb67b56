//! Strata Common Library
//!
//! This crate provides shared constants, the stratum grid model and
//! configuration loading utilities for all strata workspace crates.
//!
//! # Module Structure
//!
//! - [`consts`] - Statistical constants and form defaults
//! - [`config`] - Configuration loading traits and types
//! - [`grid`] - Region × type stratum grid
//! - [`design`] - Sampling design schema and validation
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! Add to your `Cargo.toml` with alias for shorter imports:
//! ```toml
//! [dependencies]
//! strata = { package = "strata_common", path = "../strata_common" }
//! ```
//!
//! Then import:
//! ```rust,ignore
//! use strata::design::{Design, DesignFile};
//! use strata::config::{AppConfig, ConfigLoader};
//! ```

pub mod config;
pub mod consts;
pub mod design;
pub mod grid;
pub mod prelude;
