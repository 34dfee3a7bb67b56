//! Prelude module for common re-exports.
//!
//! ```rust
//! use strata_common::prelude::*;
//! ```

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{AppConfig, ConfigError, ConfigLoader, DisplayConfig, LogLevel};

// ─── Statistical Constants ──────────────────────────────────────────
pub use crate::consts::{WORST_CASE_PROPORTION, Z_95};

// ─── Design Model ───────────────────────────────────────────────────
pub use crate::design::{Design, DesignError, DesignFile, StratumPopulations};
pub use crate::grid::{GridError, StratumGrid, StratumId};
