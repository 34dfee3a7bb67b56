//! # Strata Calculator Library
//!
//! Stratified-proportional sampling error for an estimated proportion.
//! Per-stratum sample sizes n_h and population sizes N_h on a region × type
//! grid are turned into per-stratum and aggregate standard errors under the
//! worst-case proportion p = 0.5, plus the 95% margin of error.
//!
//! # Module Structure
//!
//! - [`estimator`] - The calculator core (pure, stateless)
//! - [`error`] - Input rejection reasons
//! - [`form`] - Caller-side form state with reset
//! - [`report`] - Text and JSON presentation
//! - [`session`] - Line-oriented interactive form
//!
//! # Data Flow
//!
//! ```text
//! ┌────────────┐   to_design   ┌──────────┐  estimate_design  ┌──────────┐
//! │ FormState  │──────────────►│  Design  │──────────────────►│  Report  │
//! │ / TOML file│               │(immutable)│   flatten → core  │ text/JSON│
//! └────────────┘               └──────────┘   → re-shape       └──────────┘
//! ```

#![deny(missing_docs)]

pub mod error;
pub mod estimator;
pub mod form;
pub mod report;
pub mod session;

// Re-export key types for convenience
pub use crate::error::{CalcError, CalcResult, InvalidInputReason};
pub use crate::estimator::{
    DesignEstimate, StratifiedError, compute_stratified_error, equal_split, estimate_design,
};
pub use crate::form::{FormError, FormState};
pub use crate::report::Report;
pub use crate::session::Session;
