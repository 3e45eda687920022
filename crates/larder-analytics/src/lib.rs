//! Per-user inventory analytics for Larder.
//!
//! Merges a user's current inventory and consumption history into one
//! [`ProductView`](larder_core::view::ProductView) per distinct product id
//! and derives restock predictions from historical consumption rates.
//! Generic over the `larder-core` store traits; no concrete backend
//! dependency.

pub mod error;
pub mod report;

pub use error::{Error, Result};
pub use report::{build_report, report_for_user};
