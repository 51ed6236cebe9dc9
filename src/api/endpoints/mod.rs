//! Endpoint handlers.
//!
//! HTML views and the JSON API work on the same session. Both analysis
//! routes go through `analysis::run_analysis`.

pub mod analysis;
pub mod dashboard;
pub mod health;
pub mod playbooks;
pub mod transcript;
