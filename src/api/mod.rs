//! Dashboard HTTP surface.
//!
//! HTML views live at the root, JSON endpoints under `/api/`. The router is
//! composable: `dashboard_router()` returns a `Router` that can be mounted on
//! any axum server instance.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::dashboard_router;
pub use server::{start_dashboard_server, DashboardServer, ServerError};
pub use types::ApiContext;
