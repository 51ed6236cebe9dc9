//! Dashboard middleware.
//!
//! Only the access logger; the server binds to loopback and has no auth.

pub mod audit;
