//! Shared utilities for the aircheck workspace.
//!
//! Currently this is just [`observability`], the centralised tracing setup
//! used by the harvester binary and the offline tools. It is intentionally
//! lightweight so every crate can depend on it without heavy transitive
//! costs.

pub mod observability;
