//! Client for the article-search listing API.
//!
//! The listing source pages through article metadata in fixed-size steps;
//! each item is an opaque task for the pipeline (fetch, extract, persist).
//! Exhaustion — a short or empty page — is a normal termination condition,
//! not an error.

mod client;
mod types;

pub use client::{AnyStream, ListingClient};
pub use types::ArticleMeta;
