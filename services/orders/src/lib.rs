//! Drinks2U order service library crate.
//!
//! # Purpose
//! Exposes the order model, storage backends, HTTP API, configuration and the
//! typed HTTP client for use by the `drinks2u-api` and `drinks2u-cli`
//! binaries and by tests.
pub mod api;
pub mod app;
pub mod client;
pub mod config;
pub mod model;
pub mod observability;
pub mod store;
