//! Mealdesk Admin Core
//!
//! Decision layer behind the storefront's back-office console: the
//! role-based permission engine, the order fulfillment pipeline, and the
//! dashboard statistics derived from the order set. Rendering, navigation
//! chrome, and the persistence backend live outside this crate; it exposes
//! plain data (visible sections, pipeline buckets, aggregates) for them.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod admin;
pub mod auth;
pub mod config;
pub mod errors;
pub mod logging;
pub mod orders;
pub mod stats;

pub use admin::AdminOrchestrator;
pub use errors::AdminError;
pub use orders::status::OrderStatus;
pub use stats::DashboardStats;
