//! Vantage API client library.
//!
//! A Rust library for interacting with the Vantage REST API using a
//! trait-based architecture where each operation (Get, Create, Update,
//! Delete, Find) is defined as a trait that entity types implement.
//!
//! # Quick Start
//!
//! ```no_run
//! use vantageapi::{Alert, Find, Get, SearchCondition, VantageClient};
//!
//! #[tokio::main]
//! async fn main() -> vantageapi::Result<()> {
//!     // Create client from environment variables
//!     let client = VantageClient::from_env()?;
//!
//!     // Get an alert by ID
//!     let alert = Alert::get(&client, "1234567890").await?;
//!     println!("Alert: {}", alert.name);
//!
//!     // Find all alerts tagged prod
//!     let alerts = Alert::find(
//!         &client,
//!         &[SearchCondition::contains("tags", "prod")],
//!     )
//!     .await?;
//!     println!("Found {} alerts", alerts.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! The library is organized around five core traits:
//!
//! - [`Get`] - Fetch a single entity by ID
//! - [`Create`] - Create an entity from a draft
//! - [`Update`] - Modify an existing entity
//! - [`Delete`] - Delete an entity by ID
//! - [`Find`] - Paginated search over an entity type
//!
//! Each entity type (like [`Alert`] or [`Dashboard`]) implements the
//! traits supported by its API endpoints. All requests flow through
//! [`RestCall`], which wraps the retrying transport in
//! [`VantageClient`].
//!
//! # Configuration
//!
//! The client reads configuration from environment variables:
//!
//! - `VANTAGE_ADDRESS` (required) - Service address, e.g. `example.vantage.com`
//! - `VANTAGE_API_TOKEN` (required) - Your API token

mod client;
mod error;
mod models;
mod rest;
mod search;
mod traits;
mod writer;

pub mod cli;
pub mod output;

// Re-export core types
pub use client::{ApiTransport, Config, RetryPolicy, VantageClient};
pub use error::{Result, VantageError};
pub use rest::RestCall;
pub use search::{
    MatchingMethod, Search, SearchCondition, SearchPage, SearchParams, TimeRange,
};
pub use writer::{Metric, MetricWriter, PointTag};

// Re-export traits
pub use traits::{Create, Delete, Find, Get, Update};

// Re-export models
pub use models::*;
