//! Vantage API model types.
//!
//! Each module pairs an entity's data shape with its trait implementations.
//! The shapes carry the JSON field layout; the operations are one-line
//! compositions over [`crate::rest::RestCall`] and [`crate::search::Search`].

mod alert;
mod cloud_integration;
mod dashboard;
mod derived_metric;
mod event;
mod external_link;
mod ingestion_policy;
mod maintenance_window;
mod metrics_policy;
mod role;
mod service_account;
mod target;
mod token;
mod user;
mod user_group;

pub(crate) mod tags;

pub use alert::*;
pub use cloud_integration::*;
pub use dashboard::*;
pub use derived_metric::*;
pub use event::*;
pub use external_link::*;
pub use ingestion_policy::*;
pub use maintenance_window::*;
pub use metrics_policy::*;
pub use role::*;
pub use service_account::*;
pub use target::*;
pub use token::*;
pub use user::*;
pub use user_group::*;
