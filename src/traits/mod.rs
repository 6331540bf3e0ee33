//! Trait definitions for Vantage operations.
//!
//! Each entity type implements the traits its endpoints support,
//! encapsulating per-entity API differences in the implementations. The
//! implementations are thin compositions over [`crate::rest::RestCall`] and
//! [`crate::search::Search`]; the request/response plumbing lives in those
//! modules, once.

mod create;
mod delete;
mod find;
mod get;
mod update;

pub use create::Create;
pub use delete::Delete;
pub use find::Find;
pub use get::Get;
pub use update::Update;
