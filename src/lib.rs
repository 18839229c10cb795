//! Typed operations over the Blue project management GraphQL API.
//!
//! Items arrive as JSON objects naming an operation and its parameters. Each
//! item is decoded into an [`operations::Operation`], executed against a
//! [`graphql::BlueClient`] and reported as an [`model::OperationResult`].

pub mod codec;
pub mod error;
pub mod graphql;
pub mod lookups;
pub mod model;
pub mod operations;
pub mod runner;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{BlueError, Result};
pub use graphql::{BlueClient, ClientSettings, Credentials, HttpTransport, Transport};
pub use operations::{dispatch, Operation};
pub use runner::run_batch;
