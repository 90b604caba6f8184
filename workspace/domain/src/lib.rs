//! Domain core of the network: account registry, credential store,
//! follow graph, content store and feed builder. Every public
//! operation is an async function over a `sea_orm::DatabaseConnection`
//! and surfaces failures as typed [`error::DomainError`] values.

pub mod accounts;
pub mod error;
pub mod feed;
pub mod graph;
pub mod password;
pub mod posts;

pub use error::{DomainError, FieldError, Result, ValidationReason};
