//! Storage abstraction and implementations for AgencyOps.
//!
//! The relational store is an external collaborator; this crate defines the
//! interface the rest of the workspace talks to and a JSON file reference
//! implementation used by the CLI and tests.

#![warn(missing_docs)]

pub mod trait_;
pub mod json_storage;

pub use trait_::{Storage, StorageError, Result};
pub use json_storage::JsonStorage;
