//! Work Management
//!
//! Applies the status lifecycle and ordering rules to stored works, steps,
//! todos and plan items.

#![warn(missing_docs)]

pub mod error;
pub mod manager;

pub use error::{WorkError, Result};
pub use manager::{BasicWorkManager, PedItemSpec, WorkManager, WorkSpec};
