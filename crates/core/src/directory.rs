//! Directory rows used to label aggregated views.

use serde::{Deserialize, Serialize};
use crate::id::{CategoryId, ClientId, UserId};

/// A client of the agency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    /// Unique identifier
    pub id: ClientId,
    /// Display name
    pub name: String,
}

impl Client {
    /// Create a new client.
    pub fn new(name: impl Into<String>) -> Self {
        Self { id: ClientId::new(), name: name.into() }
    }
}

/// A work category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: CategoryId,
    /// Display name
    pub name: String,
}

impl Category {
    /// Create a new category.
    pub fn new(name: impl Into<String>) -> Self {
        Self { id: CategoryId::new(), name: name.into() }
    }
}

/// A user as exposed by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    /// Unique identifier
    pub id: UserId,
    /// Display name
    pub name: String,
}

impl TeamMember {
    /// Create a new team member.
    pub fn new(name: impl Into<String>) -> Self {
        Self { id: UserId::new(), name: name.into() }
    }
}
