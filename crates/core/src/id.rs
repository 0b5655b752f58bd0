//! Unique identifiers for AgencyOps entities.

use serde::{Deserialize, Serialize};
use ulid::Ulid;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(Ulid);

        impl $name {
            /// Generate a new identifier
            pub fn new() -> Self {
                Self(Ulid::new())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl std::str::FromStr for $name {
            type Err = ulid::DecodeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.parse()?))
            }
        }
    };
}

define_id!(
    /// Unique identifier for a Work
    WorkId
);
define_id!(
    /// Unique identifier for a WorkStep
    StepId
);
define_id!(
    /// Unique identifier for an editorial plan item
    PedItemId
);
define_id!(
    /// Unique identifier for a personal todo
    TodoId
);
define_id!(
    /// Unique identifier for a user (resolved by the auth provider)
    UserId
);
define_id!(
    /// Unique identifier for a Client
    ClientId
);
define_id!(
    /// Unique identifier for a work Category
    CategoryId
);
