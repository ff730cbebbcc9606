//! Newtype wrappers for every domain identifier.
//!
//! Identifiers are opaque strings assigned by the backend (`"1"`,
//! `"user-1714740000000"`, `"c42"`), so the wrappers hold a `String` rather
//! than a parsed UUID. Distinct types still keep a `ChatId` from being passed
//! where a `UserId` is expected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Macro to define a newtype ID wrapper around `String`.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident, $prefix:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing identifier.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Mint a fresh, locally unique identifier.
            pub fn generate() -> Self {
                Self(format!("{}{}", $prefix, Uuid::new_v4().simple()))
            }

            /// Borrow the raw identifier.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Return the raw identifier.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = AppError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(AppError::validation(concat!(
                        stringify!($name),
                        " must not be empty"
                    )));
                }
                Ok(Self(trimmed.to_string()))
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(
    /// Unique identifier for a user.
    UserId, "user-"
);

define_id!(
    /// Unique identifier for a connection record.
    ConnectionId, "c"
);

define_id!(
    /// Unique identifier for a chat message.
    MessageId, "m"
);

define_id!(
    /// Unique identifier for a chat.
    ChatId, "chat-"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_carry_prefix_and_differ() {
        let a = ConnectionId::generate();
        let b = ConnectionId::generate();
        assert!(a.as_str().starts_with('c'));
        assert_ne!(a, b);
    }

    #[test]
    fn parse_trims_and_rejects_blank() {
        let id: UserId = " 42 ".parse().unwrap();
        assert_eq!(id.as_str(), "42");
        assert!("   ".parse::<UserId>().is_err());
    }

    #[test]
    fn serializes_as_bare_string() {
        let json = serde_json::to_string(&ChatId::from("chat1")).unwrap();
        assert_eq!(json, "\"chat1\"");
    }
}
