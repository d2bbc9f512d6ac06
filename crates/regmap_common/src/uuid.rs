//! Opaque identity tokens for every named entity in a register database.

use std::borrow::Borrow;
use std::fmt;

use rand::RngCore;
use serde::{Deserialize, Serialize};

/// A unique identifier for any named entity in a register database.
///
/// Identifiers are opaque string tokens that persist with the project file,
/// so the same entity keeps the same identity across save/load cycles and
/// across the machines a project is shared between. They are used as the
/// key of the parameter registry and both override tables.
///
/// Freshly minted identifiers are 12 lowercase hex characters.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Uuid(String);

impl Uuid {
    /// Mints a new random identifier (12 lowercase hex characters).
    pub fn generate() -> Self {
        let mut bytes = [0u8; 6];
        rand::thread_rng().fill_bytes(&mut bytes);
        let mut token = String::with_capacity(12);
        for b in bytes {
            token.push_str(&format!("{b:02x}"));
        }
        Uuid(token)
    }

    /// Creates an identifier from an existing token (e.g., read from a
    /// project file).
    pub fn new(token: impl Into<String>) -> Self {
        Uuid(token.into())
    }

    /// Returns the token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the token is empty (an entity that has never been
    /// assigned an identity).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Uuid {
    fn from(token: &str) -> Self {
        Uuid(token.to_string())
    }
}

impl Borrow<str> for Uuid {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Default for Uuid {
    fn default() -> Self {
        Uuid(String::new())
    }
}
