//! Strongly-typed identifiers for tallyd

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a tracked user
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Username {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Username {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_serializes_as_plain_string() {
        let user = Username::new("mikel");
        let json = serde_json::to_string(&user).unwrap();
        assert_eq!(json, "\"mikel\"");

        let parsed: Username = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, user);
    }
}
