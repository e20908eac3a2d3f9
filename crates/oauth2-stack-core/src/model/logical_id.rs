use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::{Result, StackError};

/// CloudFormation limit on logical id length.
const MAX_LOGICAL_ID_LEN: usize = 255;

/// Identifier of a resource or output inside the synthesized template.
///
/// Logical ids are ASCII alphanumeric and unique within one template.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LogicalId(String);

impl LogicalId {
    /// Validates and wraps a logical id.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is empty, too long or contains a
    /// non-alphanumeric character.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(StackError::invalid_logical_id(id, "must not be empty"));
        }
        if id.len() > MAX_LOGICAL_ID_LEN {
            return Err(StackError::invalid_logical_id(
                id,
                format!("must be at most {MAX_LOGICAL_ID_LEN} characters"),
            ));
        }
        if let Some(c) = id.chars().find(|c| !c.is_ascii_alphanumeric()) {
            return Err(StackError::invalid_logical_id(
                id.clone(),
                format!("contains non-alphanumeric character '{c}'"),
            ));
        }
        Ok(Self(id))
    }

    /// Builds a logical id from an arbitrary name by dropping every
    /// non-alphanumeric character (`client-id` becomes `clientid`).
    pub fn sanitized(name: &str) -> Self {
        let id: String = name
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .take(MAX_LOGICAL_ID_LEN)
            .collect();
        Self(id)
    }

    /// Wraps a compile-time known id without validation.
    pub(crate) fn from_static(id: &'static str) -> Self {
        debug_assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
        Self(id.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Re-runs the id rules; used when validating a whole stack.
    pub fn check(&self) -> Result<()> {
        Self::new(self.0.clone()).map(|_| ())
    }
}

impl fmt::Display for LogicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LogicalId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for LogicalId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}
