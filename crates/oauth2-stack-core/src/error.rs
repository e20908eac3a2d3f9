use std::fmt;

use thiserror::Error;

/// Errors raised while declaring, validating or synthesizing the stack
#[derive(Debug, Error)]
pub enum StackError {
    #[error("Invalid logical id '{id}': {reason}")]
    InvalidLogicalId { id: String, reason: String },

    #[error("Invalid domain prefix '{prefix}': {reason}")]
    InvalidDomainPrefix { prefix: String, reason: String },

    #[error("Invalid scope '{scope}' on resource server '{server}': {reason}")]
    InvalidScope {
        server: String,
        scope: String,
        reason: String,
    },

    #[error("Scope '{scope}' is declared more than once on resource server '{server}'")]
    DuplicateScope { server: String, scope: String },

    #[error("Client scope '{scope}' does not exist on resource server '{server}'")]
    DanglingScope { server: String, scope: String },

    #[error("Output '{output}' references undeclared resource '{resource}'")]
    UnknownReference { output: String, resource: String },

    #[error("Client credentials flow cannot be combined with {other} on client '{client}'")]
    IncompatibleFlows { client: String, other: String },

    #[error("Client '{client}' uses the client credentials flow but does not generate a secret")]
    MissingSecret { client: String },

    #[error("Client '{client}' enables no OAuth flow")]
    NoFlows { client: String },

    #[error("Invalid {token} token validity on client '{client}': {reason}")]
    TokenValidity {
        client: String,
        token: &'static str,
        reason: String,
    },

    #[error("Export name '{0}' is used by more than one output")]
    DuplicateExport(String),

    #[error("Logical id '{0}' is used by more than one resource or output")]
    DuplicateLogicalId(String),

    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StackError {
    /// Create a new InvalidLogicalId error
    pub fn invalid_logical_id(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidLogicalId {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Create a new InvalidDomainPrefix error
    pub fn invalid_domain_prefix(prefix: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDomainPrefix {
            prefix: prefix.into(),
            reason: reason.into(),
        }
    }

    /// Create a new InvalidScope error
    pub fn invalid_scope(
        server: impl Into<String>,
        scope: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidScope {
            server: server.into(),
            scope: scope.into(),
            reason: reason.into(),
        }
    }

    /// Create a new TokenValidity error
    pub fn token_validity(
        client: impl Into<String>,
        token: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self::TokenValidity {
            client: client.into(),
            token,
            reason: reason.into(),
        }
    }

    /// Get error category for logging and exit codes
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidLogicalId { .. }
            | Self::InvalidDomainPrefix { .. }
            | Self::InvalidScope { .. }
            | Self::DuplicateScope { .. }
            | Self::DuplicateExport(_)
            | Self::DuplicateLogicalId(_) => ErrorCategory::Naming,
            Self::DanglingScope { .. } | Self::UnknownReference { .. } => ErrorCategory::Reference,
            Self::IncompatibleFlows { .. }
            | Self::MissingSecret { .. }
            | Self::NoFlows { .. }
            | Self::TokenValidity { .. } => ErrorCategory::ClientSettings,
            Self::Validation(_) => ErrorCategory::Validation,
            Self::Json(_) => ErrorCategory::Serialization,
        }
    }
}

/// Error categories for classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Naming,
    Reference,
    ClientSettings,
    Validation,
    Serialization,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Naming => "naming",
            Self::Reference => "reference",
            Self::ClientSettings => "client_settings",
            Self::Validation => "validation",
            Self::Serialization => "serialization",
        };
        f.write_str(name)
    }
}

/// Every issue found by a validation pass.
///
/// Validation does not stop at the first problem so that callers can report
/// all of them at once.
#[derive(Debug, Default)]
pub struct ValidationErrors(Vec<StackError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: StackError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StackError> {
        self.0.iter()
    }

    /// `Ok(())` when nothing was collected
    pub fn into_result(self) -> std::result::Result<(), ValidationErrors> {
        if self.0.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stack definition has {} validation issue(s)", self.0.len())?;
        for error in &self.0 {
            write!(f, "\n  - {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl IntoIterator for ValidationErrors {
    type Item = StackError;
    type IntoIter = std::vec::IntoIter<StackError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Result type for stack operations
pub type Result<T> = std::result::Result<T, StackError>;
