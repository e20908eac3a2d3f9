//! Hosted domain serving the pool's OAuth2 endpoints.

use super::LogicalId;
use crate::error::{Result, StackError};

const MAX_PREFIX_LEN: usize = 63;
const RESERVED_WORDS: [&str; 3] = ["aws", "amazon", "cognito"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPoolDomain {
    pub logical_id: LogicalId,
    /// First label of `https://{prefix}.auth.{region}.amazoncognito.com`.
    pub domain_prefix: String,
    /// Pool the domain is attached to.
    pub user_pool: LogicalId,
}

impl UserPoolDomain {
    pub fn validate(&self) -> Result<()> {
        validate_domain_prefix(&self.domain_prefix)
    }
}

/// Checks a hosted domain prefix against the platform's naming rules.
///
/// Uniqueness across accounts can only be checked by the platform at apply time.
pub fn validate_domain_prefix(prefix: &str) -> Result<()> {
    if prefix.is_empty() {
        return Err(StackError::invalid_domain_prefix(prefix, "must not be empty"));
    }
    if prefix.len() > MAX_PREFIX_LEN {
        return Err(StackError::invalid_domain_prefix(
            prefix,
            format!("must be at most {MAX_PREFIX_LEN} characters"),
        ));
    }
    if !prefix
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(StackError::invalid_domain_prefix(
            prefix,
            "only lowercase letters, digits and hyphens are allowed",
        ));
    }
    if prefix.starts_with('-') || prefix.ends_with('-') {
        return Err(StackError::invalid_domain_prefix(
            prefix,
            "must not start or end with a hyphen",
        ));
    }
    if let Some(word) = RESERVED_WORDS.iter().find(|w| prefix.contains(*w)) {
        return Err(StackError::invalid_domain_prefix(
            prefix,
            format!("must not contain the reserved word '{word}'"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prefix_is_valid() {
        assert!(validate_domain_prefix("marcio-oauth2-userpool").is_ok());
    }

    #[test]
    fn test_rejects_bad_prefixes() {
        assert!(validate_domain_prefix("").is_err());
        assert!(validate_domain_prefix("Upper").is_err());
        assert!(validate_domain_prefix("-leading").is_err());
        assert!(validate_domain_prefix("trailing-").is_err());
        assert!(validate_domain_prefix("my.pool").is_err());
        assert!(validate_domain_prefix(&"a".repeat(64)).is_err());
    }

    #[test]
    fn test_rejects_reserved_words() {
        let err = validate_domain_prefix("my-cognito-pool").unwrap_err();
        assert!(err.to_string().contains("cognito"));
        assert!(validate_domain_prefix("awsome").is_err());
    }
}
