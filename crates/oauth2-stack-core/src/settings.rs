//! Construction parameters for the stack.
//!
//! Defaults reproduce the single fixed deployment. Every identifier that
//! must be unique per account and region lives here so a second deployment
//! only needs a different settings value.

use serde::{Deserialize, Serialize};
use time::Duration;

use crate::model::RemovalPolicy;

pub const DEFAULT_STACK_NAME: &str = "Oauth2AwsStack";
pub const DEFAULT_USER_POOL_NAME: &str = "marcio-oauth2-userpool";
pub const DEFAULT_DOMAIN_PREFIX: &str = "marcio-oauth2-userpool";
pub const DEFAULT_RESOURCE_SERVER_ID: &str = "marcio-oauth2-resource-server";

/// Where the generated client secret ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SecretExposure {
    /// The `client-secret` output carries the plaintext secret.
    ///
    /// Anyone able to read stack outputs can read the secret.
    #[default]
    PlaintextOutput,
    /// The secret is stored in a Secrets Manager secret and the
    /// `client-secret` output carries that secret's ARN.
    SecretsManager,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackSettings {
    pub stack_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub user_pool_name: String,
    /// Hosted domain prefix, globally unique within the region.
    pub domain_prefix: String,
    /// Resource server identifier, prefix of every granted scope.
    pub resource_server_id: String,
    /// `destroy` drops user data with the stack; production should use `retain`.
    pub removal_policy: RemovalPolicy,
    pub access_token_validity_minutes: i64,
    pub refresh_token_validity_days: i64,
    pub secret_exposure: SecretExposure,
    /// Deployment region substituted into the token endpoint output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl Default for StackSettings {
    fn default() -> Self {
        Self {
            stack_name: DEFAULT_STACK_NAME.to_string(),
            description: None,
            user_pool_name: DEFAULT_USER_POOL_NAME.to_string(),
            domain_prefix: DEFAULT_DOMAIN_PREFIX.to_string(),
            resource_server_id: DEFAULT_RESOURCE_SERVER_ID.to_string(),
            removal_policy: RemovalPolicy::Destroy,
            access_token_validity_minutes: 60,
            refresh_token_validity_days: 1,
            secret_exposure: SecretExposure::PlaintextOutput,
            region: None,
        }
    }
}

impl StackSettings {
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn access_token_validity(&self) -> Duration {
        Duration::minutes(self.access_token_validity_minutes)
    }

    pub fn refresh_token_validity(&self) -> Duration {
        Duration::days(self.refresh_token_validity_days)
    }

    /// The region, treating an empty string like an unset value.
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref().filter(|r| !r.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_fixed_deployment() {
        let settings = StackSettings::default();
        assert_eq!(settings.domain_prefix, "marcio-oauth2-userpool");
        assert_eq!(settings.resource_server_id, "marcio-oauth2-resource-server");
        assert_eq!(settings.access_token_validity(), Duration::minutes(60));
        assert_eq!(settings.refresh_token_validity(), Duration::days(1));
        assert_eq!(settings.removal_policy, RemovalPolicy::Destroy);
        assert_eq!(settings.secret_exposure, SecretExposure::PlaintextOutput);
        assert!(settings.region().is_none());
    }

    #[test]
    fn test_blank_region_is_unset() {
        assert!(StackSettings::default().with_region("").region().is_none());
        assert_eq!(
            StackSettings::default().with_region("eu-west-1").region(),
            Some("eu-west-1")
        );
    }

    #[test]
    fn test_deserialize_partial() {
        let settings: StackSettings = serde_json::from_value(serde_json::json!({
            "domain_prefix": "other-pool",
            "removal_policy": "retain",
            "secret_exposure": "secrets-manager"
        }))
        .unwrap();
        assert_eq!(settings.domain_prefix, "other-pool");
        assert_eq!(settings.removal_policy, RemovalPolicy::Retain);
        assert_eq!(settings.secret_exposure, SecretExposure::SecretsManager);
        assert_eq!(settings.resource_server_id, DEFAULT_RESOURCE_SERVER_ID);
    }
}
