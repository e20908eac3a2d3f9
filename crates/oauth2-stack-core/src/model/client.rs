//! OAuth2 application client descriptor.

use std::fmt;

use time::Duration;

use super::{LogicalId, ResourceServer};
use crate::error::{StackError, ValidationErrors};

/// Platform bounds on token lifetimes.
pub const MIN_ACCESS_TOKEN_VALIDITY: Duration = Duration::minutes(5);
pub const MAX_ACCESS_TOKEN_VALIDITY: Duration = Duration::days(1);
pub const MIN_REFRESH_TOKEN_VALIDITY: Duration = Duration::minutes(60);
pub const MAX_REFRESH_TOKEN_VALIDITY: Duration = Duration::days(3650);

// =============================================================================
// Grant Type
// =============================================================================

/// OAuth 2.0 grant types a pool client may be allowed to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrantType {
    AuthorizationCode,
    Implicit,
    ClientCredentials,
}

impl GrantType {
    /// Value used in `AllowedOAuthFlows` and in the token request.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthorizationCode => "code",
            Self::Implicit => "implicit",
            Self::ClientCredentials => "client_credentials",
        }
    }
}

impl fmt::Display for GrantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which OAuth flows are enabled on a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OAuthFlows {
    pub authorization_code_grant: bool,
    pub implicit_code_grant: bool,
    pub client_credentials: bool,
}

impl OAuthFlows {
    /// Machine-to-machine only.
    pub fn client_credentials_only() -> Self {
        Self {
            client_credentials: true,
            ..Default::default()
        }
    }

    /// Enabled flows in template order.
    pub fn grant_types(&self) -> Vec<GrantType> {
        let mut grants = Vec::new();
        if self.client_credentials {
            grants.push(GrantType::ClientCredentials);
        }
        if self.implicit_code_grant {
            grants.push(GrantType::Implicit);
        }
        if self.authorization_code_grant {
            grants.push(GrantType::AuthorizationCode);
        }
        grants
    }

    /// True when a flow needs an end user (and therefore callback URLs).
    pub fn is_interactive(&self) -> bool {
        self.authorization_code_grant || self.implicit_code_grant
    }
}

// =============================================================================
// Scopes
// =============================================================================

/// Built-in OIDC scopes the platform understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardScope {
    OpenId,
    Email,
    Phone,
    Profile,
    CognitoAdmin,
}

impl StandardScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenId => "openid",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Profile => "profile",
            Self::CognitoAdmin => "aws.cognito.signin.user.admin",
        }
    }
}

/// A scope granted to a client.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OAuthScope {
    Standard(StandardScope),
    /// A scope owned by a resource server, rendered as `{server}/{scope}`.
    ResourceServer { server: String, scope: String },
}

impl OAuthScope {
    pub fn resource_server(server: &ResourceServer, scope: &str) -> Self {
        Self::ResourceServer {
            server: server.identifier.clone(),
            scope: scope.to_string(),
        }
    }

    pub fn qualified(&self) -> String {
        match self {
            Self::Standard(scope) => scope.as_str().to_string(),
            Self::ResourceServer { server, scope } => format!("{server}/{scope}"),
        }
    }
}

impl fmt::Display for OAuthScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified())
    }
}

// =============================================================================
// Client
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPoolClient {
    pub logical_id: LogicalId,
    pub user_pool: LogicalId,
    pub access_token_validity: Duration,
    pub refresh_token_validity: Duration,
    pub generate_secret: bool,
    pub enable_token_revocation: bool,
    pub flows: OAuthFlows,
    pub scopes: Vec<OAuthScope>,
    /// Only meaningful for interactive flows.
    pub callback_urls: Vec<String>,
}

impl UserPoolClient {
    /// Checks flow combination, secret and token lifetimes.
    ///
    /// Scope references are checked by the stack, which knows the resource
    /// servers.
    pub(crate) fn collect_issues(&self, issues: &mut ValidationErrors) {
        let client = self.logical_id.to_string();

        if self.flows.grant_types().is_empty() {
            issues.push(StackError::NoFlows {
                client: client.clone(),
            });
        }
        if self.flows.client_credentials {
            if self.flows.authorization_code_grant {
                issues.push(StackError::IncompatibleFlows {
                    client: client.clone(),
                    other: GrantType::AuthorizationCode.to_string(),
                });
            }
            if self.flows.implicit_code_grant {
                issues.push(StackError::IncompatibleFlows {
                    client: client.clone(),
                    other: GrantType::Implicit.to_string(),
                });
            }
            if !self.generate_secret {
                issues.push(StackError::MissingSecret {
                    client: client.clone(),
                });
            }
        }

        check_range(
            issues,
            &client,
            "access",
            self.access_token_validity,
            MIN_ACCESS_TOKEN_VALIDITY,
            MAX_ACCESS_TOKEN_VALIDITY,
        );
        check_range(
            issues,
            &client,
            "refresh",
            self.refresh_token_validity,
            MIN_REFRESH_TOKEN_VALIDITY,
            MAX_REFRESH_TOKEN_VALIDITY,
        );
        if self.refresh_token_validity <= self.access_token_validity {
            issues.push(StackError::token_validity(
                client,
                "refresh",
                "must be longer than the access token validity",
            ));
        }
    }
}

fn check_range(
    issues: &mut ValidationErrors,
    client: &str,
    token: &'static str,
    value: Duration,
    min: Duration,
    max: Duration,
) {
    if value < min || value > max {
        issues.push(StackError::token_validity(
            client,
            token,
            format!(
                "{} minutes is outside {}..={} minutes",
                value.whole_minutes(),
                min.whole_minutes(),
                max.whole_minutes()
            ),
        ));
    }
}
