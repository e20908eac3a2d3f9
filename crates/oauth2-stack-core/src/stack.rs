//! The stack definition: one user pool, its hosted domain, a resource server
//! with two scopes, a client-credentials client and six exported outputs.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::error::{StackError, ValidationErrors};
use crate::model::{
    AccountRecovery, GrantType, Intrinsic, LogicalId, OAuthFlows, OAuthScope, ResourceServer,
    ResourceServerScope, StackOutput, StandardAttribute, UserPool, UserPoolClient,
    UserPoolDomain, UserVerification, VerificationEmailStyle,
};
use crate::settings::{SecretExposure, StackSettings};
use crate::token_url::token_endpoint_url;

/// Logical ids of the declared resources.
pub mod ids {
    pub const USER_POOL: &str = "CognitoUserPool";
    pub const DOMAIN: &str = "CognitoUserPoolCognitoDomainName";
    pub const RESOURCE_SERVER: &str = "CognitoResourceServer";
    pub const CLIENT: &str = "CognitoUserPoolClient";
    pub const CLIENT_SECRET_STORE: &str = "CognitoUserPoolClientSecret";
    pub const TOKEN_URL_OUTPUT: &str = "url";
}

/// Export names of the stack outputs.
pub mod exports {
    pub const CLIENT_ID: &str = "client-id";
    pub const CLIENT_SECRET: &str = "client-secret";
    pub const SCOPE_READ: &str = "scope-read";
    pub const SCOPE_WRITE: &str = "scope-write";
    pub const GRANT_TYPE: &str = "grant-type";
    pub const TOKEN_URL: &str = "cognito-oauth2-url";

    pub const ALL: [&str; 6] = [
        CLIENT_ID,
        CLIENT_SECRET,
        SCOPE_READ,
        SCOPE_WRITE,
        GRANT_TYPE,
        TOKEN_URL,
    ];
}

pub const SCOPE_USER_READ: &str = "user.read";
pub const SCOPE_USER_WRITE: &str = "user.write";

/// Secrets Manager secret holding the client secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSecretStore {
    pub logical_id: LogicalId,
    pub name: String,
    pub client: LogicalId,
}

/// Desired end state of every resource in the stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackDefinition {
    pub name: String,
    pub description: Option<String>,
    pub region: Option<String>,
    pub user_pool: UserPool,
    pub domain: UserPoolDomain,
    pub resource_server: ResourceServer,
    pub client: UserPoolClient,
    pub secret_store: Option<ClientSecretStore>,
    pub outputs: Vec<StackOutput>,
}

impl StackDefinition {
    /// Declares the stack from its settings.
    ///
    /// Deterministic and infallible. Problems with the settings are reported
    /// by [`StackDefinition::validate`], and a missing region only produces a
    /// malformed token endpoint output.
    pub fn declare(settings: &StackSettings) -> Self {
        let pool_id = LogicalId::from_static(ids::USER_POOL);

        let mut user_pool = UserPool::new(pool_id.clone(), &settings.user_pool_name);
        user_pool.removal_policy = settings.removal_policy;
        user_pool.account_recovery = AccountRecovery::EmailOnly;
        user_pool.verification = UserVerification {
            email_style: VerificationEmailStyle::Code,
            ..Default::default()
        };
        user_pool.standard_attributes = vec![StandardAttribute::new("email", true, true)];
        debug!(
            logical_id = %user_pool.logical_id,
            name = %user_pool.name,
            removal_policy = user_pool.removal_policy.as_deletion_policy(),
            "Declared user pool"
        );

        let domain = UserPoolDomain {
            logical_id: LogicalId::from_static(ids::DOMAIN),
            domain_prefix: settings.domain_prefix.clone(),
            user_pool: pool_id.clone(),
        };
        debug!(logical_id = %domain.logical_id, prefix = %domain.domain_prefix, "Declared hosted domain");

        let resource_server = ResourceServer {
            logical_id: LogicalId::from_static(ids::RESOURCE_SERVER),
            identifier: settings.resource_server_id.clone(),
            name: None,
            user_pool: pool_id.clone(),
            scopes: vec![
                ResourceServerScope::new(SCOPE_USER_READ, "user read scope"),
                ResourceServerScope::new(SCOPE_USER_WRITE, "user write scope"),
            ],
        };
        debug!(
            logical_id = %resource_server.logical_id,
            identifier = %resource_server.identifier,
            scopes = resource_server.scopes.len(),
            "Declared resource server"
        );

        let client = UserPoolClient {
            logical_id: LogicalId::from_static(ids::CLIENT),
            user_pool: pool_id,
            access_token_validity: settings.access_token_validity(),
            refresh_token_validity: settings.refresh_token_validity(),
            generate_secret: true,
            enable_token_revocation: true,
            flows: OAuthFlows::client_credentials_only(),
            scopes: vec![
                OAuthScope::resource_server(&resource_server, SCOPE_USER_READ),
                OAuthScope::resource_server(&resource_server, SCOPE_USER_WRITE),
            ],
            callback_urls: Vec::new(),
        };
        debug!(logical_id = %client.logical_id, scopes = client.scopes.len(), "Declared application client");

        let secret_store = match settings.secret_exposure {
            SecretExposure::PlaintextOutput => None,
            SecretExposure::SecretsManager => Some(ClientSecretStore {
                logical_id: LogicalId::from_static(ids::CLIENT_SECRET_STORE),
                name: format!("{}/client-secret", settings.stack_name),
                client: client.logical_id.clone(),
            }),
        };

        let region = settings.region().map(str::to_string);
        if region.is_none() {
            warn!(
                stack = %settings.stack_name,
                "No deployment region set; the token endpoint output will contain an empty segment"
            );
        }

        let client_secret = match &secret_store {
            Some(store) => Intrinsic::Ref(store.logical_id.clone()),
            None => Intrinsic::get_att(&client.logical_id, "ClientSecret"),
        };

        let outputs = vec![
            StackOutput::exported(exports::CLIENT_ID, Intrinsic::Ref(client.logical_id.clone())),
            StackOutput::exported(exports::CLIENT_SECRET, client_secret),
            StackOutput::exported(
                exports::SCOPE_READ,
                resource_server.qualified_scope(SCOPE_USER_READ),
            ),
            StackOutput::exported(
                exports::SCOPE_WRITE,
                resource_server.qualified_scope(SCOPE_USER_WRITE),
            ),
            StackOutput::exported(exports::GRANT_TYPE, GrantType::ClientCredentials.as_str()),
            StackOutput::exported(
                exports::TOKEN_URL,
                token_endpoint_url(&domain.domain_prefix, region.as_deref()),
            )
            .with_logical_id(LogicalId::from_static(ids::TOKEN_URL_OUTPUT)),
        ];

        Self {
            name: settings.stack_name.clone(),
            description: settings.description.clone(),
            region,
            user_pool,
            domain,
            resource_server,
            client,
            secret_store,
            outputs,
        }
    }

    /// Collects every configuration error in the definition.
    ///
    /// # Errors
    ///
    /// Returns all issues found; an empty region is not one of them.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut issues = ValidationErrors::new();

        self.check_logical_ids(&mut issues);
        if let Err(e) = self.domain.validate() {
            issues.push(e);
        }
        self.resource_server.collect_issues(&mut issues);
        self.client.collect_issues(&mut issues);
        self.check_client_scopes(&mut issues);
        self.check_outputs(&mut issues);

        issues.into_result()
    }

    fn resource_ids(&self) -> Vec<&LogicalId> {
        let mut ids = vec![
            &self.user_pool.logical_id,
            &self.domain.logical_id,
            &self.resource_server.logical_id,
            &self.client.logical_id,
        ];
        if let Some(store) = &self.secret_store {
            ids.push(&store.logical_id);
        }
        ids
    }

    fn check_logical_ids(&self, issues: &mut ValidationErrors) {
        let mut seen = HashSet::new();
        let all = self
            .resource_ids()
            .into_iter()
            .chain(self.outputs.iter().map(|o| &o.logical_id));
        for id in all {
            if let Err(e) = id.check() {
                issues.push(e);
            }
            if !seen.insert(id.as_str()) {
                issues.push(StackError::DuplicateLogicalId(id.to_string()));
            }
        }
    }

    /// Every resource-server scope granted to the client must exist.
    fn check_client_scopes(&self, issues: &mut ValidationErrors) {
        for scope in &self.client.scopes {
            let OAuthScope::ResourceServer { server, scope } = scope else {
                continue;
            };
            let declared = self.resource_server.identifier == *server
                && self.resource_server.has_scope(scope);
            if !declared {
                issues.push(StackError::DanglingScope {
                    server: server.clone(),
                    scope: scope.clone(),
                });
            }
        }
    }

    fn check_outputs(&self, issues: &mut ValidationErrors) {
        let resources = self.resource_ids();
        let mut exports = HashSet::new();
        for output in &self.outputs {
            if !exports.insert(output.export_name.as_str()) {
                issues.push(StackError::DuplicateExport(output.export_name.clone()));
            }
            for reference in output.value.references() {
                if !resources.contains(&reference) {
                    issues.push(StackError::UnknownReference {
                        output: output.export_name.clone(),
                        resource: reference.to_string(),
                    });
                }
            }
        }
    }

    pub fn output(&self, export_name: &str) -> Option<&StackOutput> {
        self.outputs.iter().find(|o| o.export_name == export_name)
    }

    /// Token endpoint as exported, built by interpolation.
    pub fn token_endpoint(&self) -> String {
        token_endpoint_url(&self.domain.domain_prefix, self.region.as_deref())
    }

    /// Fully qualified scopes granted to the client.
    pub fn granted_scopes(&self) -> Vec<String> {
        self.client.scopes.iter().map(OAuthScope::qualified).collect()
    }
}
