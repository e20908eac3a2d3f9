//! CloudFormation template synthesis.
//!
//! The template is the only artifact this crate produces. Maps keep insertion
//! order so the same definition always serializes to the same bytes.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::Result;
use crate::model::{
    Intrinsic, OAuthScope, RecoveryMechanism, ResourceServer, UserPool, UserPoolClient,
    UserPoolDomain, VerificationEmailStyle,
};
use crate::stack::{ClientSecretStore, StackDefinition};
use crate::token_url::check_token_url;

pub const TEMPLATE_FORMAT_VERSION: &str = "2010-09-09";

pub mod resource_types {
    pub const USER_POOL: &str = "AWS::Cognito::UserPool";
    pub const USER_POOL_DOMAIN: &str = "AWS::Cognito::UserPoolDomain";
    pub const RESOURCE_SERVER: &str = "AWS::Cognito::UserPoolResourceServer";
    pub const USER_POOL_CLIENT: &str = "AWS::Cognito::UserPoolClient";
    pub const SECRET: &str = "AWS::SecretsManager::Secret";
}

// =============================================================================
// Template
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Template {
    #[serde(rename = "AWSTemplateFormatVersion")]
    pub format_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub resources: IndexMap<String, Resource>,
    pub outputs: IndexMap<String, Output>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Resource {
    #[serde(rename = "Type")]
    pub resource_type: String,
    pub properties: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_replace_policy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deletion_policy: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Output {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub value: Intrinsic,
    pub export: Export,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Export {
    pub name: String,
}

impl Template {
    pub fn resource(&self, logical_id: &str) -> Option<&Resource> {
        self.resources.get(logical_id)
    }

    /// Resources of one CloudFormation type, in declaration order.
    pub fn resources_of_type<'a>(
        &'a self,
        resource_type: &'a str,
    ) -> impl Iterator<Item = (&'a String, &'a Resource)> + 'a {
        self.resources
            .iter()
            .filter(move |(_, r)| r.resource_type == resource_type)
    }

    pub fn output_by_export(&self, export_name: &str) -> Option<&Output> {
        self.outputs.values().find(|o| o.export.name == export_name)
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// =============================================================================
// Resource properties
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct UserPoolProperties<'a> {
    account_recovery_setting: AccountRecoverySetting,
    admin_create_user_config: AdminCreateUserConfig,
    email_verification_message: &'a str,
    email_verification_subject: &'a str,
    schema: Vec<SchemaAttribute<'a>>,
    sms_verification_message: &'a str,
    user_pool_name: &'a str,
    verification_message_template: VerificationMessageTemplate<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct AccountRecoverySetting {
    recovery_mechanisms: Vec<RecoveryMechanism>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct AdminCreateUserConfig {
    allow_admin_create_user_only: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SchemaAttribute<'a> {
    mutable: bool,
    name: &'a str,
    required: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct VerificationMessageTemplate<'a> {
    default_email_option: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    email_message: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email_subject: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email_message_by_link: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email_subject_by_link: Option<&'a str>,
    sms_message: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct DomainProperties<'a> {
    domain: &'a str,
    user_pool_id: Intrinsic,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ResourceServerProperties<'a> {
    identifier: &'a str,
    name: &'a str,
    scopes: Vec<ScopeProperties<'a>>,
    user_pool_id: Intrinsic,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ScopeProperties<'a> {
    scope_description: &'a str,
    scope_name: &'a str,
}

#[derive(Serialize)]
struct ClientProperties {
    #[serde(rename = "UserPoolId")]
    user_pool_id: Intrinsic,
    #[serde(rename = "AccessTokenValidity")]
    access_token_validity: i64,
    #[serde(rename = "AllowedOAuthFlows")]
    allowed_oauth_flows: Vec<&'static str>,
    #[serde(rename = "AllowedOAuthFlowsUserPoolClient")]
    allowed_oauth_flows_user_pool_client: bool,
    #[serde(rename = "AllowedOAuthScopes")]
    allowed_oauth_scopes: Vec<Intrinsic>,
    #[serde(rename = "CallbackURLs", skip_serializing_if = "Vec::is_empty")]
    callback_urls: Vec<String>,
    #[serde(rename = "EnableTokenRevocation")]
    enable_token_revocation: bool,
    #[serde(rename = "GenerateSecret")]
    generate_secret: bool,
    #[serde(rename = "RefreshTokenValidity")]
    refresh_token_validity: i64,
    #[serde(rename = "SupportedIdentityProviders")]
    supported_identity_providers: Vec<&'static str>,
    #[serde(rename = "TokenValidityUnits")]
    token_validity_units: TokenValidityUnits,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct TokenValidityUnits {
    access_token: &'static str,
    refresh_token: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SecretProperties<'a> {
    name: &'a str,
    description: &'static str,
    secret_string: Intrinsic,
}

// =============================================================================
// Synthesis
// =============================================================================

/// Validates the definition and renders it as a CloudFormation template.
///
/// # Errors
///
/// Fails with [`crate::StackError::Validation`] when the definition has
/// configuration errors. A malformed token endpoint is only logged.
pub fn synthesize(stack: &StackDefinition) -> Result<Template> {
    stack.validate()?;

    if let Err(e) = check_token_url(&stack.token_endpoint()) {
        warn!(error = %e, url = %stack.token_endpoint(), "Token endpoint output is malformed");
    }

    let mut resources = IndexMap::new();
    resources.insert(
        stack.user_pool.logical_id.to_string(),
        user_pool_resource(&stack.user_pool)?,
    );
    resources.insert(
        stack.domain.logical_id.to_string(),
        domain_resource(&stack.domain)?,
    );
    resources.insert(
        stack.resource_server.logical_id.to_string(),
        resource_server_resource(&stack.resource_server)?,
    );
    resources.insert(
        stack.client.logical_id.to_string(),
        client_resource(&stack.client, &stack.resource_server)?,
    );
    if let Some(store) = &stack.secret_store {
        resources.insert(store.logical_id.to_string(), secret_resource(store)?);
    }

    let outputs: IndexMap<String, Output> = stack
        .outputs
        .iter()
        .map(|o| {
            (
                o.logical_id.to_string(),
                Output {
                    description: o.description.clone(),
                    value: o.value.clone(),
                    export: Export {
                        name: o.export_name.clone(),
                    },
                },
            )
        })
        .collect();

    info!(
        stack = %stack.name,
        resources = resources.len(),
        outputs = outputs.len(),
        "Synthesized template"
    );

    Ok(Template {
        format_version: TEMPLATE_FORMAT_VERSION.to_string(),
        description: stack.description.clone(),
        resources,
        outputs,
    })
}

fn resource(resource_type: &str, properties: impl Serialize) -> Result<Resource> {
    Ok(Resource {
        resource_type: resource_type.to_string(),
        properties: serde_json::to_value(properties)?,
        update_replace_policy: None,
        deletion_policy: None,
    })
}

fn user_pool_resource(pool: &UserPool) -> Result<Resource> {
    let verification = &pool.verification;
    let by_code = verification.email_style == VerificationEmailStyle::Code;
    let template = VerificationMessageTemplate {
        default_email_option: verification.email_style.as_str(),
        email_message: by_code.then_some(verification.email_body.as_str()),
        email_subject: by_code.then_some(verification.email_subject.as_str()),
        email_message_by_link: (!by_code).then_some(verification.email_body.as_str()),
        email_subject_by_link: (!by_code).then_some(verification.email_subject.as_str()),
        sms_message: &verification.sms_message,
    };

    let properties = UserPoolProperties {
        account_recovery_setting: AccountRecoverySetting {
            recovery_mechanisms: pool.account_recovery.mechanisms(),
        },
        admin_create_user_config: AdminCreateUserConfig {
            allow_admin_create_user_only: !pool.self_sign_up_enabled,
        },
        email_verification_message: &verification.email_body,
        email_verification_subject: &verification.email_subject,
        schema: pool
            .standard_attributes
            .iter()
            .map(|a| SchemaAttribute {
                mutable: a.mutable,
                name: &a.name,
                required: a.required,
            })
            .collect(),
        sms_verification_message: &verification.sms_message,
        user_pool_name: &pool.name,
        verification_message_template: template,
    };

    let policy = pool.removal_policy.as_deletion_policy().to_string();
    let mut resource = resource(resource_types::USER_POOL, properties)?;
    resource.update_replace_policy = Some(policy.clone());
    resource.deletion_policy = Some(policy);
    Ok(resource)
}

fn domain_resource(domain: &UserPoolDomain) -> Result<Resource> {
    resource(
        resource_types::USER_POOL_DOMAIN,
        DomainProperties {
            domain: &domain.domain_prefix,
            user_pool_id: Intrinsic::Ref(domain.user_pool.clone()),
        },
    )
}

fn resource_server_resource(server: &ResourceServer) -> Result<Resource> {
    resource(
        resource_types::RESOURCE_SERVER,
        ResourceServerProperties {
            identifier: &server.identifier,
            name: server.display_name(),
            scopes: server
                .scopes
                .iter()
                .map(|s| ScopeProperties {
                    scope_description: &s.description,
                    scope_name: &s.name,
                })
                .collect(),
            user_pool_id: Intrinsic::Ref(server.user_pool.clone()),
        },
    )
}

/// Scopes of the declared resource server are joined onto its `Ref` so the
/// engine creates the resource server before the client.
fn scope_value(scope: &OAuthScope, server: &ResourceServer) -> Intrinsic {
    match scope {
        OAuthScope::ResourceServer {
            server: identifier,
            scope,
        } if *identifier == server.identifier => Intrinsic::concat(vec![
            Intrinsic::Ref(server.logical_id.clone()),
            Intrinsic::literal(format!("/{scope}")),
        ]),
        other => Intrinsic::literal(other.qualified()),
    }
}

fn client_resource(client: &UserPoolClient, server: &ResourceServer) -> Result<Resource> {
    resource(
        resource_types::USER_POOL_CLIENT,
        ClientProperties {
            user_pool_id: Intrinsic::Ref(client.user_pool.clone()),
            access_token_validity: client.access_token_validity.whole_minutes(),
            allowed_oauth_flows: client
                .flows
                .grant_types()
                .iter()
                .map(|g| g.as_str())
                .collect(),
            allowed_oauth_flows_user_pool_client: true,
            allowed_oauth_scopes: client
                .scopes
                .iter()
                .map(|s| scope_value(s, server))
                .collect(),
            callback_urls: client.callback_urls.clone(),
            enable_token_revocation: client.enable_token_revocation,
            generate_secret: client.generate_secret,
            refresh_token_validity: client.refresh_token_validity.whole_minutes(),
            supported_identity_providers: vec!["COGNITO"],
            token_validity_units: TokenValidityUnits {
                access_token: "minutes",
                refresh_token: "minutes",
            },
        },
    )
}

fn secret_resource(store: &ClientSecretStore) -> Result<Resource> {
    resource(
        resource_types::SECRET,
        SecretProperties {
            name: &store.name,
            description: "OAuth2 client secret of the user pool client",
            secret_string: Intrinsic::get_att(&store.client, "ClientSecret"),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::StackSettings;
    use serde_json::json;

    fn template() -> Template {
        let stack = StackDefinition::declare(&StackSettings::default().with_region("us-east-1"));
        synthesize(&stack).unwrap()
    }

    #[test]
    fn test_resource_order_and_types() {
        let template = template();
        let types: Vec<&str> = template
            .resources
            .values()
            .map(|r| r.resource_type.as_str())
            .collect();
        assert_eq!(
            types,
            vec![
                resource_types::USER_POOL,
                resource_types::USER_POOL_DOMAIN,
                resource_types::RESOURCE_SERVER,
                resource_types::USER_POOL_CLIENT,
            ]
        );
    }

    #[test]
    fn test_domain_properties() {
        let template = template();
        let domain = template.resource("CognitoUserPoolCognitoDomainName").unwrap();
        assert_eq!(
            domain.properties,
            json!({
                "Domain": "marcio-oauth2-userpool",
                "UserPoolId": { "Ref": "CognitoUserPool" }
            })
        );
    }

    #[test]
    fn test_invalid_definition_is_not_synthesized() {
        let mut stack = StackDefinition::declare(&StackSettings::default());
        stack.client.generate_secret = false;
        let err = synthesize(&stack).unwrap_err();
        assert!(matches!(err, crate::StackError::Validation(_)));
    }

    #[test]
    fn test_serialization_is_stable() {
        let first = template().to_json_pretty().unwrap();
        let second = template().to_json_pretty().unwrap();
        assert_eq!(first, second);
        assert!(first.starts_with("{\n  \"AWSTemplateFormatVersion\": \"2010-09-09\""));
    }
}
