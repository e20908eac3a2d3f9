use std::collections::BTreeSet;

use assert_json_diff::assert_json_include;
use oauth2_stack_core::template::resource_types;
use oauth2_stack_core::{
    StackDefinition, StackSettings, TokenUrlError, check_token_url, exports, synthesize,
};
use serde_json::{Value, json};

fn synthesized(region: Option<&str>) -> Value {
    let mut settings = StackSettings::default();
    settings.region = region.map(str::to_string);
    let stack = StackDefinition::declare(&settings);
    synthesize(&stack)
        .expect("default stack should synthesize")
        .to_value()
        .expect("template should serialize")
}

fn resources_of_type<'a>(template: &'a Value, resource_type: &str) -> Vec<&'a Value> {
    template["Resources"]
        .as_object()
        .expect("Resources object")
        .values()
        .filter(|r| r["Type"] == resource_type)
        .collect()
}

#[test]
fn single_user_pool_with_destroy_policy_and_email_recovery() {
    let template = synthesized(Some("us-east-1"));
    let pools = resources_of_type(&template, resource_types::USER_POOL);
    assert_eq!(pools.len(), 1);

    let pool = pools[0];
    assert_eq!(pool["DeletionPolicy"], "Delete");
    assert_eq!(pool["UpdateReplacePolicy"], "Delete");
    assert_json_include!(
        actual: pool["Properties"].clone(),
        expected: json!({
            "UserPoolName": "marcio-oauth2-userpool",
            "AccountRecoverySetting": {
                "RecoveryMechanisms": [{ "Name": "verified_email", "Priority": 1 }]
            },
            "VerificationMessageTemplate": { "DefaultEmailOption": "CONFIRM_WITH_CODE" },
            "Schema": [{ "Name": "email", "Required": true, "Mutable": true }]
        })
    );
}

#[test]
fn hosted_domain_attached_to_pool() {
    let template = synthesized(Some("us-east-1"));
    let domains = resources_of_type(&template, resource_types::USER_POOL_DOMAIN);
    assert_eq!(domains.len(), 1);
    assert_eq!(domains[0]["Properties"]["Domain"], "marcio-oauth2-userpool");
    assert_eq!(
        domains[0]["Properties"]["UserPoolId"],
        json!({ "Ref": "CognitoUserPool" })
    );
}

#[test]
fn resource_server_declares_exactly_two_described_scopes() {
    let template = synthesized(Some("us-east-1"));
    let servers = resources_of_type(&template, resource_types::RESOURCE_SERVER);
    assert_eq!(servers.len(), 1);

    let properties = &servers[0]["Properties"];
    assert_eq!(properties["Identifier"], "marcio-oauth2-resource-server");

    let scopes = properties["Scopes"].as_array().expect("Scopes array");
    let names: Vec<&str> = scopes
        .iter()
        .map(|s| s["ScopeName"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["user.read", "user.write"]);
    for scope in scopes {
        assert!(!scope["ScopeDescription"].as_str().unwrap().is_empty());
    }
}

#[test]
fn client_uses_only_client_credentials_with_both_scopes() {
    let template = synthesized(Some("us-east-1"));
    let clients = resources_of_type(&template, resource_types::USER_POOL_CLIENT);
    assert_eq!(clients.len(), 1);

    let properties = &clients[0]["Properties"];
    assert_eq!(properties["AllowedOAuthFlows"], json!(["client_credentials"]));
    assert_eq!(properties["AllowedOAuthFlowsUserPoolClient"], true);
    assert!(properties.get("CallbackURLs").is_none());
    assert_eq!(
        properties["AllowedOAuthScopes"],
        json!([
            { "Fn::Join": ["", [{ "Ref": "CognitoResourceServer" }, "/user.read"]] },
            { "Fn::Join": ["", [{ "Ref": "CognitoResourceServer" }, "/user.write"]] }
        ])
    );

    let stack = StackDefinition::declare(&StackSettings::default());
    let granted: BTreeSet<String> = stack.granted_scopes().into_iter().collect();
    let expected: BTreeSet<String> = [
        "marcio-oauth2-resource-server/user.read",
        "marcio-oauth2-resource-server/user.write",
    ]
    .into_iter()
    .map(String::from)
    .collect();
    assert_eq!(granted, expected);
}

#[test]
fn client_token_settings() {
    let template = synthesized(Some("us-east-1"));
    let client = resources_of_type(&template, resource_types::USER_POOL_CLIENT)[0];
    assert_json_include!(
        actual: client["Properties"].clone(),
        expected: json!({
            "AccessTokenValidity": 60,
            "RefreshTokenValidity": 1440,
            "TokenValidityUnits": { "AccessToken": "minutes", "RefreshToken": "minutes" },
            "GenerateSecret": true,
            "EnableTokenRevocation": true,
            "UserPoolId": { "Ref": "CognitoUserPool" }
        })
    );
}

#[test]
fn all_outputs_exported_with_expected_names() {
    let template = synthesized(Some("eu-central-1"));
    let outputs = template["Outputs"].as_object().expect("Outputs object");

    let export_names: Vec<&str> = outputs
        .values()
        .map(|o| o["Export"]["Name"].as_str().unwrap())
        .collect();
    assert_eq!(export_names, exports::ALL.to_vec());

    assert_eq!(outputs["clientid"]["Value"], json!({ "Ref": "CognitoUserPoolClient" }));
    assert_eq!(
        outputs["clientsecret"]["Value"],
        json!({ "Fn::GetAtt": ["CognitoUserPoolClient", "ClientSecret"] })
    );
    assert_eq!(
        outputs["scoperead"]["Value"],
        "marcio-oauth2-resource-server/user.read"
    );
    assert_eq!(
        outputs["scopewrite"]["Value"],
        "marcio-oauth2-resource-server/user.write"
    );
    assert_eq!(outputs["granttype"]["Value"], "client_credentials");
    assert_eq!(
        outputs["url"]["Value"],
        "https://marcio-oauth2-userpool.auth.eu-central-1.amazoncognito.com/oauth2/token"
    );

    let url = outputs["url"]["Value"].as_str().unwrap();
    assert!(check_token_url(url).is_ok());
}

#[test]
fn missing_region_yields_flagged_url_without_failing() {
    let template = synthesized(None);
    let url = template["Outputs"]["url"]["Value"]
        .as_str()
        .expect("url output is a literal");

    assert_eq!(
        url,
        "https://marcio-oauth2-userpool.auth..amazoncognito.com/oauth2/token"
    );
    assert_eq!(check_token_url(url), Err(TokenUrlError::ConsecutiveDots));
}

#[test]
fn custom_identifiers_flow_through_to_outputs() {
    let settings = StackSettings {
        domain_prefix: "tenant-b-pool".to_string(),
        resource_server_id: "tenant-b-api".to_string(),
        ..StackSettings::default()
    }
    .with_region("ap-southeast-2");
    let template = synthesize(&StackDefinition::declare(&settings))
        .unwrap()
        .to_value()
        .unwrap();

    assert_eq!(template["Outputs"]["scoperead"]["Value"], "tenant-b-api/user.read");
    assert_eq!(
        template["Outputs"]["url"]["Value"],
        "https://tenant-b-pool.auth.ap-southeast-2.amazoncognito.com/oauth2/token"
    );
}

#[test]
fn secrets_manager_exposure_replaces_plaintext_output() {
    let settings = StackSettings {
        secret_exposure: oauth2_stack_core::SecretExposure::SecretsManager,
        ..StackSettings::default()
    }
    .with_region("us-west-2");
    let template = synthesize(&StackDefinition::declare(&settings))
        .unwrap()
        .to_value()
        .unwrap();

    let secrets = resources_of_type(&template, resource_types::SECRET);
    assert_eq!(secrets.len(), 1);
    assert_eq!(
        secrets[0]["Properties"]["SecretString"],
        json!({ "Fn::GetAtt": ["CognitoUserPoolClient", "ClientSecret"] })
    );
    assert_eq!(
        template["Outputs"]["clientsecret"]["Value"],
        json!({ "Ref": "CognitoUserPoolClientSecret" })
    );
}
