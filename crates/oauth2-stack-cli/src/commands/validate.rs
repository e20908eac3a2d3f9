use anyhow::{Result, bail};
use colored::Colorize;
use oauth2_stack_core::{StackDefinition, check_token_url};

use crate::output::{print_error, print_success, print_warning};

/// Everything `validate` found, token endpoint problems included.
pub struct Report {
    pub issues: Vec<String>,
    pub warnings: Vec<String>,
}

impl Report {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

pub fn check(stack: &StackDefinition) -> Report {
    let mut issues: Vec<String> = match stack.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => errors
            .iter()
            .map(|e| format!("[{}] {e}", e.category()))
            .collect(),
    };

    let url = stack.token_endpoint();
    if let Err(e) = check_token_url(&url) {
        issues.push(format!("[token_url] {url}: {e}"));
    }

    let mut warnings = Vec::new();
    if stack.region.is_none() {
        warnings.push(
            "No region set; pass --region or set CDK_DEFAULT_REGION / AWS_REGION".to_string(),
        );
    }
    if stack.secret_store.is_none() {
        warnings.push(
            "client-secret is exported in plaintext; set stack.secret_exposure = \"secrets-manager\" to store it in Secrets Manager"
                .to_string(),
        );
    }

    Report { issues, warnings }
}

pub fn validate(stack: &StackDefinition) -> Result<()> {
    let report = check(stack);
    for warning in &report.warnings {
        print_warning(warning);
    }
    for issue in &report.issues {
        print_error(issue);
    }
    if !report.is_clean() {
        bail!("{} issue(s) found in stack {}", report.issues.len(), stack.name);
    }
    print_success(&format!("Stack {} is valid", stack.name.cyan()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use oauth2_stack_core::{SecretExposure, StackSettings};

    #[test]
    fn test_clean_stack_with_region() {
        let settings = StackSettings {
            secret_exposure: SecretExposure::SecretsManager,
            ..StackSettings::default()
        }
        .with_region("us-east-1");
        let report = check(&StackDefinition::declare(&settings));
        assert!(report.is_clean());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_missing_region_flags_token_url() {
        let report = check(&StackDefinition::declare(&StackSettings::default()));
        assert!(!report.is_clean());
        assert_eq!(report.issues.len(), 1);
        assert!(report.issues[0].starts_with("[token_url]"));
        assert!(report.issues[0].contains("auth..amazoncognito.com"));
        assert_eq!(report.warnings.len(), 2);
    }

    #[test]
    fn test_definition_issues_are_categorized() {
        let mut stack =
            StackDefinition::declare(&StackSettings::default().with_region("us-east-1"));
        stack.client.generate_secret = false;
        let report = check(&stack);
        assert_eq!(report.issues.len(), 1);
        assert!(report.issues[0].starts_with("[client_settings]"));
    }
}
