//! Resource server (logical API) and the scopes it owns.

use std::collections::HashSet;

use super::LogicalId;
use crate::error::{StackError, ValidationErrors};

/// A named permission on a resource server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceServerScope {
    pub name: String,
    pub description: String,
}

impl ResourceServerScope {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceServer {
    pub logical_id: LogicalId,
    /// Globally meaningful identifier, also the prefix of every scope string.
    pub identifier: String,
    /// Display name; the identifier is used when unset.
    pub name: Option<String>,
    pub user_pool: LogicalId,
    pub scopes: Vec<ResourceServerScope>,
}

impl ResourceServer {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.identifier)
    }

    pub fn scope(&self, name: &str) -> Option<&ResourceServerScope> {
        self.scopes.iter().find(|s| s.name == name)
    }

    pub fn has_scope(&self, name: &str) -> bool {
        self.scope(name).is_some()
    }

    /// `{identifier}/{scope}`, the form clients request and tokens carry.
    pub fn qualified_scope(&self, name: &str) -> String {
        format!("{}/{}", self.identifier, name)
    }

    pub(crate) fn collect_issues(&self, issues: &mut ValidationErrors) {
        let mut seen = HashSet::new();
        for scope in &self.scopes {
            if let Some(reason) = scope_name_problem(&scope.name) {
                issues.push(StackError::invalid_scope(&self.identifier, &scope.name, reason));
            }
            if scope.description.trim().is_empty() {
                issues.push(StackError::invalid_scope(
                    &self.identifier,
                    &scope.name,
                    "description must not be empty",
                ));
            }
            if !seen.insert(scope.name.as_str()) {
                issues.push(StackError::DuplicateScope {
                    server: self.identifier.clone(),
                    scope: scope.name.clone(),
                });
            }
        }
    }
}

fn scope_name_problem(name: &str) -> Option<&'static str> {
    if name.is_empty() {
        Some("name must not be empty")
    } else if name.chars().any(char::is_whitespace) {
        Some("name must not contain whitespace")
    } else if name.contains('/') {
        Some("name must not contain '/'")
    } else {
        None
    }
}
