//! Identity pool (Cognito user pool) descriptor.

use serde::{Deserialize, Serialize};

use super::LogicalId;

pub const DEFAULT_VERIFICATION_SUBJECT: &str = "Verify your new account";
pub const DEFAULT_VERIFICATION_MESSAGE: &str =
    "The verification code to your new account is {####}";

// =============================================================================
// Removal Policy
// =============================================================================

/// What happens to the pool (and its users) when the stack is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalPolicy {
    /// Delete the pool together with the stack. No user data is kept.
    #[default]
    Destroy,
    /// Orphan the pool so user data survives stack deletion.
    Retain,
}

impl RemovalPolicy {
    /// Value for the template's `DeletionPolicy` and `UpdateReplacePolicy`.
    pub fn as_deletion_policy(&self) -> &'static str {
        match self {
            Self::Destroy => "Delete",
            Self::Retain => "Retain",
        }
    }
}

// =============================================================================
// Account Recovery
// =============================================================================

/// How users recover a forgotten password.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccountRecovery {
    #[default]
    EmailOnly,
    PhoneOnlyWithoutMfa,
    EmailAndPhoneWithoutMfa,
    PhoneWithoutMfaAndEmail,
    /// Only an administrator can reset the password.
    None,
}

/// One entry of the pool's `AccountRecoverySetting.RecoveryMechanisms`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RecoveryMechanism {
    pub name: &'static str,
    pub priority: u8,
}

impl AccountRecovery {
    /// Recovery mechanisms in priority order.
    pub fn mechanisms(&self) -> Vec<RecoveryMechanism> {
        let names: &[&'static str] = match self {
            Self::EmailOnly => &["verified_email"],
            Self::PhoneOnlyWithoutMfa => &["verified_phone_number"],
            Self::EmailAndPhoneWithoutMfa => &["verified_email", "verified_phone_number"],
            Self::PhoneWithoutMfaAndEmail => &["verified_phone_number", "verified_email"],
            Self::None => &["admin_only"],
        };
        names
            .iter()
            .copied()
            .zip(1u8..)
            .map(|(name, priority)| RecoveryMechanism { name, priority })
            .collect()
    }
}

// =============================================================================
// Verification
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerificationEmailStyle {
    /// Send a one-time code.
    #[default]
    Code,
    /// Send a confirmation link.
    Link,
}

impl VerificationEmailStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Code => "CONFIRM_WITH_CODE",
            Self::Link => "CONFIRM_WITH_LINK",
        }
    }
}

/// Messages sent when a user verifies their email or phone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserVerification {
    pub email_style: VerificationEmailStyle,
    pub email_subject: String,
    pub email_body: String,
    pub sms_message: String,
}

impl Default for UserVerification {
    fn default() -> Self {
        Self {
            email_style: VerificationEmailStyle::Code,
            email_subject: DEFAULT_VERIFICATION_SUBJECT.to_string(),
            email_body: DEFAULT_VERIFICATION_MESSAGE.to_string(),
            sms_message: DEFAULT_VERIFICATION_MESSAGE.to_string(),
        }
    }
}

// =============================================================================
// Attributes
// =============================================================================

/// A standard OIDC attribute in the pool schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardAttribute {
    pub name: String,
    pub required: bool,
    pub mutable: bool,
}

impl StandardAttribute {
    pub fn new(name: impl Into<String>, required: bool, mutable: bool) -> Self {
        Self {
            name: name.into(),
            required,
            mutable,
        }
    }
}

// =============================================================================
// User Pool
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPool {
    pub logical_id: LogicalId,
    pub name: String,
    pub removal_policy: RemovalPolicy,
    pub account_recovery: AccountRecovery,
    pub verification: UserVerification,
    pub standard_attributes: Vec<StandardAttribute>,
    /// When false only administrators can create users.
    pub self_sign_up_enabled: bool,
}

impl UserPool {
    pub fn new(logical_id: LogicalId, name: impl Into<String>) -> Self {
        Self {
            logical_id,
            name: name.into(),
            removal_policy: RemovalPolicy::default(),
            account_recovery: AccountRecovery::default(),
            verification: UserVerification::default(),
            standard_attributes: Vec::new(),
            self_sign_up_enabled: false,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&StandardAttribute> {
        self.standard_attributes.iter().find(|a| a.name == name)
    }
}
