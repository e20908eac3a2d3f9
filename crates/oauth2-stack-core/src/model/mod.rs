//! Descriptors for the managed resources a stack declares.
//!
//! None of these types talk to the identity platform. They describe desired
//! state that the provisioning engine later turns into live resources.

mod client;
mod domain;
mod intrinsic;
mod logical_id;
mod output;
mod resource_server;
mod user_pool;

pub use client::{
    GrantType, MAX_ACCESS_TOKEN_VALIDITY, MAX_REFRESH_TOKEN_VALIDITY, MIN_ACCESS_TOKEN_VALIDITY,
    MIN_REFRESH_TOKEN_VALIDITY, OAuthFlows, OAuthScope, StandardScope, UserPoolClient,
};
pub use domain::{UserPoolDomain, validate_domain_prefix};
pub use intrinsic::Intrinsic;
pub use logical_id::LogicalId;
pub use output::StackOutput;
pub use resource_server::{ResourceServer, ResourceServerScope};
pub use user_pool::{
    AccountRecovery, DEFAULT_VERIFICATION_MESSAGE, DEFAULT_VERIFICATION_SUBJECT,
    RecoveryMechanism, RemovalPolicy, StandardAttribute, UserPool, UserVerification,
    VerificationEmailStyle,
};
