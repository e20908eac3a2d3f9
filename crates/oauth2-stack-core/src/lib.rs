//! Desired-state model for an OAuth2 client-credentials identity stack.
//!
//! The stack consists of a Cognito user pool, its hosted domain, a resource
//! server owning the `user.read` and `user.write` scopes, and an application
//! client allowed to use the client credentials grant. This crate declares
//! those resources, validates them and synthesizes a CloudFormation template.
//! Creating the resources is left to the provisioning engine that consumes
//! the template.
//!
//! ```text
//! StackSettings ──declare──▶ StackDefinition ──validate──▶ synthesize ──▶ Template (JSON)
//! ```

pub mod error;
pub mod model;
pub mod settings;
pub mod stack;
pub mod template;
pub mod token_url;

pub use error::{ErrorCategory, Result, StackError, ValidationErrors};
pub use settings::{SecretExposure, StackSettings};
pub use stack::{StackDefinition, exports, ids};
pub use template::{Template, synthesize};
pub use token_url::{TokenUrlError, check_token_url, is_plausible_region, token_endpoint_url};
