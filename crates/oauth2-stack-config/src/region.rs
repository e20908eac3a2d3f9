//! Ambient deployment region.
//!
//! The region is the only input the stack takes from its environment. When it
//! cannot be found the stack is still declared; the token endpoint output just
//! carries an empty segment.

use std::fmt;

/// Environment variables consulted for the region, in priority order.
pub const REGION_ENV_VARS: [&str; 3] = ["CDK_DEFAULT_REGION", "AWS_REGION", "AWS_DEFAULT_REGION"];

/// Where the effective region came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionSource {
    /// `--region` on the command line
    CommandLine,
    /// `stack.region` in the config file or `OAUTH2_STACK__STACK__REGION`
    Configured,
    /// One of [`REGION_ENV_VARS`]
    Environment(&'static str),
    Unset,
}

impl fmt::Display for RegionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CommandLine => write!(f, "command line (--region)"),
            Self::Configured => write!(f, "configuration (stack.region)"),
            Self::Environment(var) => write!(f, "environment variable ({var})"),
            Self::Unset => write!(f, "unset"),
        }
    }
}

/// Picks the configured region, falling back to the ambient variables.
///
/// Blank values count as absent.
pub fn resolve_region<F>(configured: Option<&str>, lookup: F) -> (Option<String>, RegionSource)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(region) = configured.map(str::trim).filter(|r| !r.is_empty()) {
        return (Some(region.to_string()), RegionSource::Configured);
    }

    for var in REGION_ENV_VARS {
        if let Some(region) = lookup(var) {
            let region = region.trim();
            if !region.is_empty() {
                return (Some(region.to_string()), RegionSource::Environment(var));
            }
        }
    }

    (None, RegionSource::Unset)
}
