//! Token endpoint URL of the hosted domain.
//!
//! The URL is built by string interpolation from the domain prefix and the
//! deployment region rather than read back from the platform. A missing region
//! therefore produces a URL with an empty label instead of an error;
//! [`check_token_url`] exists to flag that case.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use url::Url;

pub const TOKEN_PATH: &str = "/oauth2/token";
pub const HOSTED_DOMAIN_SUFFIX: &str = ".amazoncognito.com";

static REGION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z]{2}(-gov|-iso[a-z]?)?-[a-z]+-\d{1,2}$").expect("valid region regex")
});

/// Why a token endpoint URL is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenUrlError {
    #[error("URL could not be parsed: {0}")]
    Unparseable(String),

    #[error("URL contains consecutive dots (empty host label), region is probably unset")]
    ConsecutiveDots,

    #[error("URL host '{0}' has an empty label")]
    EmptyLabel(String),

    #[error("URL scheme must be https, got '{0}'")]
    Scheme(String),

    #[error("URL host '{0}' is not a hosted domain under .amazoncognito.com")]
    Host(String),

    #[error("URL path must be /oauth2/token, got '{0}'")]
    Path(String),
}

/// Builds `https://{prefix}.auth.{region}.amazoncognito.com/oauth2/token`.
///
/// Never fails: an absent region becomes an empty segment.
pub fn token_endpoint_url(domain_prefix: &str, region: Option<&str>) -> String {
    let region = region.unwrap_or_default();
    format!("https://{domain_prefix}.auth.{region}{HOSTED_DOMAIN_SUFFIX}{TOKEN_PATH}")
}

/// Checks that a token endpoint URL is well formed.
///
/// # Errors
///
/// Returns the first problem found, checking the raw string for empty labels
/// before handing it to the URL parser.
pub fn check_token_url(raw: &str) -> Result<Url, TokenUrlError> {
    if raw.contains("..") {
        return Err(TokenUrlError::ConsecutiveDots);
    }

    let url = Url::parse(raw).map_err(|e| TokenUrlError::Unparseable(e.to_string()))?;

    if url.scheme() != "https" {
        return Err(TokenUrlError::Scheme(url.scheme().to_string()));
    }

    let host = url.host_str().unwrap_or_default().to_string();
    if host.split('.').any(str::is_empty) {
        return Err(TokenUrlError::EmptyLabel(host));
    }
    if !host.ends_with(HOSTED_DOMAIN_SUFFIX) || !host.contains(".auth.") {
        return Err(TokenUrlError::Host(host));
    }

    // prefix.auth.region.amazoncognito.com
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() != 5 {
        return Err(TokenUrlError::Host(host));
    }

    if url.path() != TOKEN_PATH {
        return Err(TokenUrlError::Path(url.path().to_string()));
    }

    Ok(url)
}

/// Loose shape check for region names such as `us-east-1` or `us-gov-west-1`.
pub fn is_plausible_region(region: &str) -> bool {
    REGION_RE.is_match(region)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_url_with_region() {
        let url = token_endpoint_url("marcio-oauth2-userpool", Some("us-east-1"));
        assert_eq!(
            url,
            "https://marcio-oauth2-userpool.auth.us-east-1.amazoncognito.com/oauth2/token"
        );
        let parsed = check_token_url(&url).unwrap();
        assert_eq!(
            parsed.host_str(),
            Some("marcio-oauth2-userpool.auth.us-east-1.amazoncognito.com")
        );
    }

    #[test]
    fn test_missing_region_is_flagged_not_raised() {
        let url = token_endpoint_url("marcio-oauth2-userpool", None);
        assert_eq!(
            url,
            "https://marcio-oauth2-userpool.auth..amazoncognito.com/oauth2/token"
        );
        assert_eq!(check_token_url(&url), Err(TokenUrlError::ConsecutiveDots));

        let url = token_endpoint_url("marcio-oauth2-userpool", Some(""));
        assert!(check_token_url(&url).is_err());
    }

    #[test]
    fn test_rejects_wrong_shapes() {
        assert!(matches!(
            check_token_url("http://p.auth.eu-west-1.amazoncognito.com/oauth2/token"),
            Err(TokenUrlError::Scheme(_))
        ));
        assert!(matches!(
            check_token_url("https://p.auth.eu-west-1.example.com/oauth2/token"),
            Err(TokenUrlError::Host(_))
        ));
        assert!(matches!(
            check_token_url("https://p.auth.eu-west-1.amazoncognito.com/oauth2/authorize"),
            Err(TokenUrlError::Path(_))
        ));
        assert!(matches!(
            check_token_url("not a url"),
            Err(TokenUrlError::Unparseable(_))
        ));
    }

    #[test]
    fn test_region_shapes() {
        assert!(is_plausible_region("us-east-1"));
        assert!(is_plausible_region("ap-southeast-2"));
        assert!(is_plausible_region("us-gov-west-1"));
        assert!(!is_plausible_region(""));
        assert!(!is_plausible_region("undefined"));
        assert!(!is_plausible_region("US-EAST-1"));
    }
}
