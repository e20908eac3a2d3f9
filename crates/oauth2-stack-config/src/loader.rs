//! Configuration loading with the `config` crate.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use tracing::{debug, info, warn};

use crate::region::{RegionSource, resolve_region};
use crate::{ConfigError, Result, StackConfig};

/// Config file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "oauth2-stack.toml";

/// Prefix of override variables, e.g. `OAUTH2_STACK__STACK__DOMAIN_PREFIX=my-pool`.
pub const ENV_PREFIX: &str = "OAUTH2_STACK";

/// Effective configuration plus where its parts came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: StackConfig,
    /// File that was read, if any.
    pub path: Option<PathBuf>,
    pub region_source: RegionSource,
}

impl LoadedConfig {
    /// Applies a region given on the command line.
    pub fn override_region(&mut self, region: impl Into<String>) {
        let region = region.into();
        if region.trim().is_empty() {
            return;
        }
        self.config.stack.region = Some(region);
        self.region_source = RegionSource::CommandLine;
    }
}

/// Loads configuration from the given file (or [`DEFAULT_CONFIG_FILE`]) and
/// the process environment.
///
/// # Errors
///
/// Fails when an explicitly given file is missing or any source cannot be
/// parsed, or when the merged result does not validate.
pub fn load_config(path: Option<&Path>) -> Result<LoadedConfig> {
    load(path, None, |var| std::env::var(var).ok())
}

/// Same as [`load_config`] with an explicit environment instead of the
/// process environment.
pub fn load_config_with_env(
    path: Option<&Path>,
    env: &config::Map<String, String>,
) -> Result<LoadedConfig> {
    load(path, Some(env.clone()), |var| env.get(var).cloned())
}

fn load<F>(path: Option<&Path>, env: Option<config::Map<String, String>>, lookup: F) -> Result<LoadedConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut builder = Config::builder();

    let used_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ConfigError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("config file not found: {}", p.display()),
                )));
            }
            builder = builder.add_source(File::from(p.to_path_buf()).format(FileFormat::Toml));
            Some(p.to_path_buf())
        }
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                builder = builder
                    .add_source(File::from(default_path.clone()).format(FileFormat::Toml));
                Some(default_path)
            } else {
                debug!("No {DEFAULT_CONFIG_FILE} in working directory, using defaults");
                None
            }
        }
    };

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .try_parsing(true)
            .separator("__")
            .source(env),
    );

    let mut config: StackConfig = builder.build()?.try_deserialize()?;
    config.validate()?;

    let (region, region_source) = resolve_region(config.stack.region.as_deref(), lookup);
    config.stack.region = region;

    match &config.stack.region {
        Some(region) if !oauth2_stack_core::is_plausible_region(region) => {
            warn!(region = %region, source = %region_source, "Region does not look like an AWS region name");
        }
        None => {
            warn!("No deployment region found in configuration or environment");
        }
        Some(_) => {}
    }

    info!(
        path = ?used_path,
        region = config.stack.region.as_deref().unwrap_or(""),
        region_source = %region_source,
        "Configuration loaded"
    );

    Ok(LoadedConfig {
        config,
        path: used_path,
        region_source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let env = config::Map::new();
        let err = load_config_with_env(Some(Path::new("/nonexistent/oauth2-stack.toml")), &env)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_override_region_ignores_blank() {
        let env = config::Map::new();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.toml");
        std::fs::write(&path, "").unwrap();

        let mut loaded = load_config_with_env(Some(&path), &env).unwrap();
        assert_eq!(loaded.region_source, RegionSource::Unset);

        loaded.override_region("  ");
        assert_eq!(loaded.region_source, RegionSource::Unset);

        loaded.override_region("eu-north-1");
        assert_eq!(loaded.config.stack.region.as_deref(), Some("eu-north-1"));
        assert_eq!(loaded.region_source, RegionSource::CommandLine);
    }
}
