use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "oauth2-stack")]
#[command(about = "Synthesize the OAuth2 client-credentials Cognito stack as a CloudFormation template")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (defaults to ./oauth2-stack.toml when present)
    #[arg(short, long, global = true, env = "OAUTH2_STACK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Deployment region (overrides config and the CDK_DEFAULT_REGION / AWS_REGION env vars)
    #[arg(short, long, global = true)]
    pub region: Option<String>,

    /// Log level when RUST_LOG is not set (overrides logging.level)
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate the stack and write its CloudFormation template
    Synth(SynthArgs),
    /// List the exported stack outputs
    Outputs(OutputsArgs),
    /// Check the stack definition and the token endpoint output
    Validate,
    /// Inspect the effective configuration
    Config(ConfigArgs),
}

#[derive(clap::Args)]
pub struct SynthArgs {
    /// Write the template to this file instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct OutputsArgs {
    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(clap::Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the merged configuration
    Show,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "oauth2-stack",
            "synth",
            "--out",
            "template.json",
            "--region",
            "us-east-1",
        ])
        .unwrap();
        assert_eq!(cli.region.as_deref(), Some("us-east-1"));
        match cli.command {
            Commands::Synth(args) => {
                assert_eq!(args.out, Some(PathBuf::from("template.json")));
            }
            _ => panic!("expected synth"),
        }
    }

    #[test]
    fn test_outputs_format() {
        let cli = Cli::try_parse_from(["oauth2-stack", "outputs", "--format", "json"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Outputs(OutputsArgs {
                format: OutputFormat::Json
            })
        ));
    }

    #[test]
    fn test_rejects_unknown_command() {
        assert!(Cli::try_parse_from(["oauth2-stack", "deploy"]).is_err());
    }
}
