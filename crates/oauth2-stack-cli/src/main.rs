mod cli;
mod commands;
mod observability;
mod output;

use anyhow::Result;
use clap::Parser;
use oauth2_stack_config::{ConfigError, load_config};
use oauth2_stack_core::StackDefinition;

use cli::{Cli, Commands, ConfigCommands};
use output::print_error;

fn main() {
    // Load .env file if present (before anything else)
    if let Err(e) = dotenvy::dotenv() {
        if !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            eprintln!("Warning: Failed to load .env file: {e}");
        }
    }

    let cli = Cli::parse();
    observability::init_tracing_with_level(cli.log_level.as_deref().unwrap_or("warn"));

    if let Err(e) = run(cli) {
        print_error(&format!("{e:#}"));
        let code = if e.downcast_ref::<ConfigError>().is_some() { 2 } else { 1 };
        std::process::exit(code);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut loaded = load_config(cli.config.as_deref())?;
    if let Some(region) = &cli.region {
        loaded.override_region(region);
    }
    if cli.log_level.is_none() {
        observability::apply_logging_level(&loaded.config.logging.level);
    }

    tracing::debug!(
        stack = %loaded.config.stack.stack_name,
        region_source = %loaded.region_source,
        "Declaring stack"
    );
    let stack = StackDefinition::declare(&loaded.config.stack);

    match &cli.command {
        Commands::Synth(args) => commands::synth::synth(&stack, args.out.as_deref())?,
        Commands::Outputs(args) => commands::outputs::outputs(&stack, args.format)?,
        Commands::Validate => commands::validate::validate(&stack)?,
        Commands::Config(args) => match &args.command {
            ConfigCommands::Show => commands::config::show(&loaded)?,
        },
    }

    Ok(())
}
