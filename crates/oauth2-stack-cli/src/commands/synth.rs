use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use oauth2_stack_core::{StackDefinition, synthesize};
use tracing::info;

use crate::output::print_success;

pub fn synth(stack: &StackDefinition, out: Option<&Path>) -> Result<()> {
    let template = synthesize(stack).context("Stack definition is invalid")?;
    let json = template.to_json_pretty()?;

    match out {
        Some(path) => {
            fs::write(path, format!("{json}\n"))
                .with_context(|| format!("Cannot write template to {}", path.display()))?;
            info!(path = %path.display(), "Template written");
            print_success(&format!(
                "Synthesized {} resources and {} outputs to {}",
                template.resources.len(),
                template.outputs.len(),
                path.display()
            ));
        }
        None => println!("{json}"),
    }
    Ok(())
}
