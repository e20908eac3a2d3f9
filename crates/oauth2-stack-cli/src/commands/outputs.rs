use anyhow::Result;
use oauth2_stack_core::StackDefinition;

use crate::cli::OutputFormat;
use crate::output::{outputs_json, outputs_table, print_json};

pub fn outputs(stack: &StackDefinition, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", outputs_table(&stack.outputs)),
        OutputFormat::Json => print_json(&outputs_json(&stack.outputs))?,
    }
    Ok(())
}
