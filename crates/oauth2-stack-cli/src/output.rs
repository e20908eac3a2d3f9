use anyhow::Result;
use colored::Colorize;
use oauth2_stack_core::model::StackOutput;
use serde_json::{Value, json};
use tabled::builder::Builder;
use tabled::settings::Style;

pub fn print_success(msg: &str) {
    eprintln!("{} {}", "✓".green(), msg);
}

pub fn print_warning(msg: &str) {
    eprintln!("{} {}", "!".yellow(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Rows of export name, value preview and whether it resolves at deploy time.
pub fn outputs_table(outputs: &[StackOutput]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Export", "Value", "Resolved"]);
    for output in outputs {
        let resolved = if output.is_deferred() {
            "at deploy"
        } else {
            "at synth"
        };
        builder.push_record([
            output.export_name.clone(),
            output.value.preview(),
            resolved.to_string(),
        ]);
    }
    builder.build().with(Style::rounded()).to_string()
}

pub fn outputs_json(outputs: &[StackOutput]) -> Value {
    Value::Array(
        outputs
            .iter()
            .map(|o| {
                json!({
                    "exportName": o.export_name,
                    "logicalId": o.logical_id.as_str(),
                    "value": o.value,
                    "preview": o.value.preview(),
                })
            })
            .collect(),
    )
}
