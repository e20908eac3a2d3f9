use anyhow::Result;
use colored::Colorize;
use oauth2_stack_config::LoadedConfig;

pub fn show(loaded: &LoadedConfig) -> Result<()> {
    let path = loaded
        .path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(defaults only)".to_string());
    println!("# {}: {}", "File".cyan(), path);
    println!("# {}: {}", "Region source".cyan(), loaded.region_source);
    println!();
    print!("{}", loaded.config.to_toml()?);
    Ok(())
}
