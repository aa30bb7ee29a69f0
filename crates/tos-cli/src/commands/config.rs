use std::path::Path;

use anyhow::Result;
use tos_config::Config;

pub fn handle(config: &Config, path: &Path) -> Result<()> {
    println!("Config file: {}", path.display());

    let key_status = match config.api_key() {
        Ok(_) => "set",
        Err(_) => "NOT SET",
    };
    println!(
        "API key ({}): {}",
        config.completion.api_key_env, key_status
    );
    println!();
    print!("{}", toml::to_string_pretty(config)?);

    Ok(())
}
