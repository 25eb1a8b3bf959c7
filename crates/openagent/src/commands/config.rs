//! Show the effective configuration.

use anyhow::Result;
use colored::Colorize;
use openagent_core::Config;

/// Execute config command.
pub fn execute(json: bool, config: &Config) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(config)?);
        return Ok(());
    }

    println!("{}", "OpenAgent Configuration".cyan().bold());
    println!("File:      {}", Config::config_path().display());
    println!();
    println!("{}", "[model]".bold());
    println!("provider:  {}", config.model.provider);
    println!("model:     {}", config.model.model_name);
    println!("max_tokens:  {}", config.model.max_tokens);
    println!("temperature: {}", config.model.temperature);
    println!("api key:   {}", key_status(config));
    println!();
    println!("{}", "[memory]".bold());
    let m = &config.memory;
    println!(
        "capacity:  long {} / mid {} / short {}",
        m.long_term_capacity, m.mid_term_capacity, m.short_term_capacity
    );
    println!(
        "ttl (s):   long {} / mid {} / short {}",
        m.long_term_ttl_secs, m.mid_term_ttl_secs, m.short_term_ttl_secs
    );
    println!("compact:   {} entries per tier", m.compact_limit);
    println!("expire on read: {}", m.expire_on_read);
    println!();
    println!("{}", "[agent]".bold());
    println!("name:      {}", config.agent.name);
    println!(
        "history:   window {}, max {}, keep {}",
        config.agent.history_window, config.agent.history_max, config.agent.history_keep
    );
    Ok(())
}

fn key_status(config: &Config) -> colored::ColoredString {
    match config.model.api_key() {
        Some(_) => "Present".green(),
        None => "Missing".yellow(),
    }
}
