//! Print the memory context stored in a state file.

use anyhow::{Context, Result, bail};
use colored::Colorize;
use openagent_core::{Config, HierarchicalMemory, TierRole};

use crate::cli::ContextArgs;
use crate::state;

/// Execute context command.
pub fn execute(args: ContextArgs, config: &Config) -> Result<()> {
    let Some(snapshot) = state::load(&args.state)? else {
        bail!("State file not found: {}", args.state.display());
    };

    let mut memory = HierarchicalMemory::from_config(&config.memory)?;
    memory
        .restore_from_value(&snapshot)
        .with_context(|| format!("Invalid memory state in {}", args.state.display()))?;

    let text = match args.tier.as_deref() {
        Some(tier) => memory.render(parse_tier(tier)?, args.limit),
        None => render(&memory, args.compact, !args.no_short),
    };
    if text.is_empty() {
        println!("{}", "Memory is empty".yellow());
        return Ok(());
    }

    let counts = memory
        .counts()
        .iter()
        .map(|(role, count)| format!("{}: {count}", role.label()))
        .collect::<Vec<_>>()
        .join(", ");
    println!("{}", counts.dimmed());
    println!();
    println!("{text}");
    Ok(())
}

fn render(memory: &HierarchicalMemory, compact: bool, include_short: bool) -> String {
    if compact {
        memory.get_compact_context()
    } else {
        memory.get_full_context(include_short)
    }
}

fn parse_tier(value: &str) -> Result<TierRole> {
    match TierRole::from_str(value) {
        Some(role) => Ok(role),
        None => bail!("Invalid tier: {value}. Use: long_term, mid_term, or short_term"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_modes() {
        let mut memory = HierarchicalMemory::new();
        memory.add_long_term("goal", None);
        memory.add_short_term("scratch", None);

        assert!(render(&memory, false, true).contains("scratch"));
        assert!(!render(&memory, false, false).contains("scratch"));
        assert!(!render(&memory, true, true).contains("scratch"));
        assert!(render(&memory, true, true).contains("goal"));
    }

    #[test]
    fn test_parse_tier() {
        assert_eq!(parse_tier("mid_term").unwrap(), TierRole::MidTerm);
        assert!(parse_tier("working").is_err());
    }
}
