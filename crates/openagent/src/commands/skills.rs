//! List or search skills.

use anyhow::Result;
use colored::Colorize;
use openagent_core::SkillRegistry;
use openagent_core::skills::Skill;

/// Execute skills command.
pub fn execute(category: Option<&str>, query: Option<&str>) -> Result<()> {
    let registry = SkillRegistry::new();
    let skills = select(&registry, category, query);

    if skills.is_empty() {
        println!("{}", "No matching skills".yellow());
        return Ok(());
    }

    println!("{}", "Skills".cyan().bold());
    for skill in skills {
        println!(
            "  {:<18} {:<8} {}",
            skill.name.green(),
            skill.category.dimmed(),
            skill.description
        );
    }
    Ok(())
}

fn select<'a>(
    registry: &'a SkillRegistry,
    category: Option<&str>,
    query: Option<&str>,
) -> Vec<&'a Skill> {
    let mut skills = match query {
        Some(q) => registry.find(q),
        None => registry.list(None),
    };
    if let Some(category) = category {
        skills.retain(|s| s.category == category);
    }
    skills
}

/// One line per category, used by the chat `/skills` command.
pub fn category_lines(registry: &SkillRegistry) -> Vec<String> {
    registry
        .categories()
        .into_iter()
        .map(|(category, names)| format!("{category}: {}", names.join(", ")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_by_category_and_query() {
        let registry = SkillRegistry::new();

        let files: Vec<_> = select(&registry, Some("files"), None)
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(files, vec!["read_file", "write_file"]);

        let found = select(&registry, Some("system"), Some("file"));
        assert!(found.is_empty());
    }

    #[test]
    fn test_category_lines() {
        let lines = category_lines(&SkillRegistry::new());
        assert!(lines.contains(&"files: read_file, write_file".to_string()));
        assert!(lines.contains(&"web: web_search".to_string()));
    }
}
