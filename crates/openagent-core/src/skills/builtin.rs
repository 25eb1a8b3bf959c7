//! Built-in skills: web search placeholder, file read/write, shell command.

use std::process::Command;

use serde_json::Value;

use crate::error::SkillError;

use super::registry::{SkillArgs, SkillRegistry};

pub(super) fn register_builtins(registry: &mut SkillRegistry) {
    registry.register("web_search", "Search the web", Some("web"), web_search);
    registry.register("read_file", "Read a text file", Some("files"), read_file);
    registry.register("write_file", "Write a text file", Some("files"), write_file);
    registry.register(
        "execute_command",
        "Run a shell command",
        Some("system"),
        execute_command,
    );
}

fn required_str<'a>(skill: &str, args: &'a SkillArgs, key: &str) -> Result<&'a str, SkillError> {
    args.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| SkillError::missing_argument(skill, key))
}

fn web_search(args: &SkillArgs) -> Result<String, SkillError> {
    let query = required_str("web_search", args, "query")?;
    Ok(format!("Search: {query} - no search backend configured"))
}

fn read_file(args: &SkillArgs) -> Result<String, SkillError> {
    let path = required_str("read_file", args, "path")?;
    Ok(std::fs::read_to_string(path)?)
}

fn write_file(args: &SkillArgs) -> Result<String, SkillError> {
    let path = required_str("write_file", args, "path")?;
    let content = required_str("write_file", args, "content")?;
    std::fs::write(path, content)?;
    Ok(format!("Written to {path}"))
}

fn execute_command(args: &SkillArgs) -> Result<String, SkillError> {
    let cmd = required_str("execute_command", args, "cmd")?;
    let output = Command::new("sh").arg("-c").arg(cmd).output()?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    if stdout.is_empty() {
        Ok(String::from_utf8_lossy(&output.stderr).into_owned())
    } else {
        Ok(stdout.into_owned())
    }
}
