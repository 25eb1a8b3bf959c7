//! Interactive chat loop.
//!
//! Lines starting with `/` are session commands; everything else is sent to the
//! agent. `quit` or `exit` ends the session.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use colored::Colorize;
use openagent_core::{Agent, Config, SkillArgs};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

use crate::cli::ChatArgs;
use crate::commands::skills::category_lines;
use crate::state;

const HELP: &str = "\
Commands:
  /context              Show full memory context
  /compact              Show the compact context sent to the model
  /skill NAME [JSON]    Run a skill with a JSON object of arguments
  /skills               List skills by category
  /learn TOPIC: TEXT    Record something learned
  /reflect RESULT       Reflect on a task result
  /improve              Show recent learnings and suggestions
  /reset                Clear conversation history and short-term memory
  /save [FILE]          Save memory to FILE (default: the --state file)
  /help                 Show this help
  quit | exit           Leave the session";

/// One parsed line of user input
#[derive(Debug, Clone, PartialEq)]
enum Input {
    Empty,
    Quit,
    Message(String),
    Context,
    Compact,
    Skill { name: String, args: SkillArgs },
    Skills,
    Learn { topic: String, content: String },
    Reflect(String),
    Improve,
    Reset,
    Save(Option<PathBuf>),
    Help,
}

fn parse_input(line: &str) -> Result<Input> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Input::Empty);
    }
    if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
        return Ok(Input::Quit);
    }
    let Some(command) = line.strip_prefix('/') else {
        return Ok(Input::Message(line.to_string()));
    };

    let (name, rest) = match command.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (command, ""),
    };

    let input = match name {
        "context" => Input::Context,
        "compact" => Input::Compact,
        "skills" => Input::Skills,
        "reset" => Input::Reset,
        "help" => Input::Help,
        "improve" => Input::Improve,
        "learn" => parse_learn(rest)?,
        "reflect" if !rest.is_empty() => Input::Reflect(rest.to_string()),
        "reflect" => bail!("Usage: /reflect RESULT"),
        "save" => Input::Save((!rest.is_empty()).then(|| PathBuf::from(rest))),
        "skill" => parse_skill(rest)?,
        other => bail!("Unknown command: /{other}. Type /help for a list"),
    };
    Ok(input)
}

fn parse_learn(rest: &str) -> Result<Input> {
    match rest.split_once(':') {
        Some((topic, content)) if !topic.trim().is_empty() && !content.trim().is_empty() => {
            Ok(Input::Learn {
                topic: topic.trim().to_string(),
                content: content.trim().to_string(),
            })
        }
        _ => bail!("Usage: /learn TOPIC: TEXT"),
    }
}

fn parse_skill(rest: &str) -> Result<Input> {
    let (name, raw_args) = match rest.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (rest, ""),
    };
    if name.is_empty() {
        bail!("Usage: /skill NAME [JSON]");
    }

    let args = if raw_args.is_empty() {
        SkillArgs::new()
    } else {
        match serde_json::from_str::<Value>(raw_args).context("Skill arguments must be JSON")? {
            Value::Object(map) => map,
            _ => bail!("Skill arguments must be a JSON object"),
        }
    };

    Ok(Input::Skill {
        name: name.to_string(),
        args,
    })
}

/// Execute chat command.
pub async fn execute(args: ChatArgs, config: &Config) -> Result<()> {
    let mut config = config.clone();
    if let Some(name) = args.name {
        config.agent.name = name;
    }

    let mut agent = Agent::from_config(&config)?;
    let restored = match &args.state {
        Some(path) => restore(&agent, path).await?,
        None => false,
    };
    if !restored {
        agent.add_system_prompt(&args.system).await;
    }
    agent.set_task(&args.task).await;

    println!("{} {}", agent.name().cyan().bold(), "ready".green());
    if config.model.api_key().is_none() {
        println!("{}", "No API key configured; replies come from the offline model".yellow());
    }
    println!("{}", "Type /help for commands, quit to exit".dimmed());

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        stdout.write_all(b"\n> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let input = match parse_input(&line) {
            Ok(input) => input,
            Err(e) => {
                println!("{} {e:#}", "✗".red());
                continue;
            }
        };

        match handle(&mut agent, input, args.state.as_deref()).await {
            Ok(Some(output)) if output.is_empty() => {}
            Ok(Some(output)) => println!("{output}"),
            Ok(None) => break,
            Err(e) => println!("{} {e:#}", "✗".red()),
        }
    }

    if let Some(path) = &args.state {
        state::save(path, &agent.snapshot().await)?;
        info!(path = %path.display(), "saved memory state");
    }
    println!("{}", "Goodbye".dimmed());
    Ok(())
}

async fn restore(agent: &Agent, path: &Path) -> Result<bool> {
    let Some(snapshot) = state::load(path)? else {
        return Ok(false);
    };
    agent
        .restore(&snapshot)
        .await
        .with_context(|| format!("Invalid memory state in {}", path.display()))?;
    info!(path = %path.display(), "restored memory state");
    Ok(true)
}

/// Apply one input. `Ok(None)` ends the session.
async fn handle(
    agent: &mut Agent,
    input: Input,
    state_path: Option<&Path>,
) -> Result<Option<String>> {
    let output = match input {
        Input::Quit => return Ok(None),
        Input::Empty => String::new(),
        Input::Message(text) => agent.chat(&text).await?,
        Input::Context => or_empty_notice(agent.memory().get_full_context(true).await),
        Input::Compact => or_empty_notice(agent.memory().get_compact_context().await),
        Input::Skills => category_lines(agent.skills()).join("\n"),
        Input::Help => HELP.to_string(),
        Input::Learn { topic, content } => {
            agent.learn(&topic, &content, None);
            format!("{} Learned: {topic}", "✓".green())
        }
        Input::Reflect(result) => {
            let reflection = agent.reflect(&result, None);
            match reflection.action {
                Some(action) => format!("Reflection: {action}"),
                None => "Reflection recorded".to_string(),
            }
        }
        Input::Improve => {
            let status = agent.improver().status();
            let counts = format!(
                "{} learnings, {} reflections",
                status.total_learnings, status.total_improvements
            );
            format!(
                "{}\n\n{}",
                agent.improver().generate_improvement(),
                counts.dimmed()
            )
        }
        Input::Reset => {
            agent.reset().await;
            format!("{} History and short-term memory cleared", "✓".green())
        }
        Input::Skill { name, args } => {
            let outcome = agent.execute_skill(&name, &args).await;
            match outcome.into_result() {
                Ok(output) => output,
                Err(e) => format!("{} {e}", "✗".red()),
            }
        }
        Input::Save(path) => {
            let Some(path) = path.as_deref().or(state_path) else {
                bail!("No state file; use /save FILE or start with --state");
            };
            state::save(path, &agent.snapshot().await)?;
            format!("{} Saved memory to {}", "✓".green(), path.display())
        }
    };

    Ok(Some(output))
}

fn or_empty_notice(text: String) -> String {
    if text.is_empty() {
        "(memory is empty)".dimmed().to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openagent_core::TierRole;
    use tempfile::tempdir;

    #[test]
    fn test_parse_plain_and_quit() {
        assert_eq!(parse_input("   ").unwrap(), Input::Empty);
        assert_eq!(parse_input("EXIT").unwrap(), Input::Quit);
        assert_eq!(
            parse_input(" hello there ").unwrap(),
            Input::Message("hello there".into())
        );
    }

    #[test]
    fn test_parse_slash_commands() {
        assert_eq!(parse_input("/compact").unwrap(), Input::Compact);
        assert_eq!(parse_input("/save").unwrap(), Input::Save(None));
        assert_eq!(
            parse_input("/save out/memory.json").unwrap(),
            Input::Save(Some(PathBuf::from("out/memory.json")))
        );
        assert!(parse_input("/unknown").is_err());
    }

    #[test]
    fn test_parse_skill_arguments() {
        match parse_input(r#"/skill web_search {"query": "rust"}"#).unwrap() {
            Input::Skill { name, args } => {
                assert_eq!(name, "web_search");
                assert_eq!(args["query"], "rust");
            }
            other => panic!("unexpected input: {other:?}"),
        }

        assert!(parse_input("/skill").is_err());
        assert!(parse_input("/skill web_search [1]").is_err());
        assert!(parse_input("/skill web_search {oops").is_err());
    }

    #[tokio::test]
    async fn test_handle_message_and_skill() {
        let mut agent = Agent::from_config(&Config::default()).unwrap();

        let reply = handle(&mut agent, Input::Message("hi".into()), None)
            .await
            .unwrap();
        assert!(reply.is_some());

        let mut args = SkillArgs::new();
        args.insert("query".into(), Value::from("tokio"));
        let output = handle(
            &mut agent,
            Input::Skill {
                name: "web_search".into(),
                args,
            },
            None,
        )
        .await
        .unwrap()
        .unwrap();
        assert!(output.contains("tokio"));

        let short = agent.memory().render(TierRole::ShortTerm, None).await;
        assert!(short.contains("Executed skill web_search"));
    }

    #[test]
    fn test_parse_learn_and_reflect() {
        assert_eq!(
            parse_input("/learn memory: keep prompts small").unwrap(),
            Input::Learn {
                topic: "memory".into(),
                content: "keep prompts small".into(),
            }
        );
        assert!(parse_input("/learn no colon here").is_err());
        assert!(parse_input("/learn : empty topic").is_err());

        assert_eq!(
            parse_input("/reflect build failed with error").unwrap(),
            Input::Reflect("build failed with error".into())
        );
        assert!(parse_input("/reflect").is_err());
        assert_eq!(parse_input("/improve").unwrap(), Input::Improve);
    }

    #[tokio::test]
    async fn test_handle_learning_commands() {
        let mut agent = Agent::from_config(&Config::default()).unwrap();

        let learn = Input::Learn {
            topic: "memory".into(),
            content: "keep prompts small".into(),
        };
        handle(&mut agent, learn, None).await.unwrap();

        let reflected = handle(&mut agent, Input::Reflect("error in step 2".into()), None)
            .await
            .unwrap()
            .unwrap();
        assert!(reflected.contains("needs debugging"));

        let summary = handle(&mut agent, Input::Improve, None)
            .await
            .unwrap()
            .unwrap();
        assert!(summary.contains("- memory: keep prompts small"));
        assert!(summary.contains("1 learnings, 1 reflections"));
    }

    #[tokio::test]
    async fn test_handle_quit_ends_session() {
        let mut agent = Agent::from_config(&Config::default()).unwrap();
        assert!(handle(&mut agent, Input::Quit, None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_requires_a_path() {
        let mut agent = Agent::from_config(&Config::default()).unwrap();
        assert!(handle(&mut agent, Input::Save(None), None).await.is_err());
    }

    #[tokio::test]
    async fn test_save_then_restore() {
        let temp = tempdir().expect("Failed to create temp dir");
        let path = temp.path().join("memory.json");

        let mut agent = Agent::from_config(&Config::default()).unwrap();
        agent.add_system_prompt("remember the goal").await;
        handle(&mut agent, Input::Save(None), Some(&path))
            .await
            .unwrap();

        let fresh = Agent::from_config(&Config::default()).unwrap();
        assert!(restore(&fresh, &path).await.unwrap());
        assert!(
            fresh
                .memory()
                .get_full_context(true)
                .await
                .contains("remember the goal")
        );

        assert!(!restore(&fresh, &temp.path().join("absent.json")).await.unwrap());
    }

    #[tokio::test]
    async fn test_resumed_session_does_not_repeat_task() {
        let temp = tempdir().expect("Failed to create temp dir");
        let path = temp.path().join("memory.json");

        let first = Agent::from_config(&Config::default()).unwrap();
        first.set_task("Chat with the user").await;
        state::save(&path, &first.snapshot().await).unwrap();

        let resumed = Agent::from_config(&Config::default()).unwrap();
        assert!(restore(&resumed, &path).await.unwrap());
        assert!(!resumed.set_task("Chat with the user").await);

        let mid = resumed.memory().render(TierRole::MidTerm, None).await;
        assert_eq!(mid.matches("Current task:").count(), 1);
    }
}
