//! Command parsing.
//!
//! The first whitespace-delimited token selects the command, compared
//! case-insensitively. Everything after it keeps its original case. A known
//! keyword with bad arguments is an error, never a chat message.

use crate::error::DispatchError;
use crate::learning::Discipline;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Search(String),
    Calculate(String),
    WriteFile { name: String, content: String },
    ReadFile(String),
    Run(String),
    AddGoal(String),
    Progress { id: u64, value: f64 },
    Complete(u64),
    Recall(String),
    Learn(Discipline),
    Status,
    Goals,
    Memory,
    Help,
    Exit,
    /// Anything that is not a command.
    Chat(String),
}

pub const USAGE_SEARCH: &str = "search <query>";
pub const USAGE_CALCULATE: &str = "calculate <expression>";
pub const USAGE_WRITE_FILE: &str = "write_file <name> <content>";
pub const USAGE_READ_FILE: &str = "read_file <name>";
pub const USAGE_RUN: &str = "run <code>";
pub const USAGE_ADD_GOAL: &str = "add_goal <description>";
pub const USAGE_PROGRESS: &str = "progress <id> <value 0.0-1.0>";
pub const USAGE_COMPLETE: &str = "complete <id>";
pub const USAGE_RECALL: &str = "recall <query>";

impl Command {
    pub fn parse(input: &str) -> Result<Command, DispatchError> {
        let text = input.trim();
        let (head, rest) = match text.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (text, ""),
        };
        let keyword = head.to_lowercase();

        let command = match keyword.as_str() {
            "search" => Command::Search(required(&keyword, rest, USAGE_SEARCH)?),
            "calculate" => Command::Calculate(required(&keyword, rest, USAGE_CALCULATE)?),
            "write_file" => {
                let (name, content) = rest
                    .split_once(char::is_whitespace)
                    .map(|(n, c)| (n, c.trim_start()))
                    .filter(|(_, c)| !c.is_empty())
                    .ok_or_else(|| {
                        malformed(&keyword, "expected a file name and content", USAGE_WRITE_FILE)
                    })?;
                Command::WriteFile {
                    name: name.to_string(),
                    content: content.to_string(),
                }
            }
            "read_file" => Command::ReadFile(required(&keyword, rest, USAGE_READ_FILE)?),
            "run" => Command::Run(required(&keyword, rest, USAGE_RUN)?),
            "add_goal" => Command::AddGoal(required(&keyword, rest, USAGE_ADD_GOAL)?),
            "progress" => {
                let parts: Vec<&str> = rest.split_whitespace().collect();
                let [id, value] = parts.as_slice() else {
                    return Err(malformed(
                        &keyword,
                        format!("expected 2 arguments, got {}", parts.len()),
                        USAGE_PROGRESS,
                    ));
                };
                Command::Progress {
                    id: parse_id(&keyword, id, USAGE_PROGRESS)?,
                    value: parse_progress(&keyword, value)?,
                }
            }
            "complete" => {
                let parts: Vec<&str> = rest.split_whitespace().collect();
                let [id] = parts.as_slice() else {
                    return Err(malformed(
                        &keyword,
                        format!("expected 1 argument, got {}", parts.len()),
                        USAGE_COMPLETE,
                    ));
                };
                Command::Complete(parse_id(&keyword, id, USAGE_COMPLETE)?)
            }
            "recall" => Command::Recall(required(&keyword, rest, USAGE_RECALL)?),
            "learn" => match rest.to_lowercase().as_str() {
                "code" => Command::Learn(Discipline::Code),
                "logic" => Command::Learn(Discipline::Logic),
                _ => Command::Chat(text.to_string()),
            },
            "status" if rest.is_empty() => Command::Status,
            "goals" if rest.is_empty() => Command::Goals,
            "memory" if rest.is_empty() => Command::Memory,
            "help" if rest.is_empty() => Command::Help,
            "exit" | "quit" | "bye" if rest.is_empty() => Command::Exit,
            _ => Command::Chat(text.to_string()),
        };
        Ok(command)
    }

    /// Commands that go through the tool registry.
    pub fn is_tool(&self) -> bool {
        matches!(
            self,
            Command::Search(_)
                | Command::Calculate(_)
                | Command::WriteFile { .. }
                | Command::ReadFile(_)
                | Command::Run(_)
        )
    }
}

fn malformed(command: &str, reason: impl Into<String>, usage: &'static str) -> DispatchError {
    DispatchError::MalformedCommand {
        command: command.to_string(),
        reason: reason.into(),
        usage,
    }
}

fn required(command: &str, rest: &str, usage: &'static str) -> Result<String, DispatchError> {
    if rest.is_empty() {
        Err(malformed(command, "missing argument", usage))
    } else {
        Ok(rest.to_string())
    }
}

fn parse_id(command: &str, raw: &str, usage: &'static str) -> Result<u64, DispatchError> {
    raw.parse()
        .map_err(|_| malformed(command, format!("'{}' is not a goal id", raw), usage))
}

fn parse_progress(command: &str, raw: &str) -> Result<f64, DispatchError> {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(malformed(
            command,
            format!("'{}' is not a finite number", raw),
            USAGE_PROGRESS,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Command {
        Command::parse(s).unwrap()
    }

    fn usage_of(s: &str) -> &'static str {
        match Command::parse(s) {
            Err(DispatchError::MalformedCommand { usage, .. }) => usage,
            other => panic!("Expected MalformedCommand for {:?}, got {:?}", s, other),
        }
    }

    #[test]
    fn test_tool_commands() {
        assert_eq!(parse("search rust lifetimes"), Command::Search("rust lifetimes".into()));
        assert_eq!(parse("calculate 2+2*3"), Command::Calculate("2+2*3".into()));
        assert_eq!(parse("run x = 1; x"), Command::Run("x = 1; x".into()));
        assert_eq!(parse("read_file Notes.TXT"), Command::ReadFile("Notes.TXT".into()));
    }

    #[test]
    fn test_keyword_case_insensitive_args_preserved() {
        assert_eq!(
            parse("  WRITE_FILE Report.md Hello World  "),
            Command::WriteFile {
                name: "Report.md".into(),
                content: "Hello World".into()
            }
        );
        assert_eq!(parse("Status"), Command::Status);
    }

    #[test]
    fn test_goal_commands() {
        assert_eq!(parse("add_goal write tests"), Command::AddGoal("write tests".into()));
        assert_eq!(parse("progress 1 0.5"), Command::Progress { id: 1, value: 0.5 });
        assert_eq!(parse("complete 3"), Command::Complete(3));
    }

    #[test]
    fn test_malformed_commands() {
        assert_eq!(usage_of("search"), USAGE_SEARCH);
        assert_eq!(usage_of("write_file only_name"), USAGE_WRITE_FILE);
        assert_eq!(usage_of("progress 1"), USAGE_PROGRESS);
        assert_eq!(usage_of("progress x 0.5"), USAGE_PROGRESS);
        assert_eq!(usage_of("progress 1 half"), USAGE_PROGRESS);
        assert_eq!(usage_of("progress 1 NaN"), USAGE_PROGRESS);
        assert_eq!(usage_of("complete"), USAGE_COMPLETE);
        assert_eq!(usage_of("complete -1"), USAGE_COMPLETE);
    }

    #[test]
    fn test_prefix_not_substring() {
        assert_eq!(
            parse("please calculate 1+1"),
            Command::Chat("please calculate 1+1".into())
        );
        assert_eq!(parse("researching"), Command::Chat("researching".into()));
        assert_eq!(parse("statuses"), Command::Chat("statuses".into()));
    }

    #[test]
    fn test_learn_variants() {
        assert_eq!(parse("learn code"), Command::Learn(Discipline::Code));
        assert_eq!(parse("LEARN Logic"), Command::Learn(Discipline::Logic));
        assert_eq!(parse("learn rust"), Command::Chat("learn rust".into()));
        assert_eq!(parse("learn"), Command::Chat("learn".into()));
    }

    #[test]
    fn test_views_must_be_exact() {
        assert_eq!(parse("goals"), Command::Goals);
        assert_eq!(parse("memory"), Command::Memory);
        assert_eq!(parse("help"), Command::Help);
        assert_eq!(parse("help me"), Command::Chat("help me".into()));
        assert_eq!(parse("quit"), Command::Exit);
        assert_eq!(parse("BYE"), Command::Exit);
        assert_eq!(parse("bye for now"), Command::Chat("bye for now".into()));
    }

    #[test]
    fn test_empty_input_is_chat() {
        assert_eq!(parse("   "), Command::Chat(String::new()));
    }
}
