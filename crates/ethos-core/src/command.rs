//! Line commands for the interactive `play` loop

use ethos_session::{ParseStepError, ReflectionField, SessionError, Step};
use std::num::ParseIntError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command: {0} (try 'help')")]
    UnknownCommand(String),
    #[error("missing argument: {0}")]
    MissingArgument(&'static str),
    #[error("invalid number '{value}' for {context}: {source}")]
    InvalidNumber {
        value: String,
        context: &'static str,
        source: ParseIntError,
    },
    #[error("{context} numbers start at 1")]
    ZeroPosition { context: &'static str },
    #[error(transparent)]
    InvalidStep(#[from] ParseStepError),
    #[error("{0}")]
    InvalidField(SessionError),
}

/// One user action
///
/// Positions typed by the user are 1-based; the parsed command carries the
/// 0-based index the flow expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowCommand {
    Team(String),
    Select(usize),
    Issue(String),
    Unissue(usize),
    Safeguard { text: String, tags: Vec<String> },
    Unsafeguard(usize),
    Reflect { field: ReflectionField, value: String },
    Next,
    Back,
    GoTo(Step),
    Finish,
    Status,
    Export(Option<PathBuf>),
    Restart,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  team <name>                       start or resume as a team
  select <n>                        choose scenario n
  issue <text>                      add an ethical issue
  unissue <n>                       remove issue n
  safeguard <text> [--tags a,b]     propose a safeguard
  unsafeguard <n>                   remove safeguard n
  reflect <hardest|disagreement|confidence> <text>
  next | back | goto <step>         move between steps
  finish                            go to the summary and submit
  status                            show the current step and progress
  export [path]                     write the HTML report
  restart                           clear everything and start over
  help | quit";

pub fn parse_command_line(input: &str) -> Result<FlowCommand, CommandParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CommandParseError::Empty);
    }

    let (verb, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (trimmed, ""),
    };

    match verb.to_ascii_lowercase().as_str() {
        "team" | "start" => Ok(FlowCommand::Team(required(rest, "team name")?)),
        "select" | "choose" => Ok(FlowCommand::Select(parse_position(rest, "scenario")?)),
        "issue" => Ok(FlowCommand::Issue(required(rest, "issue text")?)),
        "unissue" => Ok(FlowCommand::Unissue(parse_position(rest, "issue")?)),
        "safeguard" => {
            let (text, tags) = split_tags(rest);
            Ok(FlowCommand::Safeguard {
                text: required(text, "safeguard text")?,
                tags,
            })
        }
        "unsafeguard" => Ok(FlowCommand::Unsafeguard(parse_position(rest, "safeguard")?)),
        "reflect" => {
            let (field, value) = match rest.split_once(char::is_whitespace) {
                Some((field, value)) => (field, value.trim()),
                None => (rest, ""),
            };
            if field.is_empty() {
                return Err(CommandParseError::MissingArgument("reflection field"));
            }
            let field = field
                .parse::<ReflectionField>()
                .map_err(CommandParseError::InvalidField)?;
            Ok(FlowCommand::Reflect {
                field,
                value: value.to_string(),
            })
        }
        "next" => Ok(FlowCommand::Next),
        "back" => Ok(FlowCommand::Back),
        "goto" => Ok(FlowCommand::GoTo(required(rest, "step")?.parse::<Step>()?)),
        "finish" => Ok(FlowCommand::Finish),
        "status" => Ok(FlowCommand::Status),
        "export" => Ok(FlowCommand::Export(
            (!rest.is_empty()).then(|| PathBuf::from(rest)),
        )),
        "restart" => Ok(FlowCommand::Restart),
        "help" | "?" => Ok(FlowCommand::Help),
        "quit" | "exit" => Ok(FlowCommand::Quit),
        other => Err(CommandParseError::UnknownCommand(other.to_string())),
    }
}

fn required(rest: &str, what: &'static str) -> Result<String, CommandParseError> {
    if rest.is_empty() {
        Err(CommandParseError::MissingArgument(what))
    } else {
        Ok(rest.to_string())
    }
}

fn parse_position(rest: &str, context: &'static str) -> Result<usize, CommandParseError> {
    let raw = rest
        .split_whitespace()
        .next()
        .ok_or(CommandParseError::MissingArgument(context))?;
    let position = raw
        .parse::<usize>()
        .map_err(|source| CommandParseError::InvalidNumber {
            value: raw.to_string(),
            context,
            source,
        })?;
    position
        .checked_sub(1)
        .ok_or(CommandParseError::ZeroPosition { context })
}

/// `text --tags a, b` into the text and its tag list
fn split_tags(rest: &str) -> (&str, Vec<String>) {
    match rest.split_once("--tags") {
        Some((text, tags)) => (
            text.trim(),
            tags.split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        None => (rest, Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn text_arguments_keep_inner_spaces() {
        assert_eq!(
            parse_command_line("  issue   Consent of the person shown "),
            Ok(FlowCommand::Issue("Consent of the person shown".to_string()))
        );
        assert_eq!(
            parse_command_line("TEAM Metro Desk"),
            Ok(FlowCommand::Team("Metro Desk".to_string()))
        );
    }

    #[test]
    fn positions_are_one_based() {
        assert_eq!(parse_command_line("select 2"), Ok(FlowCommand::Select(1)));
        assert_eq!(parse_command_line("unissue 1"), Ok(FlowCommand::Unissue(0)));
        assert_eq!(
            parse_command_line("unsafeguard 0"),
            Err(CommandParseError::ZeroPosition {
                context: "safeguard"
            })
        );
        assert!(matches!(
            parse_command_line("select two"),
            Err(CommandParseError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn safeguard_tags() {
        assert_eq!(
            parse_command_line("safeguard Two-source rule --tags Accuracy, Transparency,"),
            Ok(FlowCommand::Safeguard {
                text: "Two-source rule".to_string(),
                tags: vec!["Accuracy".to_string(), "Transparency".to_string()],
            })
        );
        assert_eq!(
            parse_command_line("safeguard Label AI images"),
            Ok(FlowCommand::Safeguard {
                text: "Label AI images".to_string(),
                tags: Vec::new(),
            })
        );
        assert_eq!(
            parse_command_line("safeguard --tags Accuracy"),
            Err(CommandParseError::MissingArgument("safeguard text"))
        );
    }

    #[test]
    fn reflect_fields() {
        assert_eq!(
            parse_command_line("reflect hardest Holding the story overnight"),
            Ok(FlowCommand::Reflect {
                field: ReflectionField::Hardest,
                value: "Holding the story overnight".to_string(),
            })
        );
        assert_eq!(
            parse_command_line("reflect confidence"),
            Ok(FlowCommand::Reflect {
                field: ReflectionField::Confidence,
                value: String::new(),
            })
        );
        assert!(matches!(
            parse_command_line("reflect mood good"),
            Err(CommandParseError::InvalidField(_))
        ));
    }

    #[test]
    fn navigation() {
        assert_eq!(
            parse_command_line("goto safeguards"),
            Ok(FlowCommand::GoTo(Step::Safeguards))
        );
        assert!(matches!(
            parse_command_line("goto lobby"),
            Err(CommandParseError::InvalidStep(_))
        ));
        assert_eq!(parse_command_line("export"), Ok(FlowCommand::Export(None)));
        assert_eq!(
            parse_command_line("export out/report.html"),
            Ok(FlowCommand::Export(Some(PathBuf::from("out/report.html"))))
        );
    }

    #[test]
    fn empty_and_unknown() {
        assert_eq!(parse_command_line("   "), Err(CommandParseError::Empty));
        assert_eq!(
            parse_command_line("dance"),
            Err(CommandParseError::UnknownCommand("dance".to_string()))
        );
    }

    proptest! {
        #[test]
        fn issue_text_round_trips(text in "[A-Za-z][A-Za-z ]{0,40}[A-Za-z]") {
            let parsed = parse_command_line(&format!("issue {text}")).unwrap();
            prop_assert_eq!(parsed, FlowCommand::Issue(text));
        }
    }
}
