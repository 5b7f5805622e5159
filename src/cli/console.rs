//! Console command language
//!
//! One command per line; [`HELP`] lists them. Commands and column names
//! are case-insensitive.

use std::str::FromStr;

use thiserror::Error;

/// Form field addressed by `set`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Rank,
    Team,
    Points,
}

/// One parsed console line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    List,
    Select(i64),
    Deselect,
    Set(FormField, String),
    /// 0-based slot
    Toggle(usize),
    Add,
    Update,
    Delete,
    Clear,
    Sort(String),
    Save,
    Help,
    Quit,
}

impl ConsoleCommand {
    /// Whether the command destroys rows and needs a y/N answer first.
    pub fn needs_confirmation(&self) -> bool {
        matches!(self, ConsoleCommand::Delete | ConsoleCommand::Clear)
    }
}

/// Unparseable console line
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsoleError {
    #[error("unknown command '{0}' (type 'help')")]
    Unknown(String),

    #[error("'{command}' needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("'{value}' is not a valid {argument}")]
    InvalidArgument {
        argument: &'static str,
        value: String,
    },
}

impl FromStr for ConsoleCommand {
    type Err = ConsoleError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "list" | "ls" => ConsoleCommand::List,
            "select" => {
                let rank = required("select", "a # value", rest)?;
                let rank = rank.parse::<i64>().map_err(|_| ConsoleError::InvalidArgument {
                    argument: "#",
                    value: rank.to_string(),
                })?;
                ConsoleCommand::Select(rank)
            }
            "deselect" => ConsoleCommand::Deselect,
            "set" => {
                let rest = required("set", "a field and a value", rest)?;
                let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                let field = match field.to_ascii_lowercase().as_str() {
                    "rank" | "#" => FormField::Rank,
                    "team" => FormField::Team,
                    "points" => FormField::Points,
                    _ => {
                        return Err(ConsoleError::InvalidArgument {
                            argument: "field (rank, team, points)",
                            value: field.to_string(),
                        })
                    }
                };
                ConsoleCommand::Set(field, value.trim().to_string())
            }
            "toggle" => {
                let slot = required("toggle", "a slot number (1-4)", rest)?;
                match slot.parse::<usize>() {
                    Ok(n) if n >= 1 => ConsoleCommand::Toggle(n - 1),
                    _ => {
                        return Err(ConsoleError::InvalidArgument {
                            argument: "slot number",
                            value: slot.to_string(),
                        })
                    }
                }
            }
            "add" => ConsoleCommand::Add,
            "update" => ConsoleCommand::Update,
            "delete" | "del" => ConsoleCommand::Delete,
            "clear" => ConsoleCommand::Clear,
            "sort" => ConsoleCommand::Sort(required("sort", "a column", rest)?.to_string()),
            "save" => ConsoleCommand::Save,
            "help" | "?" => ConsoleCommand::Help,
            "quit" | "exit" | "q" => ConsoleCommand::Quit,
            _ => return Err(ConsoleError::Unknown(word.to_string())),
        };

        Ok(command)
    }
}

fn required<'a>(
    command: &'static str,
    argument: &'static str,
    rest: &'a str,
) -> Result<&'a str, ConsoleError> {
    if rest.is_empty() {
        Err(ConsoleError::MissingArgument { command, argument })
    } else {
        Ok(rest)
    }
}

/// Whether a confirmation answer means yes.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

pub const HELP: &str = "\
commands:
  list                      show the table
  select <#>                load a row into the form
  deselect                  clear the selection and form
  set rank|team|points <v>  fill a form field
  toggle <1-4>              flip one status slot in the form
  add                       add the form as a new row
  update                    write the form status to the selected row
  delete                    delete the selected row
  clear                     delete every row
  sort <column>             sort by #, Team, Points or Status (again to reverse)
  save                      save now
  quit                      leave (unsaved changes within the idle delay are lost)";

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<ConsoleCommand, ConsoleError> {
        line.parse()
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse("list"), Ok(ConsoleCommand::List));
        assert_eq!(parse("  ADD "), Ok(ConsoleCommand::Add));
        assert_eq!(parse("q"), Ok(ConsoleCommand::Quit));
        assert_eq!(parse("select -3"), Ok(ConsoleCommand::Select(-3)));
    }

    #[test]
    fn test_set_keeps_spaces_in_team() {
        assert_eq!(
            parse("set team  Team Soul "),
            Ok(ConsoleCommand::Set(FormField::Team, "Team Soul".into()))
        );
        assert_eq!(
            parse("set # 4"),
            Ok(ConsoleCommand::Set(FormField::Rank, "4".into()))
        );
        assert_eq!(
            parse("set points"),
            Ok(ConsoleCommand::Set(FormField::Points, String::new()))
        );
    }

    #[test]
    fn test_toggle_is_one_based() {
        assert_eq!(parse("toggle 1"), Ok(ConsoleCommand::Toggle(0)));
        assert_eq!(parse("toggle 5"), Ok(ConsoleCommand::Toggle(4)));
        assert!(matches!(
            parse("toggle 0"),
            Err(ConsoleError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse("fly"), Err(ConsoleError::Unknown("fly".into())));
        assert!(matches!(
            parse("select"),
            Err(ConsoleError::MissingArgument { command: "select", .. })
        ));
        assert!(matches!(
            parse("select one"),
            Err(ConsoleError::InvalidArgument { .. })
        ));
        assert!(matches!(
            parse("set kills 3"),
            Err(ConsoleError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_confirmation() {
        assert!(ConsoleCommand::Delete.needs_confirmation());
        assert!(!ConsoleCommand::Add.needs_confirmation());
        assert!(is_affirmative(" Y "));
        assert!(!is_affirmative(""));
    }
}
