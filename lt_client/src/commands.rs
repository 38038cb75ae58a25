use loteria::{Language, RoomCode, WinPattern, session::validate_player_name};
use std::fmt;

/// A parsed input-box command.
#[derive(Clone, Debug, PartialEq)]
pub enum UiCommand {
    Join(RoomCode),
    Name(String),
    /// Zero-based board position.
    Mark(usize),
    Claim,
    Draw,
    Pause,
    Resume,
    Reset,
    Start {
        win_pattern: Option<WinPattern>,
        draw_speed_secs: Option<u32>,
    },
    Kick(String),
    MakeHost(String),
    Lang(Language),
}

/// Errors that can occur during command parsing.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseError {
    /// Room code is not 4 letters/digits.
    InvalidRoomCode(String),
    /// Player name too short after trimming.
    NameTooShort,
    /// Board position is not a number in 1-16.
    InvalidPosition(String),
    /// Unknown win pattern name.
    InvalidPattern(String),
    /// Draw speed is not a number of seconds.
    InvalidDrawSpeed(String),
    /// Language is not es or en.
    InvalidLanguage(String),
    /// Command is missing a required argument.
    MissingArgument(&'static str),
    /// Unrecognized command.
    UnrecognizedCommand(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRoomCode(code) => write!(
                f,
                "Invalid room code '{code}'. Codes are 4 letters or digits (e.g., 'join AB3D')"
            ),
            Self::NameTooShort => write!(f, "Names need at least 2 characters"),
            Self::InvalidPosition(value) => write!(
                f,
                "Invalid board position '{value}'. Use 1-16, top-left to bottom-right"
            ),
            Self::InvalidPattern(value) => write!(
                f,
                "Unknown win pattern '{value}'. Use line, corners, center, x, or full"
            ),
            Self::InvalidDrawSpeed(value) => write!(
                f,
                "Invalid draw speed '{value}'. Use seconds between draws, 0 for manual"
            ),
            Self::InvalidLanguage(value) => {
                write!(f, "Unknown language '{value}'. Use 'lang es' or 'lang en'")
            }
            Self::MissingArgument(usage) => write!(f, "{usage}"),
            Self::UnrecognizedCommand(cmd) => write!(
                f,
                "Unrecognized command '{cmd}'. Press Tab to see available commands"
            ),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse a command string from the input box.
pub fn parse_command(input: &str) -> Result<UiCommand, ParseError> {
    let trimmed = input.trim();

    // Single-word commands first.
    match trimmed {
        "loteria" | "lotería" | "claim" => return Ok(UiCommand::Claim),
        "draw" => return Ok(UiCommand::Draw),
        "pause" => return Ok(UiCommand::Pause),
        "resume" => return Ok(UiCommand::Resume),
        "reset" => return Ok(UiCommand::Reset),
        "start" => {
            return Ok(UiCommand::Start {
                win_pattern: None,
                draw_speed_secs: None,
            });
        }
        _ => {}
    }

    let parts: Vec<&str> = trimmed.split_ascii_whitespace().collect();
    match parts.first() {
        Some(&"join") => parse_join(&parts),
        Some(&"name") => parse_name(trimmed),
        Some(&"mark") => parse_mark(&parts),
        Some(&"start") => parse_start(&parts),
        Some(&"kick") => match parts.get(1) {
            Some(id) => Ok(UiCommand::Kick((*id).to_string())),
            None => Err(ParseError::MissingArgument(
                "Kick requires a player id (e.g., 'kick p2')",
            )),
        },
        Some(&"host") => match parts.get(1) {
            Some(id) => Ok(UiCommand::MakeHost((*id).to_string())),
            None => Err(ParseError::MissingArgument(
                "Host transfer requires a player id (e.g., 'host p2')",
            )),
        },
        Some(&"lang") => parse_lang(&parts),
        _ => Err(ParseError::UnrecognizedCommand(trimmed.to_string())),
    }
}

/// Parse a join command: "join CODE"
fn parse_join(parts: &[&str]) -> Result<UiCommand, ParseError> {
    match parts.get(1) {
        Some(code) => RoomCode::parse(code)
            .map(UiCommand::Join)
            .map_err(|_| ParseError::InvalidRoomCode((*code).to_string())),
        None => Err(ParseError::MissingArgument(
            "Join requires a room code (e.g., 'join AB3D')",
        )),
    }
}

/// Parse a name command, keeping interior spaces: "name Ana María"
fn parse_name(trimmed: &str) -> Result<UiCommand, ParseError> {
    let rest = trimmed.strip_prefix("name").unwrap_or_default();
    validate_player_name(rest)
        .map(UiCommand::Name)
        .map_err(|_| ParseError::NameTooShort)
}

/// Parse a mark command: "mark N" with N in 1-16.
fn parse_mark(parts: &[&str]) -> Result<UiCommand, ParseError> {
    match parts.get(1) {
        Some(value) => match value.parse::<usize>() {
            Ok(n) if (1..=16).contains(&n) => Ok(UiCommand::Mark(n - 1)),
            _ => Err(ParseError::InvalidPosition((*value).to_string())),
        },
        None => Err(ParseError::MissingArgument(
            "Mark requires a board position (e.g., 'mark 7')",
        )),
    }
}

/// Parse a start command: "start [PATTERN] [SPEED]"
fn parse_start(parts: &[&str]) -> Result<UiCommand, ParseError> {
    let win_pattern = match parts.get(1) {
        Some(value) => Some(
            value
                .parse::<WinPattern>()
                .map_err(|_| ParseError::InvalidPattern((*value).to_string()))?,
        ),
        None => None,
    };
    let draw_speed_secs = match parts.get(2) {
        Some(value) => Some(
            value
                .parse::<u32>()
                .map_err(|_| ParseError::InvalidDrawSpeed((*value).to_string()))?,
        ),
        None => None,
    };
    Ok(UiCommand::Start {
        win_pattern,
        draw_speed_secs,
    })
}

/// Parse a language command: "lang es" or "lang en"
fn parse_lang(parts: &[&str]) -> Result<UiCommand, ParseError> {
    match parts.get(1) {
        Some(&"es") => Ok(UiCommand::Lang(Language::Es)),
        Some(&"en") => Ok(UiCommand::Lang(Language::En)),
        Some(value) => Err(ParseError::InvalidLanguage((*value).to_string())),
        None => Err(ParseError::MissingArgument(
            "Language requires a value: 'lang es' or 'lang en'",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // === Single-word command tests ===

    #[test]
    fn test_parse_claim_aliases() {
        assert_eq!(parse_command("loteria"), Ok(UiCommand::Claim));
        assert_eq!(parse_command("lotería"), Ok(UiCommand::Claim));
        assert_eq!(parse_command("claim"), Ok(UiCommand::Claim));
    }

    #[test]
    fn test_parse_draw() {
        assert_eq!(parse_command("draw"), Ok(UiCommand::Draw));
    }

    #[test]
    fn test_parse_pause_and_resume() {
        assert_eq!(parse_command("pause"), Ok(UiCommand::Pause));
        assert_eq!(parse_command("resume"), Ok(UiCommand::Resume));
    }

    #[test]
    fn test_parse_reset() {
        assert_eq!(parse_command("reset"), Ok(UiCommand::Reset));
    }

    // === Whitespace handling ===

    #[test]
    fn test_parse_with_surrounding_whitespace() {
        assert_eq!(parse_command("  draw  "), Ok(UiCommand::Draw));
    }

    // === Join command tests ===

    #[test]
    fn test_parse_join_uppercases_code() {
        match parse_command("join ab3d") {
            Ok(UiCommand::Join(code)) => assert_eq!(code.as_str(), "AB3D"),
            other => panic!("expected join, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_join_rejects_bad_code() {
        assert!(matches!(
            parse_command("join abcde"),
            Err(ParseError::InvalidRoomCode(_))
        ));
    }

    #[test]
    fn test_parse_join_without_code() {
        assert!(matches!(
            parse_command("join"),
            Err(ParseError::MissingArgument(_))
        ));
    }

    // === Name command tests ===

    #[test]
    fn test_parse_name() {
        assert_eq!(
            parse_command("name Ana"),
            Ok(UiCommand::Name("Ana".to_string()))
        );
    }

    #[test]
    fn test_parse_name_keeps_interior_spaces() {
        assert_eq!(
            parse_command("name Ana María"),
            Ok(UiCommand::Name("Ana María".to_string()))
        );
    }

    #[test]
    fn test_parse_name_too_short() {
        assert_eq!(parse_command("name A"), Err(ParseError::NameTooShort));
        assert_eq!(parse_command("name"), Err(ParseError::NameTooShort));
    }

    // === Mark command tests ===

    #[test]
    fn test_parse_mark_converts_to_zero_based() {
        assert_eq!(parse_command("mark 1"), Ok(UiCommand::Mark(0)));
        assert_eq!(parse_command("mark 16"), Ok(UiCommand::Mark(15)));
    }

    #[test]
    fn test_parse_mark_rejects_out_of_range() {
        assert!(matches!(
            parse_command("mark 0"),
            Err(ParseError::InvalidPosition(_))
        ));
        assert!(matches!(
            parse_command("mark 17"),
            Err(ParseError::InvalidPosition(_))
        ));
    }

    #[test]
    fn test_parse_mark_rejects_non_number() {
        assert!(matches!(
            parse_command("mark gallo"),
            Err(ParseError::InvalidPosition(_))
        ));
    }

    #[test]
    fn test_parse_mark_without_position() {
        assert!(matches!(
            parse_command("mark"),
            Err(ParseError::MissingArgument(_))
        ));
    }

    // === Start command tests ===

    #[test]
    fn test_parse_start_bare() {
        assert_eq!(
            parse_command("start"),
            Ok(UiCommand::Start {
                win_pattern: None,
                draw_speed_secs: None,
            })
        );
    }

    #[test]
    fn test_parse_start_with_pattern() {
        assert_eq!(
            parse_command("start corners"),
            Ok(UiCommand::Start {
                win_pattern: Some(WinPattern::Corners),
                draw_speed_secs: None,
            })
        );
    }

    #[test]
    fn test_parse_start_with_pattern_and_speed() {
        assert_eq!(
            parse_command("start full 0"),
            Ok(UiCommand::Start {
                win_pattern: Some(WinPattern::Full),
                draw_speed_secs: Some(0),
            })
        );
    }

    #[test]
    fn test_parse_start_with_unknown_pattern() {
        assert!(matches!(
            parse_command("start blackout"),
            Err(ParseError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_parse_start_with_bad_speed() {
        assert!(matches!(
            parse_command("start line fast"),
            Err(ParseError::InvalidDrawSpeed(_))
        ));
    }

    // === Roster command tests ===

    #[test]
    fn test_parse_kick() {
        assert_eq!(
            parse_command("kick p2"),
            Ok(UiCommand::Kick("p2".to_string()))
        );
        assert!(matches!(
            parse_command("kick"),
            Err(ParseError::MissingArgument(_))
        ));
    }

    #[test]
    fn test_parse_host_transfer() {
        assert_eq!(
            parse_command("host p3"),
            Ok(UiCommand::MakeHost("p3".to_string()))
        );
    }

    // === Language command tests ===

    #[test]
    fn test_parse_lang() {
        assert_eq!(parse_command("lang en"), Ok(UiCommand::Lang(Language::En)));
        assert_eq!(parse_command("lang es"), Ok(UiCommand::Lang(Language::Es)));
    }

    #[test]
    fn test_parse_lang_rejects_unknown() {
        assert!(matches!(
            parse_command("lang fr"),
            Err(ParseError::InvalidLanguage(_))
        ));
    }

    // === Error cases ===

    #[test]
    fn test_parse_unrecognized_command() {
        assert!(matches!(
            parse_command("fold"),
            Err(ParseError::UnrecognizedCommand(_))
        ));
    }

    #[test]
    fn test_parse_empty_string() {
        assert!(matches!(
            parse_command(""),
            Err(ParseError::UnrecognizedCommand(_))
        ));
    }

    // === Error message tests ===

    #[test]
    fn test_error_message_invalid_room_code() {
        let msg = ParseError::InvalidRoomCode("abcde".to_string()).to_string();
        assert!(msg.contains("abcde"));
        assert!(msg.contains("4 letters"));
    }

    #[test]
    fn test_error_message_invalid_position() {
        let msg = ParseError::InvalidPosition("42".to_string()).to_string();
        assert!(msg.contains("42"));
        assert!(msg.contains("1-16"));
    }

    #[test]
    fn test_error_message_unrecognized() {
        let msg = ParseError::UnrecognizedCommand("fold".to_string()).to_string();
        assert!(msg.contains("fold"));
        assert!(msg.contains("Tab"));
    }
}
