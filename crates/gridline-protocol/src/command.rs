//! Line parser for the client command language.
//!
//! Clients speak plain newline-terminated text. Each line is parsed
//! independently into a [`Command`]; there is no state carried between
//! lines. The instruction token is case-insensitive, arguments are not
//! (room names preserve their case).

use crate::ProtocolError;

/// Help text sent to a client for unrecognized input (or an empty line).
pub const HELP_TEXT: &str = "
Commands are:

JOIN <r>  join room <r> (and leave the current one if already joined)
MARK <n>  mark square <n>, where squares are numbered like in the following diagram:
           1 | 2 | 3
          ---+---+---
           4 | 5 | 6
          ---+---+---
           7 | 8 | 9
!<text>   send <text> to everyone in the current room
QUIT      leave the current room and close the connection
";

/// One parsed client instruction.
///
/// Unknown instructions parse to [`Command::Help`] rather than an error:
/// typing nonsense gets you the command list, not a scolding. Only a
/// recognized instruction with a malformed argument list is a
/// [`ProtocolError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Join (or switch to) the named room.
    Join(String),
    /// Mark a board cell, numbered 1 through 9.
    Mark(usize),
    /// Leave the current room and close the connection.
    Quit,
    /// Broadcast free text to the current room.
    Chat(String),
    /// Show the command list.
    Help,
}

impl Command {
    /// Parses one line of client input.
    ///
    /// The line is trimmed first; a leading `!` turns the rest of the
    /// line into a verbatim [`Command::Chat`]. Everything else is split
    /// on whitespace and matched on the uppercased first token.
    ///
    /// # Errors
    /// Returns [`ProtocolError::BadArguments`] when JOIN or MARK is
    /// given the wrong number of arguments, and
    /// [`ProtocolError::BadCellIndex`] when MARK's argument is not a
    /// number.
    pub fn parse(line: &str) -> Result<Command, ProtocolError> {
        let line = line.trim();

        if let Some(text) = line.strip_prefix('!') {
            return Ok(Command::Chat(text.to_string()));
        }

        let mut tokens = line.split_whitespace();
        let Some(instruction) = tokens.next() else {
            return Ok(Command::Help);
        };
        let args: Vec<&str> = tokens.collect();

        match instruction.to_ascii_uppercase().as_str() {
            "JOIN" => {
                let [room] = args[..] else {
                    return Err(ProtocolError::BadArguments("JOIN <room>"));
                };
                Ok(Command::Join(room.to_string()))
            }
            "MARK" => {
                let [cell] = args[..] else {
                    return Err(ProtocolError::BadArguments("MARK <cell>"));
                };
                let cell = cell
                    .parse::<usize>()
                    .map_err(|_| ProtocolError::BadCellIndex)?;
                Ok(Command::Mark(cell))
            }
            "QUIT" => Ok(Command::Quit),
            _ => Ok(Command::Help),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_join() {
        assert_eq!(
            Command::parse("JOIN lobby"),
            Ok(Command::Join("lobby".to_string()))
        );
    }

    #[test]
    fn test_instruction_is_case_insensitive() {
        assert_eq!(
            Command::parse("join lobby"),
            Ok(Command::Join("lobby".to_string()))
        );
        assert_eq!(Command::parse("mArK 5"), Ok(Command::Mark(5)));
        assert_eq!(Command::parse("quit"), Ok(Command::Quit));
    }

    #[test]
    fn test_room_name_case_is_preserved() {
        assert_eq!(
            Command::parse("join Lobby"),
            Ok(Command::Join("Lobby".to_string()))
        );
    }

    #[test]
    fn test_parse_mark() {
        assert_eq!(Command::parse("MARK 7"), Ok(Command::Mark(7)));
    }

    #[test]
    fn test_mark_rejects_non_numeric_cell() {
        assert_eq!(
            Command::parse("MARK abc"),
            Err(ProtocolError::BadCellIndex)
        );
    }

    #[test]
    fn test_join_requires_exactly_one_argument() {
        assert_eq!(
            Command::parse("JOIN"),
            Err(ProtocolError::BadArguments("JOIN <room>"))
        );
        assert_eq!(
            Command::parse("JOIN a b"),
            Err(ProtocolError::BadArguments("JOIN <room>"))
        );
    }

    #[test]
    fn test_mark_requires_exactly_one_argument() {
        assert_eq!(
            Command::parse("MARK"),
            Err(ProtocolError::BadArguments("MARK <cell>"))
        );
        assert_eq!(
            Command::parse("MARK 1 2"),
            Err(ProtocolError::BadArguments("MARK <cell>"))
        );
    }

    #[test]
    fn test_chat_keeps_text_verbatim() {
        assert_eq!(
            Command::parse("!hello there"),
            Ok(Command::Chat("hello there".to_string()))
        );
        // The prefix is stripped, nothing else is touched.
        assert_eq!(
            Command::parse("!  spaced  out  "),
            Ok(Command::Chat("  spaced  out".to_string()))
        );
    }

    #[test]
    fn test_unknown_input_is_help() {
        assert_eq!(Command::parse("DANCE"), Ok(Command::Help));
        assert_eq!(Command::parse(""), Ok(Command::Help));
        assert_eq!(Command::parse("   "), Ok(Command::Help));
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        assert_eq!(
            Command::parse("  JOIN lobby \t"),
            Ok(Command::Join("lobby".to_string()))
        );
    }
}
