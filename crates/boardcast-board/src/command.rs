//! Parsing of raw move commands.
//!
//! A command is four characters, `<file><rank><file><rank>`, for example
//! `e2e4`. Input is lowercased and one trailing line ending is removed
//! before the length check, so `E2E4\n` is accepted.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BoardError;
use crate::square::{File, Rank, Square};

/// Length of a normalized move command, in bytes.
pub const COMMAND_LEN: usize = 4;

/// What to do with a character that names no file or rank.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SquarePolicy {
    /// Fail with [`BoardError::UnmappedSquare`].
    #[default]
    Reject,
    /// Treat the character as index 0 (file `a` or rank `1`).
    Zero,
}

/// A parsed move: swap the contents of `from` and `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveCommand {
    /// First addressed square.
    pub from: Square,
    /// Second addressed square.
    pub to: Square,
}

impl MoveCommand {
    /// Create a command from two squares.
    pub const fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }

    /// Parse a raw command line under the given policy.
    pub fn parse(raw: &str, policy: SquarePolicy) -> Result<Self, BoardError> {
        let normalized = normalize(raw);
        if normalized.len() != COMMAND_LEN {
            return Err(BoardError::MalformedCommand {
                length: normalized.len(),
            });
        }

        let chars: Vec<char> = normalized.chars().collect();
        let from = Square::new(
            lookup(&chars, 0, policy, File::from_char, File::A)?,
            lookup(&chars, 1, policy, Rank::from_char, Rank::One)?,
        );
        let to = Square::new(
            lookup(&chars, 2, policy, File::from_char, File::A)?,
            lookup(&chars, 3, policy, Rank::from_char, Rank::One)?,
        );

        Ok(Self { from, to })
    }
}

impl FromStr for MoveCommand {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, SquarePolicy::Reject)
    }
}

impl core::fmt::Display for MoveCommand {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

/// Lowercase and drop one trailing `\n` (and a `\r` before it).
fn normalize(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let trimmed = lowered.strip_suffix('\n').map_or(lowered.as_str(), |rest| {
        rest.strip_suffix('\r').unwrap_or(rest)
    });
    trimmed.to_owned()
}

/// Resolve the character at `position` through `table`.
///
/// Non-ASCII input can leave fewer than four characters; a missing
/// position is looked up as `'\0'`, which no table maps.
fn lookup<T>(
    chars: &[char],
    position: usize,
    policy: SquarePolicy,
    table: fn(char) -> Option<T>,
    zero: T,
) -> Result<T, BoardError> {
    let character = chars.get(position).copied().unwrap_or('\0');
    match (table(character), policy) {
        (Some(value), _) => Ok(value),
        (None, SquarePolicy::Zero) => Ok(zero),
        (None, SquarePolicy::Reject) => Err(BoardError::UnmappedSquare {
            position,
            character,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(file: File, rank: Rank) -> Square {
        Square::new(file, rank)
    }

    #[test]
    fn parses_plain_command() {
        let cmd: Result<MoveCommand, _> = "e2e4".parse();
        assert_eq!(
            cmd,
            Ok(MoveCommand::new(sq(File::E, Rank::Two), sq(File::E, Rank::Four)))
        );
    }

    #[test]
    fn uppercase_and_trailing_newline_are_normalized() {
        let expected = MoveCommand::new(sq(File::G, Rank::One), sq(File::F, Rank::Three));
        assert_eq!(MoveCommand::parse("G1F3\n", SquarePolicy::Reject), Ok(expected));
        assert_eq!(MoveCommand::parse("g1f3\r\n", SquarePolicy::Reject), Ok(expected));
    }

    #[test]
    fn only_one_newline_is_stripped() {
        assert_eq!(
            MoveCommand::parse("e2e4\n\n", SquarePolicy::Reject),
            Err(BoardError::MalformedCommand { length: 5 })
        );
    }

    #[test]
    fn wrong_length_is_malformed() {
        for (raw, length) in [("", 0), ("\n", 0), ("e2e", 3), ("e2e4x", 5), (" e2e4", 5)] {
            assert_eq!(
                MoveCommand::parse(raw, SquarePolicy::Reject),
                Err(BoardError::MalformedCommand { length }),
                "input {raw:?}"
            );
        }
    }

    #[test]
    fn reject_policy_reports_first_unmapped_character() {
        assert_eq!(
            MoveCommand::parse("e9e4", SquarePolicy::Reject),
            Err(BoardError::UnmappedSquare {
                position: 1,
                character: '9'
            })
        );
        assert_eq!(
            MoveCommand::parse("z2e4", SquarePolicy::Reject),
            Err(BoardError::UnmappedSquare {
                position: 0,
                character: 'z'
            })
        );
        // A digit in a file position is not a file.
        assert!(matches!(
            MoveCommand::parse("22e4", SquarePolicy::Reject),
            Err(BoardError::UnmappedSquare { position: 0, .. })
        ));
    }

    #[test]
    fn zero_policy_maps_unknown_characters_to_index_zero() {
        assert_eq!(
            MoveCommand::parse("z9e4", SquarePolicy::Zero),
            Ok(MoveCommand::new(sq(File::A, Rank::One), sq(File::E, Rank::Four)))
        );
    }

    #[test]
    fn non_ascii_counts_bytes_for_length() {
        // 'é' is two bytes, so "é2e" is four bytes but three characters.
        assert_eq!(
            MoveCommand::parse("é2e", SquarePolicy::Reject),
            Err(BoardError::UnmappedSquare {
                position: 0,
                character: 'é'
            })
        );
        assert_eq!(
            MoveCommand::parse("é2e4", SquarePolicy::Reject),
            Err(BoardError::MalformedCommand { length: 5 })
        );
    }

    #[test]
    fn display_round_trips_text() {
        let cmd = MoveCommand::new(sq(File::B, Rank::Eight), sq(File::C, Rank::Six));
        assert_eq!(cmd.to_string(), "b8c6");
    }
}
