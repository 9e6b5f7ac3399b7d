//! Error types for the `boardcast-board` crate.

/// Errors returned when a raw move command cannot be applied.
///
/// In both cases the board is left exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// The normalized command is not exactly four bytes long.
    #[error("malformed move command: expected 4 characters, got {length}")]
    MalformedCommand {
        /// Byte length of the command after normalization.
        length: usize,
    },

    /// A character does not name a file (`a`-`h`) or rank (`1`-`8`).
    #[error("unmapped square reference {character:?} at position {position}")]
    UnmappedSquare {
        /// Zero-based position of the offending character in the command.
        position: usize,
        /// The offending character.
        character: char,
    },
}
