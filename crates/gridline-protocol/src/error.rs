//! Errors produced while parsing client input.

use thiserror::Error;

/// Why a line of client input failed to parse into a [`Command`].
///
/// The text of each variant is sent verbatim back to the client, so the
/// messages are phrased for a human at a terminal rather than for a log.
///
/// [`Command`]: crate::Command
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// The instruction was recognized but its arguments were missing or
    /// malformed. Carries the usage line for that instruction.
    #[error("invalid arguments, usage: {0}")]
    BadArguments(&'static str),

    /// MARK was given something that is not a cell number.
    #[error("cell must be a number between 1 and 9")]
    BadCellIndex,
}
