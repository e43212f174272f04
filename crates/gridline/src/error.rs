//! Unified error type for the server crate.

use gridline_protocol::ProtocolError;
use gridline_room::RoomError;

/// Top-level error that wraps the lower layers' errors.
///
/// Dispatch relays the message text of protocol and room errors back to
/// the offending client as a plain line and keeps the connection open.
/// `Io` covers the listener plumbing; failing to bind is the one error
/// that takes the process down.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The input line didn't parse into a command.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The room rejected the action.
    #[error(transparent)]
    Room(#[from] RoomError),

    /// The command needs a current room and the session has none.
    #[error("player is not in a room")]
    NoRoom,

    /// Socket-level failure (bind, accept).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
