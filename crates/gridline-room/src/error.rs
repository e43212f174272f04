//! Error types for the room layer.

/// Why a room rejected an action.
///
/// These are rule violations, not faults. The server relays the message
/// text to the offending session as one plain line and the connection
/// stays open; internally generated actions that fail are only logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RoomError {
    /// The room already has two members.
    #[error("room is already full")]
    RoomFull,

    /// The session is already a member of this room.
    #[error("player is already in this room")]
    AlreadyJoined,

    /// The acting session is not a member of this room.
    #[error("player is not a member of this room")]
    NotAMember,

    /// A mark arrived from the member whose turn it is not.
    #[error("not your turn yet")]
    NotYourTurn,

    /// The cell number is outside 1..=9.
    #[error("cell must be between 1 and 9")]
    CellOutOfRange,

    /// The cell already carries a mark.
    #[error("cell is already marked")]
    CellTaken,

    /// The action needs two members and the room has fewer.
    #[error("room is not ready")]
    NotReady,

    /// The room's action queue is closed.
    #[error("room is unavailable")]
    Unavailable,
}
