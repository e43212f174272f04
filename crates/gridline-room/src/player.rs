//! The room-side handle to a member session.

use gridline_protocol::SessionId;
use tokio::sync::mpsc;

/// Channel sender for delivering outbound text lines to one session.
///
/// The session's writer task owns the receiving end and adds the
/// newline framing, so room code sends bare lines.
pub type LineSender = mpsc::UnboundedSender<String>;

/// A room member: session identity plus the way to reach its terminal.
///
/// Cheap to clone. Equality compares ids only, so membership checks
/// work across sender clones.
#[derive(Debug, Clone)]
pub struct Player {
    id: SessionId,
    sender: LineSender,
}

impl Player {
    pub fn new(id: SessionId, sender: LineSender) -> Player {
        Player { id, sender }
    }

    /// The session this player belongs to.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Sends one text line to this player's session. Silently drops
    /// the line if the receiver is gone (session disconnected); a
    /// dead peer never fails game logic.
    pub fn send(&self, line: impl Into<String>) {
        let _ = self.sender.send(line.into());
    }
}

impl PartialEq for Player {
    fn eq(&self, other: &Player) -> bool {
        self.id == other.id
    }
}

impl Eq for Player {}
