//! Per-connection session state and outbound line delivery.
//!
//! Every accepted connection is split in two: the connection task owns
//! the reading half and parses commands, while a dedicated writer task
//! owns the writing half and drains the session's line channel. Room
//! actors and the dispatcher only ever push lines into the channel, so
//! a slow or dead peer can never block game logic.

use std::sync::atomic::{AtomicU64, Ordering};

use gridline_protocol::SessionId;
use gridline_room::{LineSender, Player};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

/// Process-wide source of session ids. Ids are never reused within one
/// server run.
static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// Server-side state for one connected client.
///
/// Tracks the client's identity, its outbound line channel, and the
/// room it currently occupies. Only the session's own connection task
/// touches the room field, so it needs no lock.
pub struct Session {
    id: SessionId,
    outbound: LineSender,
    room: Option<String>,
}

impl Session {
    /// Creates a session for a freshly accepted connection: assigns
    /// the next id and spawns the writer task that owns `write_half`.
    pub fn start<W>(write_half: W) -> Session
    where
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let id = SessionId(NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(write_lines(id, write_half, rx));

        Session {
            id,
            outbound: tx,
            room: None,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// The name of the room this session currently occupies.
    pub fn room(&self) -> Option<&str> {
        self.room.as_deref()
    }

    pub fn set_room(&mut self, room: Option<String>) {
        self.room = room;
    }

    /// The room-side handle for this session.
    pub fn player(&self) -> Player {
        Player::new(self.id, self.outbound.clone())
    }

    /// Queues one line for delivery to this client.
    pub fn send(&self, line: impl Into<String>) {
        let _ = self.outbound.send(line.into());
    }
}

/// Drains a session's line channel into its socket, appending the
/// newline framing, until the channel closes or a write fails. A write
/// failure only ends this task; the reading side notices the broken
/// connection on its own.
async fn write_lines<W>(id: SessionId, mut write_half: W, mut rx: mpsc::UnboundedReceiver<String>)
where
    W: AsyncWrite + Unpin,
{
    while let Some(mut line) = rx.recv().await {
        line.push('\n');
        if let Err(err) = write_half.write_all(line.as_bytes()).await {
            tracing::warn!(session = %id, error = %err, "write failed, dropping outbound lines");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncBufReadExt, BufReader};

    #[tokio::test]
    async fn test_sessions_get_distinct_ids() {
        let (a, _keep_a) = tokio::io::duplex(64);
        let (b, _keep_b) = tokio::io::duplex(64);
        assert_ne!(Session::start(a).id(), Session::start(b).id());
    }

    #[tokio::test]
    async fn test_writer_task_appends_newline_framing() {
        let (write_half, read_half) = tokio::io::duplex(64);
        let session = Session::start(write_half);

        session.send("hello");
        session.send("world");

        let mut reader = BufReader::new(read_half);
        let mut line = String::new();
        reader.read_line(&mut line).await.unwrap();
        assert_eq!(line, "hello\n");
        line.clear();
        reader.read_line(&mut line).await.unwrap();
        assert_eq!(line, "world\n");
    }

    #[tokio::test]
    async fn test_player_shares_the_session_channel() {
        let (write_half, read_half) = tokio::io::duplex(64);
        let session = Session::start(write_half);

        session.player().send("from the room");

        let mut reader = BufReader::new(read_half);
        let mut line = String::new();
        reader.read_line(&mut line).await.unwrap();
        assert_eq!(line, "from the room\n");
    }
}
