//! TCP accept loop and per-connection command dispatch.
//!
//! Each accepted socket gets its own task that reads lines, parses them
//! into [`Command`]s and routes the result to the session's current
//! room. All game state lives behind room actors; this module only
//! shuttles messages.

use std::net::SocketAddr;
use std::sync::Arc;

use gridline_protocol::{Command, HELP_TEXT};
use gridline_room::{Action, RoomError, RoomHandle};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

use crate::error::ServerError;
use crate::registry::RoomRegistry;
use crate::session::Session;

/// Whether the session keeps reading after a command.
enum Flow {
    Continue,
    Quit,
}

/// Listening server. Owns the socket and the shared room registry.
pub struct Server {
    listener: TcpListener,
    registry: Arc<RoomRegistry>,
}

impl Server {
    /// Binds the given address without accepting yet.
    pub async fn bind(addr: &str) -> Result<Server, ServerError> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Server {
            listener,
            registry: Arc::new(RoomRegistry::new()),
        })
    }

    /// Address the server is actually listening on. Useful when bound
    /// to port 0.
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts connections until the process is stopped, spawning a
    /// task per client.
    pub async fn run(self) -> Result<(), ServerError> {
        let addr = self.local_addr()?;
        tracing::info!(%addr, "server listening");

        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    let registry = Arc::clone(&self.registry);
                    tokio::spawn(handle_connection(stream, peer, registry));
                }
                Err(err) => {
                    tracing::error!(error = %err, "accept failed");
                }
            }
        }
    }
}

/// Reads commands off one socket until the client quits or hangs up.
async fn handle_connection(stream: TcpStream, peer: SocketAddr, registry: Arc<RoomRegistry>) {
    let (read_half, write_half) = stream.into_split();
    let mut session = Session::start(write_half);
    tracing::info!(session = %session.id(), %peer, "client connected");

    let mut lines = BufReader::new(read_half);
    let mut line = String::new();
    loop {
        line.clear();
        match lines.read_line(&mut line).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(err) => {
                tracing::debug!(session = %session.id(), error = %err, "read failed");
                break;
            }
        }

        match dispatch(&mut session, line.trim(), &registry).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(err) => {
                tracing::debug!(session = %session.id(), error = %err, "command rejected");
                session.send(err.to_string());
            }
        }
    }

    // Socket gone or QUIT processed. Tell the room, if any, that the
    // player is out so the opponent is not left waiting on a ghost.
    if let Some(name) = session.room() {
        if let Some(room) = registry.get(name).await {
            if let Err(err) = room.submit(Action::Hangup(session.player())).await {
                tracing::debug!(session = %session.id(), error = %err, "hangup notify failed");
            }
        }
    }
    tracing::info!(session = %session.id(), %peer, "client disconnected");
}

/// Routes one parsed command. Errors bubble to the caller, which
/// reports them to the client and keeps the session alive.
async fn dispatch(
    session: &mut Session,
    line: &str,
    registry: &RoomRegistry,
) -> Result<Flow, ServerError> {
    match Command::parse(line)? {
        Command::Join(name) => {
            join_room(session, name, registry).await?;
            Ok(Flow::Continue)
        }
        Command::Mark(cell) => {
            let room = current_room(session, registry).await?;
            room.submit(Action::Mark {
                player: session.player(),
                cell,
            })
            .await?;
            Ok(Flow::Continue)
        }
        Command::Chat(text) => {
            let room = current_room(session, registry).await?;
            room.chat(session.id(), text).await?;
            Ok(Flow::Continue)
        }
        Command::Help => {
            session.send(HELP_TEXT);
            Ok(Flow::Continue)
        }
        Command::Quit => {
            // Leave failures must not keep the connection open; the
            // client asked to go.
            if let Some(name) = session.room().map(str::to_string) {
                if let Some(room) = registry.get(&name).await {
                    if let Err(err) = room.submit(Action::Leave(session.player())).await {
                        tracing::debug!(session = %session.id(), error = %err, "leave on quit failed");
                    }
                }
                session.set_room(None);
            }
            Ok(Flow::Quit)
        }
    }
}

/// Moves the session into `name`, leaving its current room first.
///
/// Rejoining the current room is an error. If leaving the old room
/// fails the session stays where it was; if joining the new room fails
/// after a successful leave the session ends up roomless.
async fn join_room(
    session: &mut Session,
    name: String,
    registry: &RoomRegistry,
) -> Result<(), ServerError> {
    if session.room() == Some(name.as_str()) {
        return Err(RoomError::AlreadyJoined.into());
    }

    if let Some(old) = session.room().map(str::to_string) {
        if let Some(room) = registry.get(&old).await {
            room.submit(Action::Leave(session.player())).await?;
        }
        session.set_room(None);
    }

    let room = registry.get_or_create(&name).await;
    room.submit(Action::Join(session.player())).await?;
    session.set_room(Some(name));
    Ok(())
}

/// The room the session currently sits in, or [`ServerError::NoRoom`].
async fn current_room(
    session: &Session,
    registry: &RoomRegistry,
) -> Result<RoomHandle, ServerError> {
    let name = session.room().ok_or(ServerError::NoRoom)?;
    registry.get(name).await.ok_or(ServerError::NoRoom)
}
