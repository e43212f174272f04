//! Command grammar for Gridline.
//!
//! This crate defines the "language" clients speak at the server: plain
//! newline-terminated text lines, one command per line. It knows nothing
//! about sockets or rooms; it only turns a trimmed line into a [`Command`]
//! (or a [`ProtocolError`] for a recognizably malformed one) and provides
//! the identity newtype the rest of the stack routes by.
//!
//! ```text
//! Transport (lines) → Protocol (Command) → Server (routing) → Room (actions)
//! ```

mod command;
mod error;
mod types;

pub use command::{Command, HELP_TEXT};
pub use error::ProtocolError;
pub use types::SessionId;
