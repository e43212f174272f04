//! Room actor and game state for Gridline.
//!
//! Each room runs as an isolated Tokio task (actor model) that owns a
//! tic-tac-toe board and up to two member players. All interaction goes
//! through the room's bounded action queue; the actor drains it one
//! request at a time, so room state never needs a lock.
//!
//! # Key types
//!
//! - [`Board`] — the 3x3 grid, win scan, and text rendering
//! - [`Player`] — the room's handle to a member session
//! - [`Action`] — one queued request against room state
//! - [`RoomHandle`] — submit actions to a running room actor
//! - [`spawn`] — start a room actor task

mod board;
mod error;
mod player;
mod room;

pub use board::{Board, Mark};
pub use error::RoomError;
pub use player::{LineSender, Player};
pub use room::{spawn, Action, RoomHandle, ACTION_QUEUE_CAPACITY};
