//! # Gridline
//!
//! A multi-room tic-tac-toe server speaking newline-delimited text over
//! TCP. Clients join named rooms, two members per room play a game, and
//! everything a room does is serialized through its actor's queue.
//!
//! The layers, bottom to top:
//!
//! - [`gridline_protocol`] — the command grammar clients type
//! - [`gridline_room`] — the room actor and game state
//! - this crate — sessions, the room registry, and the accept loop
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use gridline::Server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = Server::bind("0.0.0.0:4000").await?;
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

mod error;
mod registry;
mod server;
mod session;

pub use error::ServerError;
pub use registry::RoomRegistry;
pub use server::Server;
pub use session::Session;
