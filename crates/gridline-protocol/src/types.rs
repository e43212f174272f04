//! Identity types shared across the Gridline stack.

use std::fmt;

/// A unique identifier for one connected client.
///
/// A newtype over `u64` so a session id can't be confused with a cell
/// index or any other number floating through the server. Ids are handed
/// out from a process-wide counter on accept and are never reused within
/// one server run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S-{}", self.0)
    }
}
