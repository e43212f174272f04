//! Room registry: name-to-handle mapping with atomic get-or-create.

use std::collections::HashMap;

use gridline_room::{spawn, RoomHandle};
use tokio::sync::Mutex;

/// All rooms known to the server, keyed by the client-chosen name.
///
/// A room is created the first time someone joins its name and is never
/// evicted: an emptied room stays registered with a clear board, ready
/// for its next players. The mutex guards only map access and is never
/// held across a room operation.
#[derive(Default)]
pub struct RoomRegistry {
    rooms: Mutex<HashMap<String, RoomHandle>>,
}

impl RoomRegistry {
    pub fn new() -> RoomRegistry {
        RoomRegistry::default()
    }

    /// Returns the room registered under `name`, spawning its actor
    /// first if the name is unknown. Callers racing on the same unknown
    /// name all get handles to the single room created by whoever wins
    /// the lock.
    pub async fn get_or_create(&self, name: &str) -> RoomHandle {
        let mut rooms = self.rooms.lock().await;
        rooms
            .entry(name.to_string())
            .or_insert_with(|| {
                tracing::info!(room = %name, "creating room");
                spawn(name)
            })
            .clone()
    }

    /// Returns the room registered under `name`, if any, without
    /// creating it.
    pub async fn get(&self, name: &str) -> Option<RoomHandle> {
        self.rooms.lock().await.get(name).cloned()
    }

    /// Number of registered rooms.
    pub async fn count(&self) -> usize {
        self.rooms.lock().await.len()
    }
}
