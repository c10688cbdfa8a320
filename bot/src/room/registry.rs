use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use comms::model::ChannelId;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use super::voice_room::Room;

/// Held while a check-then-mutate sequence runs for one channel
pub type ChannelGuard = OwnedMutexGuard<()>;

/// [RoomRegistry] keeps track of the rooms that currently exist, keyed by their voice channel.
///
/// Map operations are synchronous and never touch the platform. Callers that read a room,
/// talk to the platform and write the room back hold the channel's [ChannelGuard] for
/// the whole sequence, so two events for the same channel cannot interleave.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: Mutex<HashMap<ChannelId, Room>>,
    locks: Mutex<HashMap<ChannelId, Arc<AsyncMutex<()>>>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        RoomRegistry::default()
    }

    /// Insert or replace the room stored under `channel`
    pub fn put(&self, channel: ChannelId, room: Room) {
        debug_assert_eq!(channel, room.channel());

        self.rooms().insert(channel, room);
    }

    pub fn get(&self, channel: ChannelId) -> Option<Room> {
        self.rooms().get(&channel).cloned()
    }

    pub fn remove(&self, channel: ChannelId) -> Option<Room> {
        self.rooms().remove(&channel)
    }

    pub fn has(&self, channel: ChannelId) -> bool {
        self.rooms().contains_key(&channel)
    }

    pub fn len(&self) -> usize {
        self.rooms().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms().is_empty()
    }

    /// Wait for exclusive access to `channel`.
    ///
    /// Locks of untracked channels that nobody holds or waits on are dropped on the way.
    pub async fn lock(&self, channel: ChannelId) -> ChannelGuard {
        let lock = {
            let rooms = self.rooms();
            let mut locks = self.locks();

            locks.retain(|id, lock| Arc::strong_count(lock) > 1 || rooms.contains_key(id));

            locks
                .entry(channel)
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };

        lock.lock_owned().await
    }

    fn rooms(&self) -> MutexGuard<'_, HashMap<ChannelId, Room>> {
        self.rooms.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn locks(&self) -> MutexGuard<'_, HashMap<ChannelId, Arc<AsyncMutex<()>>>> {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
