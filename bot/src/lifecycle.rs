use std::sync::Arc;

use comms::{
    event::VoiceStateUpdateEvent,
    model::{ChannelId, Member},
};
use thiserror::Error;

use crate::{
    panel::{PanelError, PanelRenderer},
    platform::{tolerate_missing, Platform, PlatformError},
    room::{Room, RoomRegistry},
};

#[derive(Debug, Error)]
pub enum RoomError {
    #[error("voice category {0} not found")]
    CategoryNotFound(ChannelId),
    #[error(transparent)]
    Panel(#[from] PanelError),
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

/// A state change performed while handling one voice state update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Created(ChannelId),
    Refreshed(ChannelId),
    Destroyed(ChannelId),
}

/// Where rooms come from and where they are created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomsConfig {
    /// Joining this channel creates a room
    pub source_channel: ChannelId,
    /// Category new room channels are created in
    pub voice_category: ChannelId,
}

/// [LifecycleCoordinator] turns voice state updates into room creation, panel refreshes
/// and room teardown.
pub struct LifecycleCoordinator {
    platform: Arc<dyn Platform>,
    registry: Arc<RoomRegistry>,
    panels: Arc<PanelRenderer>,
    config: RoomsConfig,
}

impl LifecycleCoordinator {
    pub fn new(
        platform: Arc<dyn Platform>,
        registry: Arc<RoomRegistry>,
        panels: Arc<PanelRenderer>,
        config: RoomsConfig,
    ) -> Self {
        LifecycleCoordinator {
            platform,
            registry,
            panels,
            config,
        }
    }

    /// Run every check that applies to the update: creating a room when the member entered
    /// the source channel, then syncing the room they left and the room they joined.
    /// A failing check is logged and does not stop the others.
    pub async fn handle_voice_state(&self, update: &VoiceStateUpdateEvent) -> Vec<Transition> {
        let VoiceStateUpdateEvent {
            member,
            before,
            after,
        } = update;
        let source = Some(self.config.source_channel);
        let mut transitions = Vec::new();

        if *after == source && *before != source {
            match self.create_room(member).await {
                Ok(created) => transitions.extend(created),
                Err(e) => {
                    tracing::error!(member = %member.id, error = %e, "could not create a room")
                }
            }
        }

        let left = before.filter(|channel| *after != Some(*channel));
        let joined = after.filter(|channel| *before != Some(*channel));

        for channel in left.into_iter().chain(joined) {
            match self.sync_room(channel).await {
                Ok(Some(transition)) => transitions.push(transition),
                Ok(None) => {}
                Err(e) => tracing::error!(room = %channel, error = %e, "could not sync room"),
            }
        }

        transitions
    }

    async fn create_room(&self, member: &Member) -> Result<Vec<Transition>, RoomError> {
        let category = self.config.voice_category;
        if !self.platform.category_exists(category).await? {
            return Err(RoomError::CategoryNotFound(category));
        }

        let channel = self
            .platform
            .create_voice_channel(category, &member.display_name)
            .await?;
        tracing::info!(room = %channel, member = %member.id, "voice channel created");

        // the move produces its own voice state update, which must wait for the registration
        let _guard = self.registry.lock(channel).await;

        if let Err(e) = self.platform.move_member(member.id, Some(channel)).await {
            if let Err(cleanup) = tolerate_missing(self.platform.delete_channel(channel).await) {
                tracing::warn!(room = %channel, error = %cleanup, "could not delete the unused channel");
            }
            return Err(e.into());
        }

        self.registry.put(channel, Room::new(channel, member.id));
        tracing::info!(room = %channel, leader = %member.id, "room created");

        let mut transitions = vec![Transition::Created(channel)];
        match self.sync_locked(channel).await {
            Ok(Some(Transition::Destroyed(channel))) => {
                transitions.push(Transition::Destroyed(channel))
            }
            Ok(_) => {}
            Err(e) => tracing::error!(room = %channel, error = %e, "could not publish the first panel"),
        }

        Ok(transitions)
    }

    /// Bring a tracked room in line with its channel. Untracked channels are ignored.
    pub async fn sync_room(&self, channel: ChannelId) -> Result<Option<Transition>, RoomError> {
        let _guard = self.registry.lock(channel).await;

        self.sync_locked(channel).await
    }

    async fn sync_locked(&self, channel: ChannelId) -> Result<Option<Transition>, RoomError> {
        let Some(mut room) = self.registry.get(channel) else {
            return Ok(None);
        };

        let snapshot = match self.platform.voice_channel(channel).await {
            Ok(snapshot) => snapshot,
            Err(PlatformError::NotFound) => {
                tracing::warn!(room = %channel, "voice channel was deleted externally");
                self.destroy(room).await?;
                return Ok(Some(Transition::Destroyed(channel)));
            }
            Err(e) => return Err(e.into()),
        };

        if snapshot.members.is_empty() {
            self.destroy(room).await?;
            return Ok(Some(Transition::Destroyed(channel)));
        }

        self.panels.refresh(&mut room, &snapshot).await?;
        self.registry.put(channel, room);

        Ok(Some(Transition::Refreshed(channel)))
    }

    /// Channel first, panel second, registry last: a failure before the end leaves the room
    /// tracked so the next event for it retries.
    async fn destroy(&self, mut room: Room) -> Result<(), RoomError> {
        let channel = room.channel();

        tolerate_missing(self.platform.delete_channel(channel).await)?;
        self.panels.retire(&mut room).await?;
        self.registry.remove(channel);
        tracing::info!(room = %channel, "room removed");

        Ok(())
    }
}
