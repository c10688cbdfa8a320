use std::sync::Arc;

use comms::model::{
    Button, ButtonStyle, ChannelId, Component, MessageContent, MessageId, VoiceChannel,
};
use thiserror::Error;

use crate::{
    action::ControlAction,
    platform::{tolerate_missing, Platform, PlatformError},
    room::Room,
};

pub const PANEL_TITLE: &str = "Control panel";
pub const LEADER_MARKER: &str = "👑";
pub const MEMBER_MARKER: &str = "👤";

#[derive(Debug, Error)]
pub enum PanelError {
    #[error("announcement channel {0} not found")]
    AnnouncementChannelMissing(ChannelId),
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

/// [PanelRenderer] owns the control panel messages in the announcement channel.
///
/// A room has at most one panel message. Publishing edits it in place and only posts a
/// new one when there is none yet, or when the old one was deleted behind our back.
pub struct PanelRenderer {
    platform: Arc<dyn Platform>,
    announcement_channel: ChannelId,
}

impl PanelRenderer {
    pub fn new(platform: Arc<dyn Platform>, announcement_channel: ChannelId) -> Self {
        PanelRenderer {
            platform,
            announcement_channel,
        }
    }

    /// Build the panel for `room` from a live snapshot of its voice channel
    pub fn render(room: &Room, channel: &VoiceChannel) -> MessageContent {
        debug_assert!(!channel.members.is_empty(), "empty rooms are not rendered");

        let members = channel
            .members
            .iter()
            .map(|member| {
                let marker = if room.is_leader(member.id) {
                    LEADER_MARKER
                } else {
                    MEMBER_MARKER
                };

                format!("{} {}", marker, member.mention())
            })
            .collect::<Vec<_>>()
            .join("\n");

        MessageContent::embed(
            PANEL_TITLE,
            format!("Channel: {}\n\nMembers:\n{}", channel.name, members),
        )
        .with_component(Component::Button(Button {
            custom_id: ControlAction::Rename(room.channel()).custom_id(),
            label: String::from("Rename"),
            emoji: Some(String::from("📝")),
            style: ButtonStyle::Primary,
        }))
        .with_component(Component::Button(Button {
            custom_id: ControlAction::Kick(room.channel()).custom_id(),
            label: String::from("Kick"),
            emoji: Some(String::from("✖️")),
            style: ButtonStyle::Danger,
        }))
    }

    /// Make the room's panel show `content`, reusing the existing message when it still exists.
    /// The room's panel message id is updated whenever a new message had to be posted.
    pub async fn publish(
        &self,
        room: &mut Room,
        content: &MessageContent,
    ) -> Result<MessageId, PanelError> {
        let channel = self.announcement_channel;

        if let Some(message) = room.panel_message() {
            let edited = match self.platform.fetch_message(channel, message).await {
                Ok(()) => self.platform.edit_message(channel, message, content).await,
                Err(e) => Err(e),
            };

            match edited {
                Ok(()) => {
                    tracing::debug!(room = %room.channel(), %message, "panel updated");
                    return Ok(message);
                }
                Err(PlatformError::NotFound) => {
                    tracing::warn!(room = %room.channel(), %message, "panel message is gone, posting a new one");
                }
                Err(e) => return Err(e.into()),
            }
        }

        let message = self
            .platform
            .send_message(channel, content)
            .await
            .map_err(|e| match e {
                PlatformError::NotFound => PanelError::AnnouncementChannelMissing(channel),
                e => PanelError::Platform(e),
            })?;
        room.set_panel_message(Some(message));
        tracing::info!(room = %room.channel(), %message, "panel posted");

        Ok(message)
    }

    /// Delete the room's panel message, if any. A message that is already gone counts as deleted.
    pub async fn retire(&self, room: &mut Room) -> Result<(), PanelError> {
        let Some(message) = room.panel_message() else {
            return Ok(());
        };
        let channel = self.announcement_channel;

        let deleted = match self.platform.fetch_message(channel, message).await {
            Ok(()) => self.platform.delete_message(channel, message).await,
            Err(e) => Err(e),
        };
        if deleted.as_ref().is_err_and(PlatformError::is_not_found) {
            tracing::warn!(room = %room.channel(), %message, "panel message was already deleted");
        }
        tolerate_missing(deleted)?;

        room.set_panel_message(None);
        tracing::info!(room = %room.channel(), %message, "panel removed");

        Ok(())
    }

    /// Render and publish the panel, unless the channel is empty and the room about to go away
    pub async fn refresh(
        &self,
        room: &mut Room,
        channel: &VoiceChannel,
    ) -> Result<Option<MessageId>, PanelError> {
        if channel.members.is_empty() {
            tracing::debug!(room = %room.channel(), "no members, skipping panel update");
            return Ok(None);
        }

        let content = PanelRenderer::render(room, channel);
        self.publish(room, &content).await.map(Some)
    }
}
