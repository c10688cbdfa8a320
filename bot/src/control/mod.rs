use std::{sync::Arc, time::Duration};

use anyhow::Context;
use comms::{
    event::ComponentInteractionEvent,
    model::{ChannelId, Component, Member, MessageContent, Select, SelectOption, UserId},
};

use crate::{
    action::ControlAction,
    panel::PanelRenderer,
    platform::{tolerate_missing, Platform, PlatformError},
    room::{Room, RoomRegistry},
    waiters::MessageWaiters,
};

use self::notice::*;

mod notice;

const MAX_CHANNEL_NAME_CHARS: usize = 100;

/// Timing of the interactive flows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlPolicy {
    /// How long the rename prompt waits for the leader's answer
    pub rename_timeout: Duration,
    /// How long transient notices stay visible
    pub notice_ttl: Duration,
}

impl Default for ControlPolicy {
    fn default() -> Self {
        ControlPolicy {
            rename_timeout: Duration::from_secs(60),
            notice_ttl: Duration::from_secs(5),
        }
    }
}

/// [ControlSurface] handles clicks on panel buttons and the kick selector.
///
/// Only the room leader may rename or kick. Everyone else gets a transient notice and
/// the room is left untouched.
pub struct ControlSurface {
    platform: Arc<dyn Platform>,
    registry: Arc<RoomRegistry>,
    panels: Arc<PanelRenderer>,
    waiters: Arc<MessageWaiters>,
    policy: ControlPolicy,
    notices: Notices,
}

impl ControlSurface {
    pub fn new(
        platform: Arc<dyn Platform>,
        registry: Arc<RoomRegistry>,
        panels: Arc<PanelRenderer>,
        waiters: Arc<MessageWaiters>,
        policy: ControlPolicy,
    ) -> Self {
        ControlSurface {
            notices: Notices::new(platform.clone(), policy.notice_ttl),
            platform,
            registry,
            panels,
            waiters,
            policy,
        }
    }

    /// Handle a component interaction, resolving the room it names from current state
    pub async fn handle_interaction(
        &self,
        interaction: &ComponentInteractionEvent,
    ) -> anyhow::Result<()> {
        let action = match interaction.custom_id.parse::<ControlAction>() {
            Ok(action) => action,
            Err(e) => {
                tracing::debug!(error = %e, "ignoring foreign component");
                return Ok(());
            }
        };

        let Some(room) = self.registry.get(action.room()) else {
            tracing::debug!(room = %action.room(), "interaction on a panel of a removed room");
            self.notices.respond(interaction.id, ROOM_GONE).await?;
            return Ok(());
        };

        if !room.is_leader(interaction.user) {
            tracing::debug!(room = %room.channel(), user = %interaction.user, ?action, "not the room leader");
            self.notices.respond(interaction.id, NOT_AUTHORIZED).await?;
            return Ok(());
        }

        match action {
            ControlAction::Rename(_) => self.rename(interaction, &room).await,
            ControlAction::Kick(_) => self.offer_kick(interaction, &room).await,
            ControlAction::KickSelect(_) => self.kick_selected(interaction, &room).await,
        }
    }

    async fn rename(
        &self,
        interaction: &ComponentInteractionEvent,
        room: &Room,
    ) -> anyhow::Result<()> {
        let channel = room.channel();
        self.platform
            .respond(interaction.id, &MessageContent::text(RENAME_PROMPT))
            .await
            .context("could not prompt for the new channel name")?;

        let answer = self
            .waiters
            .next_message(interaction.user, interaction.channel, self.policy.rename_timeout)
            .await;

        let Some(answer) = answer else {
            tracing::info!(room = %channel, "rename prompt timed out");
            self.dismiss_prompt(interaction).await;
            self.notices.followup(interaction.id, RENAME_TIMED_OUT).await?;
            return Ok(());
        };

        // the answer was only meant for us
        if let Err(e) = tolerate_missing(
            self.platform
                .delete_message(answer.channel, answer.id)
                .await,
        ) {
            tracing::warn!(room = %channel, error = %e, "could not delete the rename answer");
        }

        let name = answer.content.trim();
        let notice = if !is_valid_channel_name(name) {
            RENAME_INVALID.to_string()
        } else {
            match self.apply_rename(channel, name).await {
                Ok(true) => {
                    tracing::info!(room = %channel, name, "room renamed");
                    format!("Channel renamed to {}", name)
                }
                Ok(false) => ROOM_GONE.to_string(),
                Err(e) => {
                    tracing::error!(room = %channel, error = %format!("{:#}", e), "could not rename room");
                    RENAME_FAILED.to_string()
                }
            }
        };

        self.dismiss_prompt(interaction).await;
        self.notices.followup(interaction.id, &notice).await?;

        Ok(())
    }

    /// Rename the channel and re-render its panel once. Returns false if the room is gone.
    async fn apply_rename(&self, channel: ChannelId, name: &str) -> anyhow::Result<bool> {
        let _guard = self.registry.lock(channel).await;
        let Some(mut room) = self.registry.get(channel) else {
            return Ok(false);
        };

        self.platform
            .rename_channel(channel, name)
            .await
            .context("could not rename the voice channel")?;
        let snapshot = self
            .platform
            .voice_channel(channel)
            .await
            .context("could not read the renamed channel")?;
        // the rename already happened, a stale panel is caught up by the next voice update
        if let Err(e) = self.panels.refresh(&mut room, &snapshot).await {
            tracing::warn!(room = %channel, error = %e, "could not refresh the panel after a rename");
        }
        self.registry.put(channel, room);

        Ok(true)
    }

    async fn dismiss_prompt(&self, interaction: &ComponentInteractionEvent) {
        if let Err(e) = tolerate_missing(self.platform.delete_response(interaction.id).await) {
            tracing::warn!(error = %e, "could not remove the prompt");
        }
    }

    async fn offer_kick(
        &self,
        interaction: &ComponentInteractionEvent,
        room: &Room,
    ) -> anyhow::Result<()> {
        let snapshot = match self.platform.voice_channel(room.channel()).await {
            Ok(snapshot) => snapshot,
            Err(PlatformError::NotFound) => {
                tracing::debug!(room = %room.channel(), "kick offered on a room whose channel is gone");
                self.notices.respond(interaction.id, ROOM_GONE).await?;
                return Ok(());
            }
            Err(e) => {
                return Err(anyhow::Error::new(e).context("could not read the room's members"))
            }
        };

        match kick_selector(room, &snapshot.members) {
            Some(selector) => {
                self.platform
                    .respond(interaction.id, &selector)
                    .await
                    .context("could not show the kick selector")?;
            }
            None => self.notices.respond(interaction.id, NOTHING_TO_KICK).await?,
        }

        Ok(())
    }

    async fn kick_selected(
        &self,
        interaction: &ComponentInteractionEvent,
        room: &Room,
    ) -> anyhow::Result<()> {
        let channel = room.channel();
        let target = interaction
            .values
            .first()
            .and_then(|value| value.parse::<UserId>().ok());

        let kicked = match target {
            Some(target) => self.disconnect(channel, target).await,
            None => Ok(None),
        };

        match kicked {
            Ok(Some((kicked, remaining))) => {
                tracing::info!(room = %channel, member = %kicked.id, "member kicked");
                let selector = kick_selector(room, &remaining)
                    .unwrap_or_else(|| MessageContent::text(NOTHING_TO_KICK));
                self.platform
                    .update_message(interaction.id, &selector)
                    .await
                    .context("could not refresh the kick selector")?;
                self.notices
                    .followup(
                        interaction.id,
                        &format!("{} was kicked from the channel.", kicked.display_name),
                    )
                    .await?;
            }
            Ok(None) => self.notices.respond(interaction.id, MEMBER_NOT_FOUND).await?,
            Err(e) => {
                tracing::error!(room = %channel, error = %format!("{:#}", e), "could not kick member");
                self.notices.respond(interaction.id, KICK_FAILED).await?;
            }
        }

        Ok(())
    }

    /// Disconnect `target` from the room's channel and refresh the panel without them.
    /// Returns the kicked member and the members left, or `None` if they are not in the room.
    async fn disconnect(
        &self,
        channel: ChannelId,
        target: UserId,
    ) -> anyhow::Result<Option<(Member, Vec<Member>)>> {
        let _guard = self.registry.lock(channel).await;
        let Some(mut room) = self.registry.get(channel) else {
            return Ok(None);
        };
        if room.is_leader(target) {
            return Ok(None);
        }

        let mut snapshot = self
            .platform
            .voice_channel(channel)
            .await
            .context("could not read the room's members")?;
        let Some(position) = snapshot.members.iter().position(|m| m.id == target) else {
            return Ok(None);
        };

        match self.platform.move_member(target, None).await {
            Ok(()) => {}
            Err(PlatformError::NotFound) => return Ok(None),
            Err(e) => return Err(anyhow::Error::new(e).context("could not disconnect the member")),
        }
        let kicked = snapshot.members.remove(position);

        // the voice state update for the kick refreshes the panel again later
        if let Err(e) = self.panels.refresh(&mut room, &snapshot).await {
            tracing::warn!(room = %channel, error = %e, "could not refresh the panel after a kick");
        }
        self.registry.put(channel, room);

        Ok(Some((kicked, snapshot.members)))
    }
}

/// Selector over everyone in the channel except the leader, `None` if that is nobody
fn kick_selector(room: &Room, members: &[Member]) -> Option<MessageContent> {
    let options = members
        .iter()
        .filter(|member| !room.is_leader(member.id))
        .map(|member| SelectOption {
            label: member.display_name.clone(),
            value: member.id.to_string(),
        })
        .collect::<Vec<_>>();

    if options.is_empty() {
        return None;
    }

    Some(
        MessageContent::text(KICK_PROMPT).with_component(Component::Select(Select {
            custom_id: ControlAction::KickSelect(room.channel()).custom_id(),
            placeholder: String::from(KICK_PLACEHOLDER),
            options,
        })),
    )
}

fn is_valid_channel_name(name: &str) -> bool {
    !name.is_empty() && name.chars().count() <= MAX_CHANNEL_NAME_CHARS
}
