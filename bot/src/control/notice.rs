use std::{sync::Arc, time::Duration};

use comms::model::{InteractionId, MessageContent};

use crate::platform::{tolerate_missing, Platform, PlatformResult};

pub(super) const NOT_AUTHORIZED: &str = "Only the room leader can do that.";
pub(super) const ROOM_GONE: &str = "This room no longer exists.";
pub(super) const RENAME_PROMPT: &str = "Enter the new channel name:";
pub(super) const RENAME_TIMED_OUT: &str = "Timed out waiting for the new name.";
pub(super) const RENAME_INVALID: &str = "Channel names must be between 1 and 100 characters.";
pub(super) const RENAME_FAILED: &str = "Could not rename the channel.";
pub(super) const NOTHING_TO_KICK: &str = "There is nobody else in the channel to kick.";
pub(super) const KICK_PROMPT: &str = "Select a member to kick:";
pub(super) const KICK_PLACEHOLDER: &str = "Select a member";
pub(super) const MEMBER_NOT_FOUND: &str = "That member is not in the channel.";
pub(super) const KICK_FAILED: &str = "Could not kick that member.";

/// Transient notices: private to the invoker and removed again after `ttl`.
///
/// The handler stays suspended until the notice is gone, callers must not hold a
/// channel guard while sending one.
pub(super) struct Notices {
    platform: Arc<dyn Platform>,
    ttl: Duration,
}

impl Notices {
    pub fn new(platform: Arc<dyn Platform>, ttl: Duration) -> Self {
        Notices { platform, ttl }
    }

    /// Answer a fresh interaction with a transient notice
    pub async fn respond(&self, interaction: InteractionId, text: &str) -> PlatformResult<()> {
        self.platform
            .respond(interaction, &MessageContent::text(text))
            .await?;
        tokio::time::sleep(self.ttl).await;

        tolerate_missing(self.platform.delete_response(interaction).await)
    }

    /// Follow up on an interaction that was already answered with a transient notice
    pub async fn followup(&self, interaction: InteractionId, text: &str) -> PlatformResult<()> {
        let message = self
            .platform
            .send_followup(interaction, &MessageContent::text(text))
            .await?;
        tokio::time::sleep(self.ttl).await;

        tolerate_missing(self.platform.delete_followup(interaction, message).await)
    }
}
