use async_trait::async_trait;
use comms::model::{ChannelId, InteractionId, MessageContent, MessageId, UserId, VoiceChannel};
use thiserror::Error;

pub use self::bridge::BridgePlatform;

mod bridge;

#[derive(Debug, Error)]
pub enum PlatformError {
    /// The addressed channel, message, member or interaction does not exist (anymore)
    #[error("not found on the platform")]
    NotFound,
    #[error("platform rejected the request: {0}")]
    Rejected(String),
    #[error("no reply from the bridge within {0:?}")]
    TimedOut(std::time::Duration),
    #[error("bridge connection is closed")]
    Disconnected,
    #[error("unexpected reply to {operation}: {outcome}")]
    UnexpectedReply {
        operation: &'static str,
        outcome: String,
    },
    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

impl PlatformError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, PlatformError::NotFound)
    }
}

pub type PlatformResult<T> = Result<T, PlatformError>;

/// Treats "already gone" as success for operations whose goal is removal
pub fn tolerate_missing(result: PlatformResult<()>) -> PlatformResult<()> {
    match result {
        Err(PlatformError::NotFound) => Ok(()),
        other => other,
    }
}

/// Everything the bot needs from the chat platform.
///
/// Implementations report a missing target as [PlatformError::NotFound] so callers
/// can tell expected absence apart from failures.
#[async_trait]
pub trait Platform: Send + Sync {
    async fn category_exists(&self, category: ChannelId) -> PlatformResult<bool>;

    async fn create_voice_channel(
        &self,
        category: ChannelId,
        name: &str,
    ) -> PlatformResult<ChannelId>;

    async fn rename_channel(&self, channel: ChannelId, name: &str) -> PlatformResult<()>;

    async fn delete_channel(&self, channel: ChannelId) -> PlatformResult<()>;

    /// Live name and members of a voice channel
    async fn voice_channel(&self, channel: ChannelId) -> PlatformResult<VoiceChannel>;

    /// Moves a member to another voice channel, or disconnects them when `channel` is `None`
    async fn move_member(&self, member: UserId, channel: Option<ChannelId>) -> PlatformResult<()>;

    async fn send_message(
        &self,
        channel: ChannelId,
        content: &MessageContent,
    ) -> PlatformResult<MessageId>;

    async fn edit_message(
        &self,
        channel: ChannelId,
        message: MessageId,
        content: &MessageContent,
    ) -> PlatformResult<()>;

    async fn delete_message(&self, channel: ChannelId, message: MessageId) -> PlatformResult<()>;

    async fn fetch_message(&self, channel: ChannelId, message: MessageId) -> PlatformResult<()>;

    /// Private initial response to an interaction, visible to the invoker only
    async fn respond(
        &self,
        interaction: InteractionId,
        content: &MessageContent,
    ) -> PlatformResult<()>;

    /// Initial response that replaces the message the component belongs to
    async fn update_message(
        &self,
        interaction: InteractionId,
        content: &MessageContent,
    ) -> PlatformResult<()>;

    async fn delete_response(&self, interaction: InteractionId) -> PlatformResult<()>;

    /// Private follow-up after the interaction has been answered
    async fn send_followup(
        &self,
        interaction: InteractionId,
        content: &MessageContent,
    ) -> PlatformResult<MessageId>;

    async fn delete_followup(
        &self,
        interaction: InteractionId,
        message: MessageId,
    ) -> PlatformResult<()>;
}
