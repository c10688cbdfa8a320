use serde::{Deserialize, Serialize};

use crate::model::{ChannelId, InteractionId, MessageContent, MessageId, UserId};

/// A platform operation the bot asks the bridge to perform.
/// Each operation is answered by exactly one [crate::event::ReplyEvent].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum Operation {
    /// Answered with `exists`
    CategoryExists {
        #[serde(rename = "c")]
        category: ChannelId,
    },
    /// Answered with `channel`
    CreateVoiceChannel {
        #[serde(rename = "c")]
        category: ChannelId,
        #[serde(rename = "n")]
        name: String,
    },
    RenameChannel {
        #[serde(rename = "c")]
        channel: ChannelId,
        #[serde(rename = "n")]
        name: String,
    },
    DeleteChannel {
        #[serde(rename = "c")]
        channel: ChannelId,
    },
    /// Answered with `voice_channel`, carrying the live member list
    VoiceChannel {
        #[serde(rename = "c")]
        channel: ChannelId,
    },
    /// Moving to `None` disconnects the member from voice
    MoveMember {
        #[serde(rename = "u")]
        member: UserId,
        #[serde(rename = "c")]
        channel: Option<ChannelId>,
    },
    /// Answered with `message`
    SendMessage {
        #[serde(rename = "c")]
        channel: ChannelId,
        content: MessageContent,
    },
    EditMessage {
        #[serde(rename = "c")]
        channel: ChannelId,
        #[serde(rename = "m")]
        message: MessageId,
        content: MessageContent,
    },
    DeleteMessage {
        #[serde(rename = "c")]
        channel: ChannelId,
        #[serde(rename = "m")]
        message: MessageId,
    },
    FetchMessage {
        #[serde(rename = "c")]
        channel: ChannelId,
        #[serde(rename = "m")]
        message: MessageId,
    },
    /// Initial ephemeral response to an interaction
    Respond {
        #[serde(rename = "i")]
        interaction: InteractionId,
        content: MessageContent,
    },
    /// Initial response that edits the message the component is attached to
    UpdateMessage {
        #[serde(rename = "i")]
        interaction: InteractionId,
        content: MessageContent,
    },
    DeleteResponse {
        #[serde(rename = "i")]
        interaction: InteractionId,
    },
    /// Ephemeral follow-up to an already answered interaction, answered with `message`
    SendFollowup {
        #[serde(rename = "i")]
        interaction: InteractionId,
        content: MessageContent,
    },
    DeleteFollowup {
        #[serde(rename = "i")]
        interaction: InteractionId,
        #[serde(rename = "m")]
        message: MessageId,
    },
}

/// Envelope written by the bot. The `id` correlates the request with its reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub id: u64,
    pub op: Operation,
}
