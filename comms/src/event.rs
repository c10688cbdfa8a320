use serde::{Deserialize, Serialize};

use crate::model::{ChannelId, InteractionId, Member, MessageId, UserId, VoiceChannel};

/// The bridge is connected to the platform and events will start flowing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadyEvent {
    /// Display name of the bot account
    #[serde(rename = "n")]
    pub user: String,
}

/// A member's voice location changed. `None` means not connected to voice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceStateUpdateEvent {
    pub member: Member,
    pub before: Option<ChannelId>,
    pub after: Option<ChannelId>,
}

/// A user clicked a button or picked a select option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentInteractionEvent {
    #[serde(rename = "i")]
    pub id: InteractionId,
    /// The text channel the component's message lives in
    #[serde(rename = "c")]
    pub channel: ChannelId,
    #[serde(rename = "u")]
    pub user: UserId,
    pub custom_id: String,
    /// Selected option values, empty for buttons
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

/// A message was posted in a text channel the bot can see
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageCreateEvent {
    #[serde(rename = "m")]
    pub id: MessageId,
    #[serde(rename = "c")]
    pub channel: ChannelId,
    #[serde(rename = "u")]
    pub author: UserId,
    pub content: String,
}

/// Result of a [crate::command::Operation]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "o", rename_all = "snake_case")]
pub enum Outcome {
    Done,
    Channel {
        #[serde(rename = "c")]
        channel: ChannelId,
    },
    Message {
        #[serde(rename = "m")]
        message: MessageId,
    },
    VoiceChannel(VoiceChannel),
    Exists {
        exists: bool,
    },
    /// The addressed channel, message, member or interaction does not exist
    NotFound,
    /// The platform refused or failed the operation
    Failed {
        reason: String,
    },
}

/// Reply to the request with the same id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyEvent {
    #[serde(rename = "id")]
    pub request: u64,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
/// Events that the bridge delivers to the bot.
/// Gateway events arrive unsolicited, replies answer earlier requests.
pub enum Event {
    Ready(ReadyEvent),
    VoiceStateUpdate(VoiceStateUpdateEvent),
    ComponentInteraction(ComponentInteractionEvent),
    MessageCreate(MessageCreateEvent),
    Reply(ReplyEvent),
}

#[cfg(test)]
mod tests {
    use super::*;

    // given an event enum, and an expect string, asserts that event is serialized / deserialized appropiately
    fn assert_event_serialization(event: &Event, expected: &str) {
        let serialized = serde_json::to_string(&event).unwrap();
        assert_eq!(serialized, expected);
        let deserialized: Event = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, *event);
    }

    #[test]
    fn test_voice_state_update_from_nowhere() {
        let event = Event::VoiceStateUpdate(VoiceStateUpdateEvent {
            member: Member::new(UserId(1), "alice"),
            before: None,
            after: Some(ChannelId(100)),
        });

        assert_event_serialization(
            &event,
            r#"{"t":"voice_state_update","member":{"u":1,"n":"alice"},"before":null,"after":100}"#,
        );
    }

    #[test]
    fn test_button_interaction_has_no_values() {
        let event = Event::ComponentInteraction(ComponentInteractionEvent {
            id: InteractionId(77),
            channel: ChannelId(300),
            user: UserId(1),
            custom_id: "rename:200".into(),
            values: Vec::new(),
        });

        assert_event_serialization(
            &event,
            r#"{"t":"component_interaction","i":77,"c":300,"u":1,"custom_id":"rename:200"}"#,
        );
    }

    #[test]
    fn test_reply_with_voice_channel_snapshot() {
        let event = Event::Reply(ReplyEvent {
            request: 4,
            outcome: Outcome::VoiceChannel(VoiceChannel {
                id: ChannelId(200),
                name: "alice".into(),
                members: vec![Member::new(UserId(1), "alice")],
            }),
        });

        assert_event_serialization(
            &event,
            r#"{"t":"reply","id":4,"outcome":{"o":"voice_channel","c":200,"n":"alice","m":[{"u":1,"n":"alice"}]}}"#,
        );
    }

    #[test]
    fn test_reply_not_found() {
        let deserialized: Event =
            serde_json::from_str(r#"{"t":"reply","id":8,"outcome":{"o":"not_found"}}"#).unwrap();

        assert_eq!(
            deserialized,
            Event::Reply(ReplyEvent {
                request: 8,
                outcome: Outcome::NotFound,
            })
        );
    }
}
