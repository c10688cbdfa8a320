use comms::model::{ChannelId, MessageId, UserId};

#[derive(Debug, Clone, PartialEq, Eq)]
/// [Room] is the bot's record of a temporary voice channel it created.
///
/// Members are deliberately not stored here, they are read from the platform
/// whenever the panel is rendered.
pub struct Room {
    /// The voice channel backing the room, also the registry key
    channel: ChannelId,
    /// The member whose join created the room. Never reassigned.
    leader: UserId,
    /// The control panel message in the announcement channel, once published
    panel_message: Option<MessageId>,
}

impl Room {
    pub fn new(channel: ChannelId, leader: UserId) -> Self {
        Room {
            channel,
            leader,
            panel_message: None,
        }
    }

    pub fn channel(&self) -> ChannelId {
        self.channel
    }

    pub fn leader(&self) -> UserId {
        self.leader
    }

    pub fn is_leader(&self, user: UserId) -> bool {
        self.leader == user
    }

    pub fn panel_message(&self) -> Option<MessageId> {
        self.panel_message
    }

    pub(crate) fn set_panel_message(&mut self, message: Option<MessageId>) {
        self.panel_message = message;
    }
}
