use std::{fmt, num::ParseIntError, str::FromStr};

use serde::{Deserialize, Serialize};

macro_rules! snowflake {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse().map($name)
            }
        }
    };
}

snowflake!(
    /// Identifier of any platform channel: voice, text or category
    ChannelId
);
snowflake!(
    /// Identifier of a platform user
    UserId
);
snowflake!(
    /// Identifier of a message posted in a text channel
    MessageId
);
snowflake!(
    /// Identifier of a single component interaction, used to answer it
    InteractionId
);

/// A guild member as seen in voice state updates and channel snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    #[serde(rename = "u")]
    pub id: UserId,
    #[serde(rename = "n")]
    pub display_name: String,
}

impl Member {
    pub fn new(id: UserId, display_name: &str) -> Self {
        Member {
            id,
            display_name: String::from(display_name),
        }
    }

    /// Platform markup that renders as a mention of the member
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }
}

/// Live snapshot of a voice channel: its current name and connected members
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceChannel {
    #[serde(rename = "c")]
    pub id: ChannelId,
    #[serde(rename = "n")]
    pub name: String,
    #[serde(rename = "m", default)]
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonStyle {
    Primary,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub custom_id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    pub style: ButtonStyle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

/// A single-choice dropdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Select {
    pub custom_id: String,
    pub placeholder: String,
    pub options: Vec<SelectOption>,
}

/// Interactive element attached to a message.
/// The `custom_id` is echoed back in the [crate::event::ComponentInteractionEvent] it produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Component {
    Button(Button),
    Select(Select),
}

impl Component {
    pub fn custom_id(&self) -> &str {
        match self {
            Component::Button(button) => &button.custom_id,
            Component::Select(select) => &select.custom_id,
        }
    }
}

/// Body of a message or an interaction response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embed: Option<Embed>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Component>,
}

impl MessageContent {
    pub fn text(text: impl Into<String>) -> Self {
        MessageContent {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn embed(title: &str, description: String) -> Self {
        MessageContent {
            embed: Some(Embed {
                title: String::from(title),
                description,
            }),
            ..Default::default()
        }
    }

    pub fn with_component(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }
}
