use std::{fmt, str::FromStr};

use comms::model::ChannelId;
use thiserror::Error;

const RENAME: &str = "rename";
const KICK: &str = "kick";
const KICK_SELECT: &str = "kick_select";

/// What a panel component does and which room it belongs to.
///
/// Components only carry this as their custom id. The room itself is looked up
/// again when the component is used, so a click on a stale panel never acts on
/// state captured at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    /// Panel button: prompt the leader for a new channel name
    Rename(ChannelId),
    /// Panel button: offer the leader a selector of members to kick
    Kick(ChannelId),
    /// Selector: disconnect the chosen member
    KickSelect(ChannelId),
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognized component id '{0}'")]
pub struct UnknownComponent(String);

impl ControlAction {
    pub fn room(&self) -> ChannelId {
        match *self {
            ControlAction::Rename(channel)
            | ControlAction::Kick(channel)
            | ControlAction::KickSelect(channel) => channel,
        }
    }

    pub fn custom_id(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ControlAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            ControlAction::Rename(_) => RENAME,
            ControlAction::Kick(_) => KICK,
            ControlAction::KickSelect(_) => KICK_SELECT,
        };

        write!(f, "{}:{}", kind, self.room())
    }
}

impl FromStr for ControlAction {
    type Err = UnknownComponent;

    fn from_str(custom_id: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownComponent(String::from(custom_id));
        let (kind, channel) = custom_id.split_once(':').ok_or_else(unknown)?;
        let channel = channel.parse::<ChannelId>().map_err(|_| unknown())?;

        match kind {
            RENAME => Ok(ControlAction::Rename(channel)),
            KICK => Ok(ControlAction::Kick(channel)),
            KICK_SELECT => Ok(ControlAction::KickSelect(channel)),
            _ => Err(unknown()),
        }
    }
}
