use std::time::Duration;

use clap::Parser;
use comms::model::ChannelId;

use crate::{control::ControlPolicy, lifecycle::RoomsConfig};

/// Static configuration, fixed for the lifetime of the process
#[derive(Debug, Clone, Parser)]
#[command(name = "voice-rooms", about = "Temporary voice rooms with a live control panel")]
pub struct Config {
    /// Address of the platform bridge
    #[arg(long, env = "VOICE_ROOMS_BRIDGE_ADDR", default_value = "127.0.0.1:8080")]
    pub bridge_addr: String,

    /// Voice channel that creates a room for whoever joins it
    #[arg(long, env = "VOICE_ROOMS_SOURCE_CHANNEL")]
    pub source_channel: ChannelId,

    /// Category the room channels are created in
    #[arg(long, env = "VOICE_ROOMS_VOICE_CATEGORY")]
    pub voice_category: ChannelId,

    /// Text channel the control panels are posted to
    #[arg(long, env = "VOICE_ROOMS_ANNOUNCEMENT_CHANNEL")]
    pub announcement_channel: ChannelId,

    /// Prefix of text commands
    #[arg(long, env = "VOICE_ROOMS_COMMAND_PREFIX", default_value = "!")]
    pub command_prefix: String,

    /// Seconds the rename prompt waits for the new name
    #[arg(long, env = "VOICE_ROOMS_RENAME_TIMEOUT", default_value_t = 60)]
    pub rename_timeout_secs: u64,

    /// Seconds transient notices stay visible
    #[arg(long, env = "VOICE_ROOMS_NOTICE_TTL", default_value_t = 5)]
    pub notice_ttl_secs: u64,

    /// Seconds to wait for the bridge to answer a request
    #[arg(long, env = "VOICE_ROOMS_REQUEST_TIMEOUT", default_value_t = 10)]
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn rooms(&self) -> RoomsConfig {
        RoomsConfig {
            source_channel: self.source_channel,
            voice_category: self.voice_category,
        }
    }

    pub fn control_policy(&self) -> ControlPolicy {
        ControlPolicy {
            rename_timeout: Duration::from_secs(self.rename_timeout_secs),
            notice_ttl: Duration::from_secs(self.notice_ttl_secs),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
