/// Identifiers, members and message content shared by events and requests
pub mod model;
/// Requests the bot sends to the platform bridge
pub mod command;
/// Events the platform bridge delivers to the bot, including replies to requests
pub mod event;
/// Implementation of event and request transportation over TCP Streams.
/// Requires 'server' or 'client' features to be enabled and will bring in tokio dependency alongside with other dependencies
pub mod transport;
