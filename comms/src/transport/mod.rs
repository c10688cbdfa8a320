/// Transport over TCP implementation for the bot to exchange events and requests with the platform bridge
#[cfg(feature = "client")]
pub mod client;
#[cfg(any(feature = "client", feature = "server"))]
mod common;
/// Transport over TCP implementation for a platform bridge serving a single bot TCP Stream
#[cfg(feature = "server")]
pub mod server;
