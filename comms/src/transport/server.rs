use tokio::net::TcpStream;

use crate::{command::Request, event::Event};

use super::common::{frame_stream, BoxedStream, FrameWriter};

/// [RequestStream] is a stream of [Request]s sent by the bot
pub type RequestStream = BoxedStream<anyhow::Result<Request>>;

/// [EventWriter] sends [Event]s to the bot
pub type EventWriter = FrameWriter<Event>;

/// Splits a bot connection accepted by the bridge into a stream of requests and an event writer.
///
/// # Arguments
///
/// - `stream` - A [TcpStream] accepted from the bot
pub fn split_tcp_stream(stream: TcpStream) -> (RequestStream, EventWriter) {
    let (reader, writer) = stream.into_split();

    (frame_stream(reader, "bot"), EventWriter::new(writer))
}
