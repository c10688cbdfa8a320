use tokio::net::TcpStream;

use crate::{command::Request, event::Event};

use super::common::{frame_stream, BoxedStream, FrameWriter};

/// [EventStream] is a stream of [Event]s sent by the bridge, replies included
pub type EventStream = BoxedStream<anyhow::Result<Event>>;

/// [RequestWriter] sends [Request]s to the bridge
pub type RequestWriter = FrameWriter<Request>;

/// Splits the bot's connection to the bridge into a stream of events and a request writer.
pub fn split_tcp_stream(stream: TcpStream) -> (EventStream, RequestWriter) {
    let (reader, writer) = stream.into_split();

    (frame_stream(reader, "bridge"), RequestWriter::new(writer))
}
