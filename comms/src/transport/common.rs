use std::{marker::PhantomData, pin::Pin};

use anyhow::Context;
use serde::{de::DeserializeOwned, Serialize};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::tcp::{OwnedReadHalf, OwnedWriteHalf},
};
use tokio_stream::{wrappers::LinesStream, Stream, StreamExt};

/// Line terminator for every JSON frame, in both directions
const NEW_LINE: &[u8; 2] = b"\r\n";

pub type BoxedStream<Item> = Pin<Box<dyn Stream<Item = Item> + Send>>;

/// Decode every line read from `reader` as one JSON frame.
/// `peer` names the other side of the connection in errors.
///
/// # Cancel Safety
///
/// The returned stream is cancel-safe, meaning that it can be used in [tokio::select!]
/// without the risk of missing frames.
pub(crate) fn frame_stream<T>(
    reader: OwnedReadHalf,
    peer: &'static str,
) -> BoxedStream<anyhow::Result<T>>
where
    T: DeserializeOwned + Send + 'static,
{
    Box::pin(
        LinesStream::new(BufReader::new(reader).lines()).map(move |line| {
            let line = line.with_context(|| format!("could not read line from the {}", peer))?;

            serde_json::from_str::<T>(&line)
                .with_context(|| format!("failed to deserialize frame from the {}", peer))
        }),
    )
}

/// [FrameWriter] writes values of `T` as JSON lines to the backing TCP stream
pub struct FrameWriter<T> {
    writer: OwnedWriteHalf,
    frame: PhantomData<fn(&T)>,
}

impl<T: Serialize> FrameWriter<T> {
    pub fn new(writer: OwnedWriteHalf) -> Self {
        Self {
            writer,
            frame: PhantomData,
        }
    }

    /// Send a single frame
    ///
    /// # Cancel Safety
    ///
    /// This method is not cancellation safe. If it is used as the event
    /// in a [tokio::select!] statement and some other
    /// branch completes first, then the frame may have been
    /// partially written, leaving the peer with a corrupt line.
    pub async fn write(&mut self, frame: &T) -> anyhow::Result<()> {
        let mut serialized_bytes = serde_json::to_vec(frame)?;
        serialized_bytes.extend_from_slice(NEW_LINE);

        self.writer.write_all(serialized_bytes.as_slice()).await?;

        Ok(())
    }
}
