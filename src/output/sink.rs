//! Blocking writer feeding an async response body

use std::io::{self, Write};

use axum::body::Bytes;
use tokio::sync::mpsc;

/// Bytes forwarded per message
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Chunks in flight before the writer blocks
pub const CHANNEL_CAPACITY: usize = 8;

pub type Chunk = Result<Bytes, io::Error>;

/// [`Write`] implementation that forwards fixed-size chunks over a channel
///
/// Only usable from blocking threads: sends block while the channel is full.
/// Once the receiving side is gone every write fails with
/// [`io::ErrorKind::BrokenPipe`].
pub struct ChannelWriter {
    tx: mpsc::Sender<Chunk>,
    buffer: Vec<u8>,
    sent: usize,
    closed: bool,
}

impl ChannelWriter {
    pub fn new(tx: mpsc::Sender<Chunk>) -> Self {
        Self {
            tx,
            buffer: Vec::with_capacity(CHUNK_SIZE),
            sent: 0,
            closed: false,
        }
    }

    /// Whether the receiver has been dropped
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Bytes handed to the receiver so far
    pub fn bytes_sent(&self) -> usize {
        self.sent
    }

    /// Forward whatever is still buffered
    pub fn finish(&mut self) -> io::Result<()> {
        self.flush()
    }

    /// End the stream with an error; nothing is written afterwards
    pub fn fail(mut self, message: String) {
        self.buffer.clear();
        if !self.closed {
            let _ = self
                .tx
                .blocking_send(Err(io::Error::new(io::ErrorKind::Other, message)));
        }
        self.closed = true;
    }

    fn send(&mut self, chunk: Vec<u8>) -> io::Result<()> {
        let len = chunk.len();
        if self.tx.blocking_send(Ok(Bytes::from(chunk))).is_err() {
            self.closed = true;
            return Err(broken_pipe());
        }
        self.sent += len;
        Ok(())
    }
}

impl Write for ChannelWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        if self.closed {
            return Err(broken_pipe());
        }

        self.buffer.extend_from_slice(data);
        while self.buffer.len() >= CHUNK_SIZE {
            let rest = self.buffer.split_off(CHUNK_SIZE);
            let chunk = std::mem::replace(&mut self.buffer, rest);
            self.send(chunk)?;
        }
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.closed {
            return Err(broken_pipe());
        }
        if self.buffer.is_empty() {
            return Ok(());
        }
        let chunk = std::mem::take(&mut self.buffer);
        self.send(chunk)
    }
}

fn broken_pipe() -> io::Error {
    io::Error::new(io::ErrorKind::BrokenPipe, "response body receiver dropped")
}
