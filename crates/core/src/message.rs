//! Outgoing-message types shared by the decision engine and the chat channel.
//!
//! The engine emits either a complete string or a "chunked" message: an
//! ordered sequence of text fragments that may still be arriving, plus a
//! derived full-text future that resolves once the producer is done. The
//! renderer switches on the tag; a chunk-aware channel adapter may deliver
//! the fragments incrementally, while voice synthesis always waits for the
//! full text.

use anyhow::{Result, anyhow};
use futures::{
    FutureExt,
    future::{BoxFuture, Shared},
};
use tokio::sync::{mpsc, oneshot};

/// A message produced by the decision engine, consumed exactly once by the
/// rendering step.
pub enum OutgoingMessage {
    /// A complete reply, available all at once.
    Plain(String),
    /// An incrementally-arriving reply.
    Chunked(ChunkedMessage),
}

impl OutgoingMessage {
    /// Materializes the message into a single string, waiting for the full
    /// text in the chunked case.
    pub async fn join(self) -> String {
        match self {
            Self::Plain(text) => text,
            Self::Chunked(chunked) => chunked.join().await,
        }
    }
}

impl From<String> for OutgoingMessage {
    fn from(text: String) -> Self {
        Self::Plain(text)
    }
}

impl From<&str> for OutgoingMessage {
    fn from(text: &str) -> Self {
        Self::Plain(text.to_owned())
    }
}

impl From<ChunkedMessage> for OutgoingMessage {
    fn from(chunked: ChunkedMessage) -> Self {
        Self::Chunked(chunked)
    }
}

/// Future resolving to a chunked message's full text. Cloneable, so it can
/// be awaited independently of fragment consumption.
pub type FullText = Shared<BoxFuture<'static, String>>;

/// The consumer half of a chunked message: the fragment stream plus the
/// derived full text.
pub struct ChunkedMessage {
    chunks: mpsc::Receiver<String>,
    full_text: FullText,
}

impl ChunkedMessage {
    /// Creates a chunked message and its producer half.
    ///
    /// The producer pushes fragments through the returned [`ChunkWriter`];
    /// dropping the writer resolves the full-text future with the
    /// concatenation of everything pushed so far.
    pub fn channel(capacity: usize) -> (ChunkWriter, ChunkedMessage) {
        let (chunk_tx, chunks) = mpsc::channel(capacity);
        let (full_tx, full_rx) = oneshot::channel::<String>();
        // If the writer is dropped without resolving (cannot happen through
        // the public API), the full text degrades to an empty string rather
        // than an error.
        let full_text = full_rx.map(|text| text.unwrap_or_default()).boxed().shared();
        let writer = ChunkWriter {
            chunks: chunk_tx,
            full_text: Some(full_tx),
            joined: String::new(),
        };
        (writer, ChunkedMessage { chunks, full_text })
    }

    /// Receives the next fragment, or `None` once the producer is done and
    /// all fragments have been consumed.
    pub async fn next_chunk(&mut self) -> Option<String> {
        self.chunks.recv().await
    }

    /// Returns a future resolving to the full message text. Independent of
    /// fragment consumption, so it can be awaited from a detached task
    /// (e.g. for logging) without draining the stream.
    pub fn full_text(&self) -> FullText {
        self.full_text.clone()
    }

    /// Waits for the producer to finish and returns the joined text.
    pub async fn join(self) -> String {
        self.full_text.await
    }
}

/// The producer half of a [`ChunkedMessage`].
pub struct ChunkWriter {
    chunks: mpsc::Sender<String>,
    full_text: Option<oneshot::Sender<String>>,
    joined: String,
}

impl ChunkWriter {
    /// Appends one fragment to the message.
    ///
    /// Fails if the consumer dropped the message without draining it.
    pub async fn push(&mut self, fragment: impl Into<String>) -> Result<()> {
        let fragment = fragment.into();
        self.joined.push_str(&fragment);
        self.chunks
            .send(fragment)
            .await
            .map_err(|_| anyhow!("chunked message was dropped by its consumer"))
    }
}

impl Drop for ChunkWriter {
    fn drop(&mut self) {
        if let Some(full_text) = self.full_text.take() {
            let _ = full_text.send(std::mem::take(&mut self.joined));
        }
    }
}
