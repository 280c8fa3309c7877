//! Contract of the chat channel adapter.
//!
//! The adapter owns its transport and connection handling. Towards the
//! orchestrator it exposes two halves: three independent inbound event
//! streams (commands, text, voice), and the outbound send primitives of
//! [`ChatChannel`]. The streams are wired once at construction and stay
//! subscribed for the process lifetime; there is no unsubscribe path.

use crate::message::OutgoingMessage;
use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::mpsc;

/// Outbound side of the channel adapter.
#[async_trait]
pub trait ChatChannel: Send + Sync {
    /// Sets the conversation handle all sends are addressed to. Written once
    /// at wake-up, before any send is attempted.
    fn set_active_handle(&self, handle: i64);

    /// Sends a text reply. Chunked messages are passed through as-is; any
    /// chunk-aware delivery is the adapter's responsibility.
    async fn send_text(&self, message: OutgoingMessage) -> Result<()>;

    /// Sends a synthesized voice reply.
    async fn send_voice(&self, audio: Bytes) -> Result<()>;

    /// Stops the adapter. After this no further inbound events are expected.
    async fn stop(&self) -> Result<()>;
}

/// Producer half of the inbound wiring, held by the channel adapter.
#[derive(Clone)]
pub struct InboundSender {
    commands: mpsc::Sender<String>,
    texts: mpsc::Sender<String>,
    voices: mpsc::Sender<Bytes>,
}

impl InboundSender {
    /// Delivers one command token.
    pub async fn command(&self, token: impl Into<String>) -> Result<()> {
        self.commands
            .send(token.into())
            .await
            .map_err(|_| anyhow::anyhow!("command stream closed"))
    }

    /// Delivers one user text message.
    pub async fn text(&self, text: impl Into<String>) -> Result<()> {
        self.texts
            .send(text.into())
            .await
            .map_err(|_| anyhow::anyhow!("text stream closed"))
    }

    /// Delivers one user voice message.
    pub async fn voice(&self, audio: Bytes) -> Result<()> {
        self.voices
            .send(audio)
            .await
            .map_err(|_| anyhow::anyhow!("voice stream closed"))
    }
}

/// Consumer half of the inbound wiring, drained by the orchestrator.
pub struct InboundStreams {
    pub commands: mpsc::Receiver<String>,
    pub texts: mpsc::Receiver<String>,
    pub voices: mpsc::Receiver<Bytes>,
}

/// Creates the three inbound event streams connecting a channel adapter to
/// the orchestrator.
pub fn inbound(capacity: usize) -> (InboundSender, InboundStreams) {
    let (commands_tx, commands) = mpsc::channel(capacity);
    let (texts_tx, texts) = mpsc::channel(capacity);
    let (voices_tx, voices) = mpsc::channel(capacity);
    (
        InboundSender {
            commands: commands_tx,
            texts: texts_tx,
            voices: voices_tx,
        },
        InboundStreams {
            commands,
            texts,
            voices,
        },
    )
}
