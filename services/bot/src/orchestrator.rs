//! The orchestration core: lifecycle, event dispatch, command table and
//! mode-dependent output rendering.
//!
//! One `Orchestrator` wires a chat channel adapter to a decision engine. It
//! owns the wake/sleep lifecycle and the single conversation handle, drains
//! the three inbound event streams plus the engine's outbound message
//! stream, and renders every outgoing message as either text or synthesized
//! voice depending on the engine's mode flag at render time.

use anyhow::Result;
use futures::{StreamExt, future::BoxFuture, stream::FuturesUnordered};
use std::ops::ControlFlow;
use std::sync::{Arc, Mutex, OnceLock};
use switchboard_core::{
    channel::{ChatChannel, InboundStreams},
    engine::{DecisionEngine, OutboundMessages},
    identity::IdentityStore,
    message::OutgoingMessage,
    speech::SpeechModel,
};
use tracing::info;

/// Lifecycle states of the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Constructed, event streams wired, but no identity loaded yet.
    Uninitialized,
    Awake,
    Asleep,
}

/// The closed set of command tokens, plus the unknown fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ping,
    History,
    SystemMessage,
    Reset,
    Shutdown,
    Unknown,
}

impl Command {
    fn parse(token: &str) -> Self {
        match token {
            "ping" => Self::Ping,
            "history" => Self::History,
            "systemMessage" => Self::SystemMessage,
            "reset" => Self::Reset,
            "shutdown" => Self::Shutdown,
            _ => Self::Unknown,
        }
    }
}

/// The central dispatcher of the conversational agent.
pub struct Orchestrator {
    channel: Arc<dyn ChatChannel>,
    engine: Arc<dyn DecisionEngine>,
    speech: Arc<dyn SpeechModel>,
    identity: Arc<dyn IdentityStore>,
    conversation: OnceLock<i64>,
    lifecycle: Mutex<Lifecycle>,
}

impl Orchestrator {
    pub fn new(
        channel: Arc<dyn ChatChannel>,
        engine: Arc<dyn DecisionEngine>,
        speech: Arc<dyn SpeechModel>,
        identity: Arc<dyn IdentityStore>,
    ) -> Self {
        Self {
            channel,
            engine,
            speech,
            identity,
            conversation: OnceLock::new(),
            lifecycle: Mutex::new(Lifecycle::Uninitialized),
        }
    }

    /// The active conversation handle, once resolved by [`wake_up`].
    ///
    /// [`wake_up`]: Orchestrator::wake_up
    pub fn conversation(&self) -> Option<i64> {
        self.conversation.get().copied()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        *self.lifecycle.lock().expect("lifecycle lock poisoned")
    }

    fn set_lifecycle(&self, state: Lifecycle) {
        *self.lifecycle.lock().expect("lifecycle lock poisoned") = state;
    }

    /// Transitions to `Awake`: resolves the conversation handle and loads
    /// the engine, concurrently, then announces `"(awake)"` on the channel.
    ///
    /// If either sub-operation fails the wake-up is aborted, no announcement
    /// is sent and the process must not be considered ready. Repeated calls
    /// are not guarded; they re-run both loads, but the first resolved
    /// handle wins.
    pub async fn wake_up(&self) -> Result<()> {
        info!("waking up");
        tokio::try_join!(self.set_up_conversation(), self.engine.load())?;
        self.set_lifecycle(Lifecycle::Awake);
        info!("awake");
        self.channel.send_text("(awake)".into()).await?;
        Ok(())
    }

    /// Transitions to `Asleep`: announces `"(sleeping)"` and returns. The
    /// channel connection is left running; only the `shutdown` command stops
    /// the adapter.
    pub async fn sleep(&self) -> Result<()> {
        self.channel.send_text("(sleeping)".into()).await?;
        self.set_lifecycle(Lifecycle::Asleep);
        info!("went to sleep");
        Ok(())
    }

    /// Drains inbound channel events and engine output until the `shutdown`
    /// command arrives or every stream closes.
    ///
    /// Event intake is single-threaded and dispatches in arrival order
    /// within each stream, but handlers with awaited work (command replies,
    /// voice transcription, rendering) are interleaved with intake rather
    /// than queued behind one another, so a slow send on one stream never
    /// stalls delivery on the others. Handler failures propagate out of
    /// this call; there is no per-event guard. The one exception is the
    /// fire-and-forget forward of user text to the engine, whose outcome is
    /// discarded by design.
    pub async fn run(
        &self,
        mut inbound: InboundStreams,
        mut outbound: OutboundMessages,
    ) -> Result<()> {
        let mut handlers: FuturesUnordered<BoxFuture<'_, Result<ControlFlow<()>>>> =
            FuturesUnordered::new();
        loop {
            tokio::select! {
                Some(token) = inbound.commands.recv() => {
                    info!(%token, "user issued command");
                    handlers.push(Box::pin(self.handle_command(token)));
                }
                Some(text) = inbound.texts.recv() => self.on_user_message(text),
                Some(audio) = inbound.voices.recv() => {
                    handlers.push(Box::pin(async move {
                        // The text is needed before forwarding, so
                        // transcription is awaited; the forward itself stays
                        // detached.
                        let text = self.speech.voice_to_text(audio).await?;
                        self.on_user_message(text);
                        Ok(ControlFlow::Continue(()))
                    }));
                }
                Some(message) = outbound.recv() => {
                    handlers.push(Box::pin(async move {
                        self.message_user(message).await?;
                        Ok(ControlFlow::Continue(()))
                    }));
                }
                Some(finished) = handlers.next() => {
                    if finished?.is_break() {
                        break;
                    }
                }
                else => break,
            }
        }
        Ok(())
    }

    /// Resolves the conversation handle from the identity store and injects
    /// it into the channel adapter.
    ///
    /// The first resolved handle wins: a repeated wake-up that reads a
    /// different stored value neither replaces the handle nor re-injects
    /// the adapter slot.
    async fn set_up_conversation(&self) -> Result<()> {
        let raw = self.identity.load_or_init().await?;
        let handle = crate::identity::parse_handle(&raw)?;
        info!(handle, "communicating with the last conversation");
        if self.conversation.set(handle).is_ok() {
            self.channel.set_active_handle(handle);
        }
        Ok(())
    }

    /// Forwards one normalized user message to the engine, fire-and-forget:
    /// the dispatcher neither blocks on the engine's handling nor observes
    /// its outcome.
    fn on_user_message(&self, text: String) {
        info!(%text, "user message");
        let engine = Arc::clone(&self.engine);
        tokio::spawn(async move {
            let _ = engine.accept_message(text).await;
        });
    }

    async fn handle_command(&self, token: String) -> Result<ControlFlow<()>> {
        match Command::parse(&token) {
            Command::Ping => self.channel.send_text("Pong!".into()).await?,
            Command::History => {
                self.channel
                    .send_text(self.engine.history_string().into())
                    .await?;
            }
            Command::SystemMessage => {
                self.channel
                    .send_text(self.engine.system_message().into())
                    .await?;
            }
            Command::Reset => self.engine.reset().await?,
            Command::Shutdown => {
                self.sleep().await?;
                self.channel.stop().await?;
                return Ok(ControlFlow::Break(()));
            }
            Command::Unknown => self.channel.send_text("(unknown command)".into()).await?,
        }
        Ok(ControlFlow::Continue(()))
    }

    /// Renders one outgoing message through exactly one output path, chosen
    /// by the engine's mode flag at render time.
    async fn message_user(&self, message: OutgoingMessage) -> Result<()> {
        if !self.engine.voice_preferred() {
            match &message {
                OutgoingMessage::Plain(text) => info!(reply = %text, "sending text reply"),
                OutgoingMessage::Chunked(chunked) => {
                    // Observability only: resolves once the engine finishes
                    // the message, without holding up the send below.
                    let full_text = chunked.full_text();
                    tokio::spawn(async move {
                        let reply = full_text.await;
                        info!(%reply, "sending chunked text reply");
                    });
                }
            }
            return self.channel.send_text(message).await;
        }

        let merged = message.join().await;
        let audio = self.speech.text_to_voice(&merged).await?;
        self.channel.send_voice(audio).await
    }
}
