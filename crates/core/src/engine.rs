//! Contract of the decision engine ("behavior core").
//!
//! The engine is an external collaborator: it receives accepted user text,
//! asynchronously emits zero or more [`OutgoingMessage`]s on the outbound
//! stream handed to the orchestrator at wiring time, and exposes a few
//! read-only introspection values. Its internal reasoning is not part of
//! this system.

use crate::message::OutgoingMessage;
use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// The stream on which the engine emits its outgoing messages, drained by
/// the orchestrator's dispatch loop.
pub type OutboundMessages = mpsc::Receiver<OutgoingMessage>;

/// Defines the contract for the stateful responder behind the orchestrator.
#[async_trait]
pub trait DecisionEngine: Send + Sync {
    /// Hands one normalized user message to the engine.
    ///
    /// The orchestrator invokes this fire-and-forget: completion and failure
    /// are the engine's concern, never observed by the dispatcher.
    async fn accept_message(&self, text: String) -> Result<()>;

    /// Loads the engine's state. Invoked once per wake-up, concurrently with
    /// identity resolution.
    async fn load(&self) -> Result<()>;

    /// Resets the engine's conversational state.
    async fn reset(&self) -> Result<()>;

    /// Whether outgoing messages should be rendered as synthesized voice
    /// rather than text. Read at render time, never written by the
    /// orchestrator.
    fn voice_preferred(&self) -> bool;

    /// Human-readable rendition of the conversation history.
    fn history_string(&self) -> String;

    /// The engine's current system message.
    fn system_message(&self) -> String;
}
