//! Switchboard Core
//!
//! Domain types and collaborator contracts for the Switchboard orchestration
//! layer. The orchestrator itself lives in the `switchboard-bot` service
//! crate; this crate defines the shapes it exchanges with its external
//! collaborators:
//!
//! - `channel`: the chat channel adapter (inbound event streams, outbound
//!   send primitives).
//! - `engine`: the decision engine that turns accepted user text into
//!   outgoing messages.
//! - `speech`: the AI model's two leaf conversions (voice-to-text,
//!   text-to-voice).
//! - `identity`: the durable store for the active conversation handle.
//! - `message`: the outgoing-message union (plain or chunked) shared by the
//!   engine and the channel.

pub mod channel;
pub mod engine;
pub mod identity;
pub mod message;
pub mod speech;
