//! Switchboard Bot Service
//!
//! The orchestration layer of the Switchboard conversational agent. This
//! crate wires a chat channel adapter to a decision engine: inbound channel
//! events (commands, text, voice) are normalized and forwarded to the
//! engine, and the engine's outgoing messages are rendered back to the
//! channel as text or synthesized voice.
//!
//! All transports are external: deployments provide implementations of the
//! collaborator traits in `switchboard-core` and drive the
//! [`orchestrator::Orchestrator`] directly, which is why this crate ships no
//! binary of its own.

pub mod config;
pub mod identity;
pub mod orchestrator;
