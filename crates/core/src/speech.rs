//! Contract of the AI model's speech conversions.

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;

/// The two leaf conversions the orchestrator needs from the AI model:
/// transcription of inbound voice messages and synthesis of outgoing
/// replies. No internal logic is specified here.
#[async_trait]
pub trait SpeechModel: Send + Sync {
    /// Transcribes a voice recording to text.
    async fn voice_to_text(&self, audio: Bytes) -> Result<String>;

    /// Synthesizes speech audio for the given text.
    async fn text_to_voice(&self, text: &str) -> Result<Bytes>;
}
