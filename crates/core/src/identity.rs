//! Contract of the durable store for the active conversation handle.

use anyhow::Result;
use async_trait::async_trait;

/// A durable single-value store, synchronized once at wake-up.
///
/// The stored value is the raw text of the conversation-handle file; the
/// orchestrator owns trimming and parsing it, so a store never silently
/// substitutes a default for unparseable content.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Reads the stored value, creating it with an initial default if it
    /// does not exist yet.
    async fn load_or_init(&self) -> Result<String>;
}
