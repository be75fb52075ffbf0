//! The port that delivers resolved prompt text to its destination

use crate::error::Result;
use async_trait::async_trait;

/// Receives the final text of an injection
///
/// Implementations return
/// [`LibraryError::InjectionTargetNotFound`](crate::LibraryError::InjectionTargetNotFound)
/// when there is no destination to write to.
#[async_trait]
pub trait TextInjector: Send + Sync {
    async fn inject(&self, text: &str) -> Result<()>;
}
