use async_trait::async_trait;

/// Port for the operator checkpoint before destructive steps.
#[async_trait]
pub trait OperatorPrompt: Send + Sync {
    /// Show `message` and wait until the operator answers
    async fn pause(&self, message: &str) -> std::io::Result<()>;
}

/// Prompt that never blocks, for unattended runs and tests
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPause;

#[async_trait]
impl OperatorPrompt for NoPause {
    async fn pause(&self, _message: &str) -> std::io::Result<()> {
        Ok(())
    }
}
