//! Core abstractions shared by the pipeline tasks.

use async_trait::async_trait;

/// Structured-completion capability consumed by the pipeline tasks.
///
/// Implementations run one completion and hand back the raw text; parsing
/// the text into the expected shape is the caller's job, and a parse
/// failure is a first-class error, never a panic.
///
/// The `emit_*` hooks are observation points for the streaming variant of
/// the planning pipeline. They default to no-ops so non-streaming
/// executors (and test mocks) only implement `complete`.
#[async_trait]
pub trait CompletionExecutor: Send + Sync {
    /// Run a completion against the configured model.
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f64,
    ) -> anyhow::Result<String>;

    /// A pipeline node began executing.
    fn emit_node_started(&self, node: &str, node_index: usize, total_nodes: usize) {
        let _ = (node, node_index, total_nodes);
    }

    /// A pipeline node finished executing.
    fn emit_node_completed(&self, node: &str, output: Option<&str>, duration_ms: u64) {
        let _ = (node, output, duration_ms);
    }
}
