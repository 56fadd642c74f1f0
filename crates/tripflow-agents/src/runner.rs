//! Session-based execution of pipeline graphs.
//!
//! `PipelineRunner` wraps graph-flow's `FlowRunner` with session creation
//! and a run-to-completion loop. Each pipeline invocation gets its own
//! runner over in-memory session storage, so no state outlives the call.

use std::sync::Arc;

use anyhow::Result;
use graph_flow::{
    ExecutionStatus, FlowRunner, Graph, InMemorySessionStorage, Session, SessionStorage,
};

/// Hard upper bound on steps per invocation. The pipelines' own retry
/// bounds keep real runs far below this; hitting it means a routing cycle.
const MAX_STEPS: usize = 64;

/// Status of one pipeline step, mirroring graph-flow's execution status.
#[derive(Debug, Clone)]
pub enum PipelineStatus {
    Paused { next_task_id: String },
    WaitingForInput,
    Completed,
    Error(String),
}

/// Result of one pipeline step.
#[derive(Debug, Clone)]
pub struct PipelineStepResult {
    pub output: Option<String>,
    pub status: PipelineStatus,
}

/// Executes a pipeline graph session by session.
pub struct PipelineRunner {
    storage: Arc<dyn SessionStorage + Send + Sync>,
    flow: FlowRunner,
}

impl PipelineRunner {
    pub fn new(graph: Arc<Graph>, storage: Arc<dyn SessionStorage + Send + Sync>) -> Self {
        let flow = FlowRunner::new(graph, storage.clone());
        Self { storage, flow }
    }

    /// Runner over fresh in-memory session storage; the usual choice since
    /// pipeline state is request-scoped.
    pub fn new_in_memory(graph: Arc<Graph>) -> Self {
        Self::new(graph, Arc::new(InMemorySessionStorage::new()))
    }

    /// Create a new session positioned at `start_task_id` and return its id.
    pub async fn start_session(&self, start_task_id: &str) -> Result<String> {
        let session_id = uuid::Uuid::new_v4().to_string();
        let session = Session::new_from_task(session_id.clone(), start_task_id);
        self.storage
            .save(session)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to save session: {}", e))?;
        tracing::debug!("Started pipeline session {}", session_id);
        Ok(session_id)
    }

    /// Fetch a session, e.g. to seed or read its context.
    pub async fn session(&self, session_id: &str) -> Result<Session> {
        self.storage
            .get(session_id)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to get session: {}", e))?
            .ok_or_else(|| anyhow::anyhow!("No session found with id: {}", session_id))
    }

    /// Persist a session after seeding its context.
    pub async fn save_session(&self, session: Session) -> Result<()> {
        self.storage
            .save(session)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to save session: {}", e))
    }

    /// Execute the next step (or chain of auto-continuing steps).
    pub async fn step(&self, session_id: &str) -> Result<PipelineStepResult> {
        let result = self
            .flow
            .run(session_id)
            .await
            .map_err(|e| anyhow::anyhow!("Pipeline step failed: {}", e))?;

        let status = match result.status {
            ExecutionStatus::Paused { next_task_id, .. } => PipelineStatus::Paused { next_task_id },
            ExecutionStatus::WaitingForInput => PipelineStatus::WaitingForInput,
            ExecutionStatus::Completed => PipelineStatus::Completed,
            ExecutionStatus::Error(e) => PipelineStatus::Error(e),
        };

        Ok(PipelineStepResult {
            output: result.response,
            status,
        })
    }

    /// Drive the session until it completes, returning the final output.
    pub async fn run_to_completion(&self, session_id: &str) -> Result<String> {
        let mut last_output = None;

        for _ in 0..MAX_STEPS {
            let step = self.step(session_id).await?;
            if step.output.is_some() {
                last_output = step.output;
            }
            match step.status {
                PipelineStatus::Completed => return Ok(last_output.unwrap_or_default()),
                PipelineStatus::Error(e) => {
                    return Err(anyhow::anyhow!("Pipeline error: {}", e));
                }
                PipelineStatus::Paused { .. } | PipelineStatus::WaitingForInput => {}
            }
        }

        Err(anyhow::anyhow!(
            "Pipeline exceeded {} steps without completing",
            MAX_STEPS
        ))
    }
}
