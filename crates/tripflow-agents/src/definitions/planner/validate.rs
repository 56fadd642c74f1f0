//! Draft-validation task for the planning pipeline.
//!
//! Runs the critical-only validation rules against the current draft and
//! decides whether to retry generation. An invalid draft is discarded so a
//! broken plan can never leak out of the pipeline.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use graph_flow::{Context, NextAction, Task, TaskResult};

use tripflow_core::validate_itinerary;

use super::{route_after_validation, PlannerRoute, PlanningStage, PlanningState, NODE_COUNT, STATE_KEY};
use crate::config::PlannerConfig;
use crate::models::CompletionExecutor;

/// Validates the draft and routes to retry or finalize.
pub struct ValidateTask {
    executor: Arc<dyn CompletionExecutor>,
    config: PlannerConfig,
}

impl ValidateTask {
    pub fn new(executor: Arc<dyn CompletionExecutor>, config: PlannerConfig) -> Self {
        Self { executor, config }
    }
}

#[async_trait]
impl Task for ValidateTask {
    fn id(&self) -> &str {
        "validate"
    }

    async fn run(&self, context: Context) -> graph_flow::Result<TaskResult> {
        let start_time = Instant::now();
        self.executor.emit_node_started("validate", 3, NODE_COUNT);

        let mut state: PlanningState = context.get(STATE_KEY).await.unwrap_or_default();
        state.stage = PlanningStage::Validating;

        match &state.draft {
            None => {
                state.errors.push("No itinerary draft to validate".to_string());
            }
            Some(draft) => {
                if !self.config.validation_enabled {
                    tracing::debug!("Draft validation disabled; accepting draft as-is");
                    state.errors.clear();
                } else {
                    let result = validate_itinerary(draft, state.budget);
                    if result.is_valid {
                        // The one place the accumulated errors are cleared:
                        // a new valid plan supersedes earlier failures.
                        state.errors.clear();
                    } else {
                        tracing::info!(
                            "Draft rejected with {} critical error(s)",
                            result.errors.len()
                        );
                        state.draft = None;
                        state.errors.extend(result.errors);
                    }
                }
            }
        }

        let route = route_after_validation(
            !state.errors.is_empty(),
            state.attempts,
            self.config.max_attempts,
        );

        context.set(STATE_KEY, state.clone()).await;

        let output = match route {
            PlannerRoute::Retry => format!(
                "Draft invalid, retrying generation (attempt {} of {})",
                state.attempts, self.config.max_attempts
            ),
            PlannerRoute::Finish if state.draft.is_some() => "Draft validated".to_string(),
            PlannerRoute::Finish => "Validation gave up".to_string(),
        };
        self.executor.emit_node_completed(
            "validate",
            Some(&output),
            start_time.elapsed().as_millis() as u64,
        );

        let next = match route {
            PlannerRoute::Retry => NextAction::GoTo("generate_plan".to_string()),
            PlannerRoute::Finish => NextAction::ContinueAndExecute,
        };
        Ok(TaskResult::new(Some(output), next))
    }
}
