//! Intent-collection task for the planning pipeline.
//!
//! Resolves dates, budget, and interests. Fields the request already
//! carries are kept as-is; only missing ones are inferred from the
//! free-text description.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use graph_flow::{Context, NextAction, Task, TaskResult};
use serde::Deserialize;

use super::{PlanningStage, PlanningState, NODE_COUNT, STATE_KEY};
use crate::json::parse_structured;
use crate::models::CompletionExecutor;

/// Canonical message recorded when the request cannot be understood.
pub const INTENT_PARSE_ERROR: &str = "Failed to parse user request";

/// System prompt for the intent-extraction call.
const COLLECT_INFO_SYSTEM_PROMPT: &str = r#"You are a travel planning assistant analyzing user requests.

Extract structured information from the user's travel request.

Extract:
- start_date and end_date in YYYY-MM-DD format
- budget as a plain integer (no currency symbols or separators)
- interests as a list of short activity or theme tags

Output JSON in this exact format:
```json
{
  "start_date": "2025-01-15",
  "end_date": "2025-01-17",
  "budget": 500000,
  "interests": ["history", "street food"]
}
```

Use null for any field the request does not mention."#;

/// What the extraction call returns. Every field is optional: the model
/// answers null for anything the request left unsaid.
#[derive(Debug, Deserialize)]
struct IntentExtraction {
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default)]
    end_date: Option<String>,
    #[serde(default)]
    budget: Option<u64>,
    #[serde(default)]
    interests: Option<Vec<String>>,
}

/// Resolves trip details, inferring only what the request left out.
pub struct CollectInfoTask {
    executor: Arc<dyn CompletionExecutor>,
}

impl CollectInfoTask {
    pub fn new(executor: Arc<dyn CompletionExecutor>) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl Task for CollectInfoTask {
    fn id(&self) -> &str {
        "collect_info"
    }

    async fn run(&self, context: Context) -> graph_flow::Result<TaskResult> {
        let start_time = Instant::now();
        self.executor.emit_node_started("collect_info", 0, NODE_COUNT);

        let mut state: PlanningState = context.get(STATE_KEY).await.unwrap_or_default();
        state.stage = PlanningStage::CollectingInfo;

        let missing_dates = state.start_date.is_empty() || state.end_date.is_empty();
        let missing_budget = state.budget == 0;
        let missing_interests = state.interests.is_empty();

        if !missing_dates && !missing_budget && !missing_interests {
            context.set(STATE_KEY, state).await;
            let output = "Trip details already provided".to_string();
            self.executor.emit_node_completed(
                "collect_info",
                Some(&output),
                start_time.elapsed().as_millis() as u64,
            );
            return Ok(TaskResult::new(Some(output), NextAction::ContinueAndExecute));
        }

        let user_prompt = format!("User request: {}", state.request.description);

        let extraction = match self
            .executor
            .complete(COLLECT_INFO_SYSTEM_PROMPT, &user_prompt, 0.0)
            .await
        {
            Ok(response) => parse_structured::<IntentExtraction>(&response),
            Err(e) => {
                tracing::warn!("Intent extraction call failed: {}", e);
                None
            }
        };

        let Some(extraction) = extraction else {
            // Malformed intent is terminal; it is not retried automatically.
            state.errors.push(INTENT_PARSE_ERROR.to_string());
            context.set(STATE_KEY, state).await;
            let output = "Could not understand the trip request".to_string();
            self.executor.emit_node_completed(
                "collect_info",
                Some(&output),
                start_time.elapsed().as_millis() as u64,
            );
            return Ok(TaskResult::new(
                Some(output),
                NextAction::GoTo("finalize".to_string()),
            ));
        };

        if state.start_date.is_empty() {
            if let Some(start_date) = extraction.start_date {
                state.start_date = start_date;
            }
        }
        if state.end_date.is_empty() {
            if let Some(end_date) = extraction.end_date {
                state.end_date = end_date;
            }
        }
        if state.budget == 0 {
            if let Some(budget) = extraction.budget {
                state.budget = budget;
            }
        }
        if state.interests.is_empty() {
            if let Some(interests) = extraction.interests {
                state.interests = interests;
            }
        }

        tracing::debug!(
            "Resolved trip: {} to {}, budget {}, {} interest(s)",
            state.start_date,
            state.end_date,
            state.budget,
            state.interests.len()
        );

        context.set(STATE_KEY, state).await;

        let output = "Trip details resolved".to_string();
        self.executor.emit_node_completed(
            "collect_info",
            Some(&output),
            start_time.elapsed().as_millis() as u64,
        );

        Ok(TaskResult::new(Some(output), NextAction::ContinueAndExecute))
    }
}
