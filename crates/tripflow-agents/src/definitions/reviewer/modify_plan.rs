//! Plan-modification task for the review pipeline.
//!
//! Asks for a complete replacement itinerary. A failed modification keeps
//! the original plan; it must never corrupt or blank out a valid one.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use graph_flow::{Context, NextAction, Task, TaskResult};

use tripflow_core::Itinerary;

use super::{ReviewStage, ReviewState, STATE_KEY};
use crate::json::parse_structured;
use crate::models::CompletionExecutor;

/// System prompt for the plan-modification call.
const MODIFY_PLAN_SYSTEM_PROMPT: &str = r#"You are a travel plan modification expert. Modify the plan per the user's feedback.

Guidelines:
1. Use the provided candidate data: when candidates are listed, SELECT from them rather than inventing new venues.
2. Preserve structure: keep every section the feedback does not target exactly as it is.
3. Maintain constraints: respect the original budget and day count.
4. Consistency: the modified section must flow naturally with the rest of the plan.
5. Complete response: return the COMPLETE modified plan with all fields filled in, not a fragment.

Output the complete plan as JSON with the same structure and fields as the original:
title, total_days, total_cost, days (each with day, date, theme, activities, daily_cost),
lodging, summary."#;

/// Produces the replacement itinerary for a modify-classified feedback.
pub struct ModifyPlanTask {
    executor: Arc<dyn CompletionExecutor>,
}

impl ModifyPlanTask {
    pub fn new(executor: Arc<dyn CompletionExecutor>) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl Task for ModifyPlanTask {
    fn id(&self) -> &str {
        "modify_plan"
    }

    async fn run(&self, context: Context) -> graph_flow::Result<TaskResult> {
        let start_time = Instant::now();

        let mut state: ReviewState = context.get(STATE_KEY).await.unwrap_or_default();
        state.stage = ReviewStage::Modifying;

        let user_prompt = format!(
            "Original plan: {}\n\n\
             User feedback: {}\n\
             Modification type: {}\n\
             Target section: {}\n\n\
             Candidate venues (prefer these): {}",
            serde_json::to_string(&state.original).unwrap_or_else(|_| "{}".to_string()),
            state.feedback,
            state
                .kind
                .map(|kind| format!("{:?}", kind).to_lowercase())
                .unwrap_or_else(|| "general".to_string()),
            state.target_section.as_deref().unwrap_or("unspecified"),
            serde_json::to_string(&state.candidates).unwrap_or_else(|_| "[]".to_string()),
        );

        let modified = match self
            .executor
            .complete(MODIFY_PLAN_SYSTEM_PROMPT, &user_prompt, 0.3)
            .await
        {
            Ok(response) => parse_structured::<Itinerary>(&response),
            Err(e) => {
                tracing::warn!("Modification call failed: {}", e);
                None
            }
        };

        match modified {
            Some(itinerary) => {
                state.modified = Some(itinerary);
            }
            None => {
                // Keep the plan the user already has.
                tracing::warn!("Plan modification unparseable; keeping the original itinerary");
                state.modified = Some(state.original.clone());
            }
        }

        context.set(STATE_KEY, state).await;

        let output = format!(
            "Modification produced in {} ms",
            start_time.elapsed().as_millis()
        );
        Ok(TaskResult::new(Some(output), NextAction::ContinueAndExecute))
    }
}
