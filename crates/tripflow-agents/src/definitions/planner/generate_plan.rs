//! Itinerary-generation task for the planning pipeline.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use graph_flow::{Context, NextAction, Task, TaskResult};

use tripflow_core::{dates, Itinerary};

use super::{PlanningStage, PlanningState, NODE_COUNT, STATE_KEY};
use crate::json::parse_structured;
use crate::models::CompletionExecutor;

/// Canonical message recorded when the model output cannot be parsed.
pub const GENERATION_PARSE_ERROR: &str = "Failed to generate valid plan structure";

/// System prompt for the itinerary-generation call.
const GENERATE_PLAN_SYSTEM_PROMPT: &str = r#"You are an expert travel planner creating detailed day-by-day itineraries.

Requirements:
1. Use ACTUAL calendar dates starting at the trip's start date (never placeholders like "YYYY-MM-DD"); each day advances by exactly one calendar day.
2. Number days from 1 without gaps.
3. Give every activity a start time in HH:MM format and a realistic duration in minutes (30-180).
4. Select venues from the provided candidate lists whenever they fit; invent generic venues only when a list is empty.
5. Respect typical opening hours: attractions and cultural venues roughly 10:00-18:00, dining roughly 11:00-22:00.
6. Include breakfast, lunch, and dinner every day.
7. Select exactly one lodging option covering the whole trip.
8. Estimate a cost for every activity and keep the total within the budget.
9. Write an engaging title and a short summary.

Output JSON in this exact format:
```json
{
  "title": "...",
  "total_days": 3,
  "total_cost": 500000,
  "days": [
    {
      "day": 1,
      "date": "2025-01-15",
      "theme": "...",
      "activities": [
        {
          "time": "10:00",
          "venue_name": "...",
          "venue_kind": "attraction",
          "duration_minutes": 120,
          "estimated_cost": 3000,
          "note": "..."
        }
      ],
      "daily_cost": 50000
    }
  ],
  "lodging": {"name": "...", "cost_per_night": 80000, "nights": 2},
  "summary": "..."
}
```

venue_kind must be one of: attraction, dining, lodging, cafe, shopping."#;

/// Generates an itinerary draft from the resolved trip details and the
/// fetched candidates.
pub struct GeneratePlanTask {
    executor: Arc<dyn CompletionExecutor>,
}

impl GeneratePlanTask {
    pub fn new(executor: Arc<dyn CompletionExecutor>) -> Self {
        Self { executor }
    }

    fn build_user_prompt(state: &PlanningState) -> String {
        let days = dates::trip_length_days(&state.start_date, &state.end_date);
        format!(
            "Create a travel plan.\n\n\
             User request: {}\n\
             Travel period: {} to {} ({} days)\n\
             Budget: {}\n\
             Interests: {}\n\n\
             Attraction candidates: {}\n\
             Dining candidates: {}\n\
             Lodging candidates: {}",
            state.request.description,
            state.start_date,
            state.end_date,
            days,
            state.budget,
            state.interests.join(", "),
            serde_json::to_string(&state.attractions).unwrap_or_else(|_| "[]".to_string()),
            serde_json::to_string(&state.dining).unwrap_or_else(|_| "[]".to_string()),
            serde_json::to_string(&state.lodging).unwrap_or_else(|_| "[]".to_string()),
        )
    }
}

#[async_trait]
impl Task for GeneratePlanTask {
    fn id(&self) -> &str {
        "generate_plan"
    }

    async fn run(&self, context: Context) -> graph_flow::Result<TaskResult> {
        let start_time = Instant::now();
        self.executor.emit_node_started("generate_plan", 2, NODE_COUNT);

        let mut state: PlanningState = context.get(STATE_KEY).await.unwrap_or_default();
        state.stage = PlanningStage::Generating;

        // The attempt is consumed up front; a failed parse still counts.
        state.attempts += 1;
        tracing::debug!("Generating itinerary, attempt {}", state.attempts);

        let user_prompt = Self::build_user_prompt(&state);

        match self
            .executor
            .complete(GENERATE_PLAN_SYSTEM_PROMPT, &user_prompt, 0.5)
            .await
        {
            Ok(response) => match parse_structured::<Itinerary>(&response) {
                Some(itinerary) => {
                    state.draft = Some(itinerary);
                }
                None => {
                    state.errors.push(GENERATION_PARSE_ERROR.to_string());
                }
            },
            Err(e) => {
                state
                    .errors
                    .push(format!("{}: {}", GENERATION_PARSE_ERROR, e));
            }
        }

        context.set(STATE_KEY, state.clone()).await;

        let output = match &state.draft {
            Some(itinerary) => format!(
                "Generated draft \"{}\" on attempt {}",
                itinerary.title, state.attempts
            ),
            None => format!("Generation attempt {} failed", state.attempts),
        };
        self.executor.emit_node_completed(
            "generate_plan",
            Some(&output),
            start_time.elapsed().as_millis() as u64,
        );

        Ok(TaskResult::new(Some(output), NextAction::ContinueAndExecute))
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests_support::{MockExecutor, DRAFT_JSON};
    use super::*;

    #[tokio::test]
    async fn successful_generation_sets_the_draft() {
        let task = GeneratePlanTask::new(Arc::new(MockExecutor::ok(DRAFT_JSON)));
        let context = Context::new();
        context.set(STATE_KEY, PlanningState::default()).await;

        let result = task.run(context.clone()).await.unwrap();
        assert!(matches!(result.next_action, NextAction::ContinueAndExecute));

        let state: PlanningState = context.get(STATE_KEY).await.unwrap();
        assert_eq!(state.attempts, 1);
        let draft = state.draft.unwrap();
        assert_eq!(draft.total_days, 3);
        assert_eq!(draft.days[0].date, "2025-01-15");
        assert!(state.errors.is_empty());
    }

    #[tokio::test]
    async fn parse_failure_still_consumes_the_attempt() {
        let task = GeneratePlanTask::new(Arc::new(MockExecutor::ok("sorry, no plan today")));
        let context = Context::new();
        context.set(STATE_KEY, PlanningState::default()).await;

        task.run(context.clone()).await.unwrap();

        let state: PlanningState = context.get(STATE_KEY).await.unwrap();
        assert_eq!(state.attempts, 1);
        assert!(state.draft.is_none());
        assert_eq!(state.errors, vec![GENERATION_PARSE_ERROR.to_string()]);
    }

    #[tokio::test]
    async fn attempts_accumulate_across_retries() {
        let task = GeneratePlanTask::new(Arc::new(MockExecutor::failing()));
        let context = Context::new();
        context
            .set(
                STATE_KEY,
                PlanningState {
                    attempts: 2,
                    errors: vec!["earlier failure".to_string()],
                    ..Default::default()
                },
            )
            .await;

        task.run(context.clone()).await.unwrap();

        let state: PlanningState = context.get(STATE_KEY).await.unwrap();
        assert_eq!(state.attempts, 3);
        // The error list only ever grows here.
        assert_eq!(state.errors.len(), 2);
    }

    #[test]
    fn prompt_carries_the_candidates() {
        let state = PlanningState {
            start_date: "2025-01-15".to_string(),
            end_date: "2025-01-17".to_string(),
            budget: 500_000,
            interests: vec!["history".to_string()],
            attractions: vec![super::super::tests_support::candidate("Old Palace")],
            ..Default::default()
        };
        let prompt = GeneratePlanTask::build_user_prompt(&state);
        assert!(prompt.contains("2025-01-15 to 2025-01-17 (3 days)"));
        assert!(prompt.contains("Old Palace"));
        assert!(prompt.contains("500000"));
    }
}
