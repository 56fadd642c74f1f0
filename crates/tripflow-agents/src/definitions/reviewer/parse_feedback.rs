//! Feedback-classification task for the review pipeline.
//!
//! Classifies free-text feedback as approve, reject, or modify. Ambiguous
//! or unparseable feedback defaults to reject: it must never silently
//! mutate the plan.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use graph_flow::{Context, NextAction, Task, TaskResult};
use serde::Deserialize;

use super::{FeedbackCategory, ModificationKind, ReviewStage, ReviewState, STATE_KEY};
use crate::json::parse_structured;
use crate::models::CompletionExecutor;

/// System prompt for the feedback-classification call.
const PARSE_FEEDBACK_SYSTEM_PROMPT: &str = r#"You analyze user feedback on a travel plan and determine what needs to change.

Determine:
1. feedback_type:
   - "approve": the user is satisfied with the plan
   - "reject": the user wants to start over completely
   - "modify": the user wants specific changes
2. target_section (only when modifying): which part to modify, e.g. "day_1", "day_2", "budget", "lodging"
3. modification_type (only when modifying), one of:
   - "dining": different restaurants or meals
   - "attraction": different sights or activities
   - "lodging": different accommodation
   - "budget": budget adjustments
   - "timing": schedule changes
   - "general": anything else
4. reasoning: one short sentence explaining the analysis

Output JSON in this exact format:
```json
{
  "feedback_type": "modify",
  "target_section": "day_2",
  "modification_type": "dining",
  "reasoning": "The user wants a different lunch on day 2."
}
```

Use null for target_section and modification_type unless feedback_type is "modify"."#;

/// What the classification call returns. `feedback_type` is required;
/// anything that fails to provide it is treated as unparseable.
#[derive(Debug, Deserialize)]
struct FeedbackClassification {
    feedback_type: FeedbackCategory,
    #[serde(default)]
    target_section: Option<String>,
    #[serde(default)]
    modification_type: Option<ModificationKind>,
    #[serde(default)]
    reasoning: String,
}

/// Classifies feedback and routes the pipeline accordingly.
pub struct ParseFeedbackTask {
    executor: Arc<dyn CompletionExecutor>,
}

impl ParseFeedbackTask {
    pub fn new(executor: Arc<dyn CompletionExecutor>) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl Task for ParseFeedbackTask {
    fn id(&self) -> &str {
        "parse_feedback"
    }

    async fn run(&self, context: Context) -> graph_flow::Result<TaskResult> {
        let start_time = Instant::now();

        let mut state: ReviewState = context.get(STATE_KEY).await.unwrap_or_default();
        state.stage = ReviewStage::Classifying;

        let user_prompt = format!(
            "Original plan: {}\n\nUser feedback: {}",
            serde_json::to_string(&state.original).unwrap_or_else(|_| "{}".to_string()),
            state.feedback,
        );

        let classification = match self
            .executor
            .complete(PARSE_FEEDBACK_SYSTEM_PROMPT, &user_prompt, 0.0)
            .await
        {
            Ok(response) => parse_structured::<FeedbackClassification>(&response),
            Err(e) => {
                tracing::warn!("Feedback classification call failed: {}", e);
                None
            }
        };

        match classification {
            Some(classification) => {
                tracing::info!(
                    "Feedback classified as {:?} ({})",
                    classification.feedback_type,
                    classification.reasoning
                );
                state.category = Some(classification.feedback_type);
                state.target_section = classification.target_section;
                state.kind = classification.modification_type;
                state.reasoning = classification.reasoning;
            }
            None => {
                // Conservative fallback: force a replan instead of risking
                // an unintended mutation.
                tracing::warn!("Feedback classification unparseable; defaulting to reject");
                state.category = Some(FeedbackCategory::Reject);
            }
        }

        let category = state.category;
        context.set(STATE_KEY, state).await;

        let elapsed = start_time.elapsed().as_millis() as u64;
        tracing::debug!("Feedback parsed in {} ms", elapsed);

        match category {
            Some(FeedbackCategory::Modify) => Ok(TaskResult::new(
                Some("Feedback requests a modification".to_string()),
                NextAction::ContinueAndExecute,
            )),
            _ => Ok(TaskResult::new(
                Some("Feedback resolved without modification".to_string()),
                NextAction::GoTo("finalize".to_string()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::planner::tests_support::{sample_itinerary, MockExecutor};

    async fn run_with_feedback(executor: MockExecutor, feedback: &str) -> (ReviewState, NextAction) {
        let task = ParseFeedbackTask::new(Arc::new(executor));
        let context = Context::new();
        context
            .set(
                STATE_KEY,
                ReviewState {
                    original: sample_itinerary(),
                    feedback: feedback.to_string(),
                    ..Default::default()
                },
            )
            .await;
        let result = task.run(context.clone()).await.unwrap();
        let state: ReviewState = context.get(STATE_KEY).await.unwrap();
        (state, result.next_action)
    }

    #[tokio::test]
    async fn approve_feedback_skips_to_finalize() {
        let executor = MockExecutor::ok(
            r#"{"feedback_type": "approve", "reasoning": "The user is happy."}"#,
        );
        let (state, next) = run_with_feedback(executor, "이 계획 좋아요").await;

        assert_eq!(state.category, Some(FeedbackCategory::Approve));
        assert!(matches!(next, NextAction::GoTo(ref id) if id == "finalize"));
    }

    #[tokio::test]
    async fn modify_feedback_extracts_target_and_kind() {
        let executor = MockExecutor::ok(
            r#"{
                "feedback_type": "modify",
                "target_section": "day_2",
                "modification_type": "dining",
                "reasoning": "The user wants Korean food for lunch on day 2."
            }"#,
        );
        let (state, next) = run_with_feedback(executor, "둘째날 점심을 한식으로 바꿔줘").await;

        assert_eq!(state.category, Some(FeedbackCategory::Modify));
        assert_eq!(state.target_section.as_deref(), Some("day_2"));
        assert_eq!(state.kind, Some(ModificationKind::Dining));
        assert!(matches!(next, NextAction::ContinueAndExecute));
    }

    #[tokio::test]
    async fn unparseable_classification_defaults_to_reject() {
        let executor = MockExecutor::ok("no structure here");
        let (state, next) = run_with_feedback(executor, "").await;

        assert_eq!(state.category, Some(FeedbackCategory::Reject));
        assert!(matches!(next, NextAction::GoTo(ref id) if id == "finalize"));
    }

    #[tokio::test]
    async fn classification_call_failure_defaults_to_reject() {
        let (state, next) = run_with_feedback(MockExecutor::failing(), "hmm").await;

        assert_eq!(state.category, Some(FeedbackCategory::Reject));
        assert!(matches!(next, NextAction::GoTo(ref id) if id == "finalize"));
    }

    #[tokio::test]
    async fn classification_is_idempotent_for_the_same_feedback() {
        let make_executor =
            || MockExecutor::ok(r#"{"feedback_type": "approve", "reasoning": "Satisfied."}"#);

        let (first, _) = run_with_feedback(make_executor(), "이 계획 좋아요").await;
        let (second, _) = run_with_feedback(make_executor(), "이 계획 좋아요").await;

        assert_eq!(first.category, second.category);
        assert_eq!(first.original, second.original);
    }

    #[tokio::test]
    async fn classifier_synonyms_normalize_to_canonical_kinds() {
        let executor = MockExecutor::ok(
            r#"{"feedback_type": "modify", "target_section": "day_1",
                "modification_type": "restaurant", "reasoning": "Different lunch."}"#,
        );
        let (state, _) = run_with_feedback(executor, "change lunch").await;
        assert_eq!(state.kind, Some(ModificationKind::Dining));
    }
}
