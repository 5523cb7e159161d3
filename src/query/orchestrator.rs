use std::sync::Arc;

use serde::Serialize;
use tracing::{Instrument, Span, debug, info, info_span, warn};
use uuid::Uuid;

use super::{QueryError, select_context};
use crate::llm::{ModelGateway, build_prompt, parse_decisions, parse_profile};
use crate::models::{DecisionRecord, MemberProfile, QueryKind, TranscriptIndex, Week};

pub const WEEK_NOT_FOUND: &str = "Week not found";
pub const SUMMARY_UNAVAILABLE: &str = "Unable to generate summary";
pub const PROGRESS_UNAVAILABLE: &str = "Unable to analyze progress";

/// A request arriving from the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryRequest {
    Profile { week_number: Option<u32> },
    Decisions { week_number: Option<u32> },
    Summary { week_number: Option<u32> },
    Progress,
    Weeks,
}

/// Response shapes of the query surface
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum QueryResponse {
    Profile(MemberProfile),
    Decisions(Vec<DecisionRecord>),
    Summary { summary: String },
    Progress { analysis: String },
    Weeks(Vec<Week>),
}

/// Entry point for analytical queries over one loaded transcript.
///
/// Owns the transcript and its week index for its whole lifetime; every
/// query calls the gateway afresh, nothing is cached. Share it behind an
/// `Arc` for concurrent callers.
pub struct QueryOrchestrator {
    index: TranscriptIndex,
    gateway: Arc<dyn ModelGateway>,
}

impl QueryOrchestrator {
    pub fn new(index: TranscriptIndex, gateway: Arc<dyn ModelGateway>) -> Self {
        info!(
            "Query orchestrator ready: {} weeks, {} messages",
            index.weeks().len(),
            index.total_messages()
        );
        Self { index, gateway }
    }

    /// Segment `transcript` and build an orchestrator over it
    pub fn from_transcript(transcript: impl Into<String>, gateway: Arc<dyn ModelGateway>) -> Self {
        Self::new(TranscriptIndex::new(transcript), gateway)
    }

    pub fn index(&self) -> &TranscriptIndex {
        &self.index
    }

    /// All weeks in transcript order. No model call.
    pub fn get_weeks(&self) -> &[Week] {
        self.index.weeks()
    }

    pub fn get_week(&self, week_number: u32) -> Option<&Week> {
        self.index.get_week(week_number)
    }

    /// Extract the member profile, or the unknown profile on any failure
    pub async fn query_member_profile(&self, week_number: Option<u32>) -> MemberProfile {
        let kind = QueryKind::Profile;
        async {
            let Some(raw) = self.complete(kind, self.context(week_number), None).await else {
                return MemberProfile::unknown();
            };
            parse_profile(&raw).unwrap_or_else(|e| {
                warn!("Falling back to unknown profile: {}", e);
                MemberProfile::unknown()
            })
        }
        .instrument(query_span(kind, week_number))
        .await
    }

    /// Extract decisions, or an empty list on any failure
    pub async fn query_decisions(&self, week_number: Option<u32>) -> Vec<DecisionRecord> {
        let kind = QueryKind::Decisions;
        async {
            let Some(raw) = self.complete(kind, self.context(week_number), None).await else {
                return Vec::new();
            };
            parse_decisions(&raw).unwrap_or_else(|e| {
                warn!("Falling back to no decisions: {}", e);
                Vec::new()
            })
        }
        .instrument(query_span(kind, week_number))
        .await
    }

    /// Narrative summary of one week; unknown weeks never reach the model
    pub async fn query_week_summary(&self, week_number: u32) -> String {
        let kind = QueryKind::WeekSummary;
        async {
            let Some(week) = self.index.get_week(week_number) else {
                info!("Week {} not in transcript", week_number);
                return WEEK_NOT_FOUND.to_string();
            };
            self.complete(kind, &week.content, Some(week_number))
                .await
                .unwrap_or_else(|| SUMMARY_UNAVAILABLE.to_string())
        }
        .instrument(query_span(kind, Some(week_number)))
        .await
    }

    /// Narrative progress analysis over the full transcript
    pub async fn query_progress_analysis(&self) -> String {
        let kind = QueryKind::Progress;
        async {
            self.complete(kind, self.index.raw(), None)
                .await
                .unwrap_or_else(|| PROGRESS_UNAVAILABLE.to_string())
        }
        .instrument(query_span(kind, None))
        .await
    }

    /// Dispatch a query-surface request.
    ///
    /// Only a missing week number for a summary is reported as an error.
    pub async fn run(&self, request: QueryRequest) -> Result<QueryResponse, QueryError> {
        let response = match request {
            QueryRequest::Profile { week_number } => {
                QueryResponse::Profile(self.query_member_profile(week_number).await)
            }
            QueryRequest::Decisions { week_number } => {
                QueryResponse::Decisions(self.query_decisions(week_number).await)
            }
            QueryRequest::Summary { week_number } => {
                let week_number = week_number.ok_or(QueryError::MissingParameter {
                    kind: QueryKind::WeekSummary,
                    parameter: "week number",
                })?;
                QueryResponse::Summary {
                    summary: self.query_week_summary(week_number).await,
                }
            }
            QueryRequest::Progress => QueryResponse::Progress {
                analysis: self.query_progress_analysis().await,
            },
            QueryRequest::Weeks => QueryResponse::Weeks(self.get_weeks().to_vec()),
        };

        Ok(response)
    }

    fn context(&self, week_number: Option<u32>) -> &str {
        select_context(self.index.weeks(), self.index.raw(), week_number)
    }

    /// Build the prompt and call the gateway; failures are logged and
    /// reported as `None`
    async fn complete(&self, kind: QueryKind, context: &str, week_number: Option<u32>) -> Option<String> {
        let prompt = match build_prompt(kind, context, week_number) {
            Ok(prompt) => prompt,
            Err(e) => {
                warn!("Could not build prompt: {}", e);
                return None;
            }
        };

        debug!("Prompt built: {} chars", prompt.len());

        match self.gateway.generate(&prompt).await {
            Ok(text) => {
                debug!("Model returned {} chars", text.len());
                Some(text)
            }
            Err(e) => {
                warn!("Model gateway failed: {}", e);
                None
            }
        }
    }
}

fn query_span(kind: QueryKind, week_number: Option<u32>) -> Span {
    info_span!(
        "query",
        request_id = %Uuid::new_v4(),
        kind = %kind,
        week = ?week_number
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::llm::{GatewayError, GatewayFuture};

    const TRANSCRIPT: &str = "/new/ --- WEEK 1 (01/01/24) --- [01/01/24, 09:00 AM] Coach: Welcome! \
        [01/01/24, 09:05 AM] Member: Thanks /new/ --- WEEK 2 (08/01/24) --- \
        [08/01/24, 10:00 AM] Coach: Checking in";

    /// Replies with a fixed text, or fails when none is set
    struct ScriptedGateway {
        reply: Option<String>,
        calls: AtomicUsize,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedGateway {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Some(reply.to_string()),
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: None,
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn last_prompt(&self) -> String {
            self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
        }
    }

    impl ModelGateway for ScriptedGateway {
        fn generate<'a>(&'a self, prompt: &'a str) -> GatewayFuture<'a> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            let result = self
                .reply
                .clone()
                .ok_or_else(|| GatewayError::BackendUnavailable("scripted failure".to_string()));
            Box::pin(async move { result })
        }
    }

    fn build_orchestrator(gateway: Arc<ScriptedGateway>) -> QueryOrchestrator {
        QueryOrchestrator::from_transcript(TRANSCRIPT, gateway)
    }

    #[test]
    fn test_get_weeks() {
        let gateway = ScriptedGateway::failing();
        let orchestrator = build_orchestrator(gateway.clone());

        let weeks = orchestrator.get_weeks();
        assert_eq!(weeks.len(), 2);
        assert_eq!(weeks[0].week_number, 1);
        assert_eq!(weeks[1].messages[0].content, "Checking in");
        assert!(orchestrator.get_week(2).is_some());
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_profile_parsed_from_model_output() {
        let gateway = ScriptedGateway::replying(
            r#"Sure! {"name": "Rohan", "currentPlan": "Walks", "medications": [],
               "exercisePlan": "Daily walk", "healthGoals": ["Sleep"], "challenges": [],
               "progress": {"adherence": 90, "improvements": [], "setbacks": []}}"#,
        );
        let orchestrator = build_orchestrator(gateway.clone());

        let profile = orchestrator.query_member_profile(Some(2)).await;

        assert_eq!(profile.name, "Rohan");
        assert_eq!(profile.progress.adherence, 90);
        assert_eq!(gateway.calls(), 1);
        let prompt = gateway.last_prompt();
        assert!(prompt.contains("Checking in"));
        assert!(!prompt.contains("Welcome!"));
    }

    #[tokio::test]
    async fn test_profile_fallbacks() {
        let no_json = build_orchestrator(ScriptedGateway::replying("I cannot determine a profile."));
        assert_eq!(no_json.query_member_profile(None).await, MemberProfile::unknown());

        let failing = build_orchestrator(ScriptedGateway::failing());
        assert_eq!(failing.query_member_profile(None).await, MemberProfile::unknown());
    }

    #[tokio::test]
    async fn test_unknown_week_uses_full_transcript() {
        let gateway = ScriptedGateway::replying("[]");
        let orchestrator = build_orchestrator(gateway.clone());

        assert!(orchestrator.query_decisions(Some(42)).await.is_empty());
        let prompt = gateway.last_prompt();
        assert!(prompt.contains("Welcome!"));
        assert!(prompt.contains("Checking in"));
    }

    #[tokio::test]
    async fn test_decisions_fallbacks() {
        let no_array = build_orchestrator(ScriptedGateway::replying("No decisions were made."));
        assert!(no_array.query_decisions(None).await.is_empty());

        let failing = build_orchestrator(ScriptedGateway::failing());
        assert!(failing.query_decisions(Some(1)).await.is_empty());
    }

    #[tokio::test]
    async fn test_week_summary() {
        let gateway = ScriptedGateway::replying("Week one went well.");
        let orchestrator = build_orchestrator(gateway.clone());

        assert_eq!(orchestrator.query_week_summary(1).await, "Week one went well.");
        assert!(gateway.last_prompt().contains("Week 1"));

        assert_eq!(orchestrator.query_week_summary(999).await, WEEK_NOT_FOUND);
        assert_eq!(gateway.calls(), 1);

        let failing = build_orchestrator(ScriptedGateway::failing());
        assert_eq!(failing.query_week_summary(2).await, SUMMARY_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_progress_analysis() {
        let gateway = ScriptedGateway::replying("  Adherence is trending up.\n");
        let orchestrator = build_orchestrator(gateway.clone());

        assert_eq!(
            orchestrator.query_progress_analysis().await,
            "  Adherence is trending up.\n"
        );
        assert!(gateway.last_prompt().contains(TRANSCRIPT));

        let failing = build_orchestrator(ScriptedGateway::failing());
        assert_eq!(failing.query_progress_analysis().await, PROGRESS_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_every_call_reaches_the_gateway() {
        let gateway = ScriptedGateway::replying("ok");
        let orchestrator = build_orchestrator(gateway.clone());

        orchestrator.query_progress_analysis().await;
        orchestrator.query_progress_analysis().await;
        assert_eq!(gateway.calls(), 2);
    }

    #[tokio::test]
    async fn test_run_dispatch() {
        let gateway = ScriptedGateway::replying("narrative");
        let orchestrator = build_orchestrator(gateway.clone());

        let err = orchestrator
            .run(QueryRequest::Summary { week_number: None })
            .await
            .unwrap_err();
        assert!(matches!(err, QueryError::MissingParameter { .. }));
        assert_eq!(gateway.calls(), 0);

        let summary = orchestrator
            .run(QueryRequest::Summary { week_number: Some(2) })
            .await
            .unwrap();
        assert_eq!(
            serde_json::to_value(&summary).unwrap(),
            serde_json::json!({"summary": "narrative"})
        );

        let progress = orchestrator.run(QueryRequest::Progress).await.unwrap();
        assert_eq!(
            serde_json::to_value(&progress).unwrap(),
            serde_json::json!({"analysis": "narrative"})
        );

        let weeks = orchestrator.run(QueryRequest::Weeks).await.unwrap();
        let weeks = serde_json::to_value(&weeks).unwrap();
        assert_eq!(weeks.as_array().map(Vec::len), Some(2));
        assert_eq!(weeks[1]["weekNumber"], 2);

        let decisions = orchestrator
            .run(QueryRequest::Decisions { week_number: None })
            .await
            .unwrap();
        assert_eq!(serde_json::to_value(&decisions).unwrap(), serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_concurrent_queries_share_the_index() {
        let gateway = ScriptedGateway::replying("shared");
        let orchestrator = Arc::new(build_orchestrator(gateway.clone()));

        let a = tokio::spawn({
            let orchestrator = orchestrator.clone();
            async move { orchestrator.query_week_summary(1).await }
        });
        let b = tokio::spawn({
            let orchestrator = orchestrator.clone();
            async move { orchestrator.query_progress_analysis().await }
        });

        assert_eq!(a.await.unwrap(), "shared");
        assert_eq!(b.await.unwrap(), "shared");
        assert_eq!(gateway.calls(), 2);
    }
}
