use super::*;
use crate::llm::gemini::types::{GenerateContentRequest, GenerateContentResponse};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Scripted service double: fails the first `fail_until` calls, then keeps
/// replying with a fixed text payload.
struct ScriptedService {
    calls: Arc<AtomicUsize>,
    fail_until: usize,
    payload: &'static str,
}

impl GenerativeService for ScriptedService {
    fn generate<'a>(
        &'a self,
        _request: &'a GenerateContentRequest,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<GenerateContentResponse>> + Send + 'a>> {
        Box::pin(async move {
            let attempt = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if attempt <= self.fail_until {
                anyhow::bail!("503 upstream unavailable");
            }
            Ok(GenerateContentResponse::text_only(self.payload))
        })
    }
}

fn pipeline_with(service: ScriptedService) -> (Pipeline, Arc<AtomicUsize>) {
    let calls = Arc::clone(&service.calls);
    let pipeline = Pipeline::new(
        Arc::new(service),
        RetryPolicy::new(3, Duration::from_millis(1)),
        PipelineOptions::default(),
    );
    (pipeline, calls)
}

fn scripted(fail_until: usize, payload: &'static str) -> ScriptedService {
    ScriptedService {
        calls: Arc::new(AtomicUsize::new(0)),
        fail_until,
        payload,
    }
}

#[tokio::test]
async fn comment_reply_becomes_suggestions() {
    let (pipeline, _) = pipeline_with(scripted(0, r#"{"suggestions":["a","b","c"]}"#));
    let result = pipeline
        .generate(&GenerationRequest::comment("a post worth reading", "warm"))
        .await;
    assert_eq!(
        result,
        GenerationResult::Suggestions(vec!["a".into(), "b".into(), "c".into()])
    );
}

#[tokio::test]
async fn transport_retries_then_recovers() {
    let (pipeline, calls) = pipeline_with(scripted(1, r#"{"suggestions":["a"]}"#));
    let result = pipeline
        .generate(&GenerationRequest::comment("a post worth reading", "warm"))
        .await;
    assert_eq!(result, GenerationResult::Suggestions(vec!["a".into()]));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn transport_exhaustion_is_classified() {
    let (pipeline, calls) = pipeline_with(scripted(usize::MAX, "{}"));
    let result = pipeline
        .generate(&GenerationRequest::comment("a post worth reading", "warm"))
        .await;
    assert_eq!(result.failure_kind(), Some(FailureKind::Transport));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    let GenerationResult::Failure { message, .. } = result else {
        panic!("expected failure");
    };
    assert!(message.contains("3 attempt"), "got: {message}");
}

#[tokio::test]
async fn free_text_reply_is_a_parse_failure() {
    let (pipeline, calls) = pipeline_with(scripted(0, "Sure! Here are some ideas."));
    let result = pipeline
        .generate(&GenerationRequest::comment("a post worth reading", "warm"))
        .await;
    assert_eq!(result.failure_kind(), Some(FailureKind::Parse));
    // parse failures surface immediately, no further retries
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn wrong_shape_reply_is_a_validation_failure() {
    let (pipeline, calls) = pipeline_with(scripted(0, "{}"));
    let result = pipeline
        .generate(&GenerationRequest::comment("a post worth reading", "warm"))
        .await;
    assert_eq!(result.failure_kind(), Some(FailureKind::Validation));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn input_failures_never_reach_the_service() {
    let (pipeline, calls) = pipeline_with(scripted(0, r#"{"suggestions":["a"]}"#));

    for request in [
        GenerationRequest::comment("", "warm"),
        GenerationRequest::comment("   ", "warm"),
        GenerationRequest::comment("hey", "warm"),
        GenerationRequest::post("t".repeat(301), "warm"),
    ] {
        let result = pipeline.generate(&request).await;
        assert_eq!(result.failure_kind(), Some(FailureKind::Input));
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn over_length_draft_is_advisory_success() {
    // scripted payloads need a static str; build the pipeline by hand
    let long = format!(r#"{{"output":"{}"}}"#, "d".repeat(301)).leak();
    let (pipeline, _) = pipeline_with(scripted(0, long));
    let result = pipeline
        .generate(&GenerationRequest::post("remote work rituals", "direct"))
        .await;
    let GenerationResult::PostDraft { text, over_length } = result else {
        panic!("expected draft");
    };
    assert_eq!(text.chars().count(), 301);
    assert!(over_length);
}

#[tokio::test]
async fn busy_flag_releases_after_failure() {
    let (pipeline, _) = pipeline_with(scripted(usize::MAX, "{}"));
    let request = GenerationRequest::comment("a post worth reading", "warm");

    let first = pipeline.generate(&request).await;
    assert_eq!(first.failure_kind(), Some(FailureKind::Transport));

    // the in-flight flag must not stay held after a failed call
    let second = pipeline.generate(&request).await;
    assert_eq!(second.failure_kind(), Some(FailureKind::Transport));
}

/// Double that records how many calls are in flight at once, replying with a
/// payload that satisfies both kinds.
struct GaugeService {
    in_flight: Arc<AtomicUsize>,
    high_water: Arc<AtomicUsize>,
}

impl GenerativeService for GaugeService {
    fn generate<'a>(
        &'a self,
        _request: &'a GenerateContentRequest,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<GenerateContentResponse>> + Send + 'a>> {
        Box::pin(async move {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.high_water.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(GenerateContentResponse::text_only(
                r#"{"suggestions":["x"],"output":"drafted"}"#,
            ))
        })
    }
}

fn gauge_pipeline() -> (Arc<Pipeline>, Arc<AtomicUsize>) {
    let high_water = Arc::new(AtomicUsize::new(0));
    let service = GaugeService {
        in_flight: Arc::new(AtomicUsize::new(0)),
        high_water: Arc::clone(&high_water),
    };
    let pipeline = Arc::new(Pipeline::new(
        Arc::new(service),
        RetryPolicy::new(1, Duration::from_millis(1)),
        PipelineOptions::default(),
    ));
    (pipeline, high_water)
}

#[tokio::test(start_paused = true)]
async fn same_kind_calls_never_overlap() {
    let (pipeline, high_water) = gauge_pipeline();

    let a = tokio::spawn({
        let pipeline = Arc::clone(&pipeline);
        async move {
            pipeline
                .generate(&GenerationRequest::comment("first post text", "warm"))
                .await
        }
    });
    let b = tokio::spawn({
        let pipeline = Arc::clone(&pipeline);
        async move {
            pipeline
                .generate(&GenerationRequest::comment("second post text", "warm"))
                .await
        }
    });

    assert!(a.await.unwrap().failure_kind().is_none());
    assert!(b.await.unwrap().failure_kind().is_none());
    assert_eq!(high_water.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn distinct_kinds_may_overlap() {
    let (pipeline, high_water) = gauge_pipeline();

    let a = tokio::spawn({
        let pipeline = Arc::clone(&pipeline);
        async move {
            pipeline
                .generate(&GenerationRequest::comment("some post text", "warm"))
                .await
        }
    });
    let b = tokio::spawn({
        let pipeline = Arc::clone(&pipeline);
        async move {
            pipeline
                .generate(&GenerationRequest::post("a topic to draft", "warm"))
                .await
        }
    });

    assert!(a.await.unwrap().failure_kind().is_none());
    assert!(b.await.unwrap().failure_kind().is_none());
    assert_eq!(high_water.load(Ordering::SeqCst), 2);
}
