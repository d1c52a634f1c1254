//! End-to-end poller behavior against a scripted status fetcher.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use formrec::{
    AnalysisError, AnalyzeOperation, AnalyzeStatusPayload, RawResponse, StatusCheck, StatusFetcher,
};

/// Fetcher that replays a fixed sequence of checks, then repeats the last
/// one forever. Counts how many fetches were issued.
struct ScriptedFetcher {
    script: Mutex<Vec<StatusCheck>>,
    calls: AtomicUsize,
}

impl ScriptedFetcher {
    fn new(script: Vec<StatusCheck>) -> Arc<Self> {
        assert!(!script.is_empty());
        Arc::new(Self {
            script: Mutex::new(script),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatusFetcher for ScriptedFetcher {
    async fn fetch(
        &self,
        _operation_id: &str,
        _cancel: Option<&CancellationToken>,
    ) -> Result<StatusCheck, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut script = self.script.lock().unwrap();
        if script.len() > 1 {
            Ok(script.remove(0))
        } else {
            Ok(script[0].clone())
        }
    }
}

fn check_from_json(body: &str) -> StatusCheck {
    let payload: AnalyzeStatusPayload = serde_json::from_str(body).unwrap();
    StatusCheck {
        payload,
        response: RawResponse {
            status: 200,
            headers: HashMap::new(),
            body: body.to_string(),
        },
    }
}

fn running() -> StatusCheck {
    check_from_json(r#"{"status":"running"}"#)
}

fn succeeded() -> StatusCheck {
    check_from_json(
        r#"{
            "status": "succeeded",
            "analyzeResult": {
                "version": "2.1.0",
                "readResults": [{"page": 1, "angle": 0.0, "width": 8.5, "height": 11.0, "unit": "inch"}],
                "documentResults": [{
                    "docType": "prebuilt:receipt",
                    "pageRange": [1, 1],
                    "fields": {"Total": {"type": "number", "text": "$14.50", "confidence": 0.98}}
                }]
            }
        }"#,
    )
}

fn failed() -> StatusCheck {
    check_from_json(r#"{"status":"failed","errors":[{"code":"X","message":"Y"}]}"#)
}

#[tokio::test(start_paused = true)]
async fn running_three_times_then_succeeded_polls_four_times() {
    let fetcher = ScriptedFetcher::new(vec![running(), running(), running(), succeeded()]);
    let operation = AnalyzeOperation::new("abc-123", fetcher.clone());

    let (response, result) = operation
        .wait_until_complete(Some(Duration::from_millis(10)), None)
        .await
        .unwrap();

    assert_eq!(fetcher.calls(), 4);
    assert_eq!(response.status, 200);
    assert_eq!(result.receipts.len(), 1);
    assert_eq!(result.receipts[0].fields["Total"].text, "$14.50");
    assert!(operation.has_completed());
    assert!(operation.has_value());
}

#[tokio::test]
async fn succeeded_result_is_cached_and_refresh_becomes_noop() {
    let fetcher = ScriptedFetcher::new(vec![succeeded()]);
    let operation = AnalyzeOperation::new("abc-123", fetcher.clone());

    operation.refresh_status(None).await.unwrap();
    assert_eq!(fetcher.calls(), 1);

    let first = operation.result().unwrap();

    // Further refreshes issue no network checks and the value is identical.
    for _ in 0..3 {
        let response = operation.refresh_status(None).await.unwrap();
        assert_eq!(response.status, 200);
    }
    assert_eq!(fetcher.calls(), 1);

    let second = operation.result().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert!(operation.has_completed());
}

#[tokio::test]
async fn failed_status_caches_structured_error() {
    let fetcher = ScriptedFetcher::new(vec![failed()]);
    let operation = AnalyzeOperation::new("abc-123", fetcher.clone());

    let err = operation
        .wait_until_complete(Some(Duration::from_millis(1)), None)
        .await
        .unwrap_err();
    let failure = match err {
        AnalysisError::OperationFailed(failure) => failure,
        other => panic!("expected OperationFailed, got {other:?}"),
    };
    assert_eq!(failure.errors.len(), 1);
    assert_eq!(failure.errors[0].code, "X");
    assert_eq!(failure.errors[0].message, "Y");

    assert!(operation.has_completed());
    assert!(!operation.has_value());
    assert_eq!(fetcher.calls(), 1);

    // Every later result read raises the same cached failure, without any
    // further network check.
    for _ in 0..3 {
        match operation.result() {
            Err(AnalysisError::OperationFailed(cached)) => assert_eq!(cached, failure),
            other => panic!("expected cached failure, got {other:?}"),
        }
    }
    assert_eq!(fetcher.calls(), 1);
}

#[tokio::test]
async fn result_before_completion_is_not_ready() {
    let fetcher = ScriptedFetcher::new(vec![running()]);
    let operation = AnalyzeOperation::new("abc-123", fetcher);

    assert!(matches!(
        operation.result(),
        Err(AnalysisError::NotReady(id)) if id == "abc-123"
    ));

    operation.refresh_status(None).await.unwrap();
    assert!(!operation.has_completed());
    assert!(matches!(
        operation.result(),
        Err(AnalysisError::NotReady(_))
    ));
    assert!(operation.last_response().is_some());
}

#[tokio::test(start_paused = true)]
async fn cancel_mid_wait_leaves_operation_usable() {
    let fetcher = ScriptedFetcher::new(vec![running()]);
    let operation = Arc::new(AnalyzeOperation::new("abc-123", fetcher.clone()));
    let token = CancellationToken::new();

    let waiter = {
        let operation = operation.clone();
        let token = token.clone();
        tokio::spawn(async move {
            operation
                .wait_until_complete(Some(Duration::from_secs(1)), Some(&token))
                .await
        })
    };

    // Let a few polls happen, then cancel between iterations.
    tokio::time::sleep(Duration::from_millis(2500)).await;
    token.cancel();

    let result = waiter.await.unwrap();
    assert!(matches!(result, Err(AnalysisError::Cancelled)));
    assert!(!operation.has_completed());

    // Cancellation only stopped the observer; a fresh refresh still works.
    let calls_before = fetcher.calls();
    operation.refresh_status(None).await.unwrap();
    assert_eq!(fetcher.calls(), calls_before + 1);
}

#[tokio::test]
async fn operation_from_location_derives_trailing_segment() {
    let fetcher = ScriptedFetcher::new(vec![running()]);
    let operation = AnalyzeOperation::from_location(
        "https://analysis.example.com/formrecognizer/v2.1/prebuilt/receipt/analyzeResults/abc-123",
        fetcher,
    )
    .unwrap();
    assert_eq!(operation.id(), "abc-123");
}

#[tokio::test]
async fn suggested_retry_after_drives_default_interval() {
    // First check carries Retry-After: 3; with no explicit interval the wait
    // loop must sleep 3s before the second check.
    let mut first = running();
    first
        .response
        .headers
        .insert("retry-after".to_string(), "3".to_string());
    let fetcher = ScriptedFetcher::new(vec![first, succeeded()]);
    let operation = AnalyzeOperation::new("abc-123", fetcher.clone());

    tokio::time::pause();
    let started = tokio::time::Instant::now();
    operation.wait_until_complete(None, None).await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(fetcher.calls(), 2);
    assert!(elapsed >= Duration::from_secs(3), "elapsed {elapsed:?}");
}
