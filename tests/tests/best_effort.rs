//! Failures never reach the caller and are logged exactly once.

use integration_tests::{
    fixtures,
    mocks::{ErrorCounter, FailureMode},
    setup::TestContext,
};
use promo_core::{Collection, InteractionType};
use tracing_subscriber::layer::SubscriberExt;
use tracker::{TrackContentView, TrackOutcome};

/// Installs an error-counting subscriber for the current thread.
///
/// `#[tokio::test]` runs on a current-thread runtime, so spawned tasks log
/// through the same subscriber.
fn capture_errors() -> (ErrorCounter, tracing::subscriber::DefaultGuard) {
    let counter = ErrorCounter::new();
    let subscriber = tracing_subscriber::registry().with(counter.clone());
    let guard = tracing::subscriber::set_default(subscriber);
    (counter, guard)
}

#[tokio::test]
async fn test_rejected_insert_logs_once_and_resolves() {
    let (errors, _guard) = capture_errors();
    let ctx = TestContext::new();
    ctx.store.set_failure(FailureMode::Reject(500));

    let outcome = ctx.tracker.record_interaction(fixtures::anonymous_click()).await;

    assert!(matches!(
        outcome,
        TrackOutcome::Dropped {
            code: Some("STORE_002"),
            ..
        }
    ));
    assert_eq!(errors.count(), 1);
    assert_eq!(ctx.store.attempts(), 1, "no retries");
}

#[tokio::test]
async fn test_unreachable_backend_logs_once() {
    let (errors, _guard) = capture_errors();
    let ctx = TestContext::new();
    ctx.store.set_failure(FailureMode::Unreachable);

    let outcome = ctx
        .tracker
        .record_content_view(fixtures::content_view("c1"))
        .await;

    assert!(matches!(
        outcome,
        TrackOutcome::Dropped {
            code: Some("STORE_001"),
            ..
        }
    ));
    assert_eq!(errors.count(), 1);
}

#[tokio::test]
async fn test_spawned_failure_is_contained() {
    let (errors, _guard) = capture_errors();
    let ctx = TestContext::new();
    ctx.store.set_failure(FailureMode::Reject(401));

    let handle = ctx.tracker.spawn_interaction(fixtures::anonymous_click());
    let outcome = handle.await.expect("tracking task must not panic");

    assert!(!outcome.is_stored());
    assert_eq!(errors.count(), 1);
}

#[tokio::test]
async fn test_successful_insert_logs_no_error() {
    let (errors, _guard) = capture_errors();
    let ctx = TestContext::new();

    let outcome = ctx.tracker.record_interaction(fixtures::anonymous_click()).await;

    assert_eq!(outcome, TrackOutcome::Stored);
    assert_eq!(errors.count(), 0);
}

#[tokio::test]
async fn test_invalid_input_is_dropped_without_insert() {
    let (errors, _guard) = capture_errors();
    let ctx = TestContext::new();

    let outcome = ctx
        .tracker
        .record_content_view(TrackContentView::new(""))
        .await;

    assert!(matches!(
        outcome,
        TrackOutcome::Dropped {
            code: Some("TRACK_001"),
            ..
        }
    ));
    assert_eq!(ctx.store.attempts(), 0);
    assert_eq!(errors.count(), 1);
}

#[tokio::test]
async fn test_anonymous_user_stored_as_null() {
    let ctx = TestContext::new();

    ctx.tracker.record_interaction(fixtures::anonymous_click()).await;
    ctx.tracker
        .record_content_view(fixtures::content_view("c1"))
        .await;

    let interaction = &ctx.store.captured_in(Collection::PromotionAnalytics)[0];
    assert!(interaction["user_id"].is_null());
    let view = &ctx.store.captured_in(Collection::ContentViews)[0];
    assert!(view["user_id"].is_null());
}

#[tokio::test]
async fn test_recovery_after_failures() {
    let ctx = TestContext::new();

    ctx.store.set_failure(FailureMode::Unreachable);
    ctx.tracker
        .record_interaction(fixtures::interaction(InteractionType::View))
        .await;

    ctx.store.set_failure(FailureMode::None);
    let outcome = ctx
        .tracker
        .record_interaction(fixtures::interaction(InteractionType::Click))
        .await;

    assert!(outcome.is_stored());
    let rows = ctx.store.captured_in(Collection::PromotionAnalytics);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["event_type"], "click");
}
