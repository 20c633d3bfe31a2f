//! End-to-end tracking through the REST client against a local fake backend.

use axum::http::StatusCode;
use integration_tests::{
    fixtures,
    setup::{FakeBackend, TEST_API_KEY},
};
use promo_core::{InteractionType, MemorySessionStorage, PromotionType};
use std::sync::Arc;
use store_client::health::check_connection;
use telemetry::health;
use tracker::{EventTracker, PromotionHandle, TrackInteraction};

fn tracker_for(backend: &FakeBackend) -> EventTracker {
    EventTracker::for_session(
        Arc::new(backend.rest_store()),
        &MemorySessionStorage::new(),
        fixtures::test_environment(),
    )
}

#[tokio::test]
async fn test_interaction_reaches_promotion_table() {
    let backend = FakeBackend::start().await;
    let tracker = tracker_for(&backend);

    let outcome = tracker
        .record_interaction(
            TrackInteraction::new("artist-1", PromotionType::Artist, InteractionType::Play)
                .with_user("u-9"),
        )
        .await;
    assert!(outcome.is_stored());

    let received = backend.received();
    assert_eq!(received.len(), 1);
    let insert = &received[0];
    assert_eq!(insert.table, "promotion_analytics");
    assert_eq!(insert.apikey.as_deref(), Some(TEST_API_KEY));
    assert_eq!(
        insert.body,
        serde_json::json!({
            "promotion_id": "artist-1",
            "promotion_type": "artist",
            "event_type": "play",
            "user_id": "u-9",
            "session_hash": tracker.session().hash().as_str(),
            "user_agent": fixtures::TEST_USER_AGENT,
            "referrer": fixtures::TEST_REFERRER,
        })
    );
}

#[tokio::test]
async fn test_content_view_reaches_content_table() {
    let backend = FakeBackend::start().await;
    let tracker = tracker_for(&backend);

    tracker
        .record_content_view(fixtures::content_view("track-42"))
        .await;

    let received = backend.received();
    assert_eq!(received[0].table, "content_views");
    assert_eq!(
        received[0].body,
        serde_json::json!({
            "content_id": "track-42",
            "user_id": null,
            "session_id": tracker.session().token().as_str(),
        })
    );
}

#[tokio::test]
async fn test_direct_visit_has_null_referrer() {
    let backend = FakeBackend::start().await;
    let tracker = EventTracker::for_session(
        Arc::new(backend.rest_store()),
        &MemorySessionStorage::new(),
        fixtures::direct_environment(),
    );

    tracker.record_interaction(fixtures::anonymous_click()).await;

    assert!(backend.received()[0].body["referrer"].is_null());
}

#[tokio::test]
async fn test_backend_rejection_is_swallowed() {
    let backend = FakeBackend::start().await;
    backend.respond_with(StatusCode::UNAUTHORIZED);
    let tracker = tracker_for(&backend);

    let outcome = tracker.record_interaction(fixtures::anonymous_click()).await;

    assert!(!outcome.is_stored());
    assert_eq!(backend.received().len(), 1, "sent once, never retried");
}

#[tokio::test]
async fn test_promotion_panel_flow() {
    let backend = FakeBackend::start().await;
    let promo = PromotionHandle::new(
        tracker_for(&backend),
        "creator-3",
        PromotionType::Creator,
        None,
    );

    if let Some(view) = promo.mount() {
        view.await.unwrap();
    }
    assert!(promo.mount().is_none());
    promo.click().await.unwrap();

    let types: Vec<_> = backend
        .received()
        .iter()
        .map(|r| r.body["event_type"].clone())
        .collect();
    assert_eq!(types, vec!["view", "click"]);
}

#[tokio::test]
async fn test_health_check_reports_reachable_backend() {
    let backend = FakeBackend::start().await;
    let store = backend.rest_store();

    assert!(check_connection(&store).await);
    assert!(health().store.is_healthy());
}
