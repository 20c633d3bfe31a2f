//! Session token behavior across tracker calls and sessions.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use integration_tests::{fixtures, setup::TestContext};
use promo_core::{
    session_hash, Collection, InteractionType, SessionStorage, SESSION_HASH_LEN,
    SESSION_STORAGE_KEY,
};

/// All events in one session carry the same token and hash.
#[tokio::test]
async fn test_same_session_same_token() {
    let ctx = TestContext::new();

    for interaction in fixtures::all_interactions("p1") {
        ctx.tracker.record_interaction(interaction).await;
    }
    ctx.tracker
        .record_content_view(fixtures::content_view("c1"))
        .await;
    ctx.tracker
        .record_content_view(fixtures::content_view("c2"))
        .await;

    let hashes: Vec<_> = ctx
        .store
        .captured_in(Collection::PromotionAnalytics)
        .iter()
        .map(|r| r["session_hash"].clone())
        .collect();
    assert_eq!(hashes.len(), 4);
    assert!(hashes.iter().all(|h| *h == hashes[0]));

    let tokens: Vec<_> = ctx
        .store
        .captured_in(Collection::ContentViews)
        .iter()
        .map(|r| r["session_id"].clone())
        .collect();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0], tokens[1]);
    assert_eq!(
        tokens[0].as_str(),
        Some(ctx.tracker.session().token().as_str())
    );
}

/// A reload within the session reuses the stored token.
#[tokio::test]
async fn test_reload_reuses_token() {
    let ctx = TestContext::new();
    let reloaded = ctx.reload();

    assert_eq!(ctx.tracker.session(), reloaded.session());
    assert_eq!(
        ctx.storage.get(SESSION_STORAGE_KEY).as_deref(),
        Some(ctx.tracker.session().token().as_str())
    );
}

/// Clearing session storage yields an independent token.
#[tokio::test]
async fn test_new_session_new_token() {
    let ctx = TestContext::new();
    let first = ctx.tracker.session().clone();

    let next = ctx.new_session();
    assert_ne!(first.token(), next.session().token());
    assert_ne!(first.hash(), next.session().hash());

    next.record_interaction(fixtures::interaction(InteractionType::View))
        .await;
    let rows = ctx.store.captured_in(Collection::PromotionAnalytics);
    assert_eq!(rows[0]["session_hash"], next.session().hash().as_str());
}

/// The stored hash is the first 16 base64 characters of the token.
#[tokio::test]
async fn test_hash_matches_encoded_token() {
    let ctx = TestContext::new();
    ctx.tracker.record_interaction(fixtures::anonymous_click()).await;

    let token = ctx.tracker.session().token();
    let expected = &STANDARD.encode(token.as_str())[..SESSION_HASH_LEN];

    let rows = ctx.store.captured_in(Collection::PromotionAnalytics);
    assert_eq!(rows[0]["session_hash"], expected);
    assert_eq!(session_hash(token).as_str(), expected);
    assert_eq!(expected.len(), 16);
}
