//! The event tracker.

use promo_core::{
    normalize_user_id, ClientEnvironment, ContentViewEvent, InteractionEvent, InteractionType,
    PromotionType, Result, SessionContext, SessionStorage,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use store_client::{insert_event, RecordStore};
use telemetry::{metrics, Counter};
use tokio::task::JoinHandle;
use tracing::{debug, error};

/// A visitor's interaction with a promotion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackInteraction {
    pub promotion_id: String,
    pub promotion_type: PromotionType,
    pub event_type: InteractionType,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl TrackInteraction {
    pub fn new(
        promotion_id: impl Into<String>,
        promotion_type: PromotionType,
        event_type: InteractionType,
    ) -> Self {
        Self {
            promotion_id: promotion_id.into(),
            promotion_type,
            event_type,
            user_id: None,
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}

/// A view of a piece of content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackContentView {
    pub content_id: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl TrackContentView {
    pub fn new(content_id: impl Into<String>) -> Self {
        Self {
            content_id: content_id.into(),
            user_id: None,
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}

/// What happened to a tracked event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackOutcome {
    /// The backend accepted the record.
    Stored,
    /// The record was logged and discarded.
    Dropped {
        code: Option<&'static str>,
        reason: String,
    },
}

impl TrackOutcome {
    pub fn is_stored(&self) -> bool {
        matches!(self, Self::Stored)
    }
}

#[derive(Debug, Clone, Copy)]
enum EventKind {
    Interaction,
    ContentView,
}

impl EventKind {
    fn name(self) -> &'static str {
        match self {
            Self::Interaction => "interaction",
            Self::ContentView => "content_view",
        }
    }

    fn recorded(self) -> &'static Counter {
        match self {
            Self::Interaction => &metrics().interactions_recorded,
            Self::ContentView => &metrics().content_views_recorded,
        }
    }

    fn dropped(self) -> &'static Counter {
        match self {
            Self::Interaction => &metrics().interactions_dropped,
            Self::ContentView => &metrics().content_views_dropped,
        }
    }
}

struct TrackerInner {
    store: Arc<dyn RecordStore>,
    session: SessionContext,
    environment: ClientEnvironment,
}

/// Builds analytics records and writes them to the store, one insert per call.
///
/// Cloning is cheap; clones share the store, session and environment.
#[derive(Clone)]
pub struct EventTracker {
    inner: Arc<TrackerInner>,
}

impl EventTracker {
    pub fn new(
        store: Arc<dyn RecordStore>,
        session: SessionContext,
        environment: ClientEnvironment,
    ) -> Self {
        Self {
            inner: Arc::new(TrackerInner {
                store,
                session,
                environment,
            }),
        }
    }

    /// Creates a tracker for the session held in `storage`, starting one if needed.
    pub fn for_session(
        store: Arc<dyn RecordStore>,
        storage: &dyn SessionStorage,
        environment: ClientEnvironment,
    ) -> Self {
        Self::new(store, SessionContext::resolve(storage), environment)
    }

    pub fn session(&self) -> &SessionContext {
        &self.inner.session
    }

    pub fn environment(&self) -> &ClientEnvironment {
        &self.inner.environment
    }

    /// The row an interaction produces, with session and environment filled in.
    pub fn interaction_event(&self, input: TrackInteraction) -> InteractionEvent {
        let env = &self.inner.environment;
        InteractionEvent {
            promotion_id: input.promotion_id,
            promotion_type: input.promotion_type,
            event_type: input.event_type,
            user_id: normalize_user_id(input.user_id),
            session_hash: self.inner.session.hash().to_string(),
            user_agent: env.user_agent().to_string(),
            referrer: env.referrer().map(str::to_string),
        }
    }

    /// The row a content view produces, carrying the raw session token.
    pub fn content_view_event(&self, input: TrackContentView) -> ContentViewEvent {
        ContentViewEvent {
            content_id: input.content_id,
            user_id: normalize_user_id(input.user_id),
            session_id: self.inner.session.token().to_string(),
        }
    }

    /// Inserts an interaction, returning any validation or store error.
    pub async fn try_record_interaction(&self, input: TrackInteraction) -> Result<()> {
        let event = self.interaction_event(input);
        insert_event(self.inner.store.as_ref(), &event).await
    }

    /// Inserts a content view, returning any validation or store error.
    pub async fn try_record_content_view(&self, input: TrackContentView) -> Result<()> {
        let event = self.content_view_event(input);
        insert_event(self.inner.store.as_ref(), &event).await
    }

    /// Records an interaction. Failures are logged once and swallowed.
    pub async fn record_interaction(&self, input: TrackInteraction) -> TrackOutcome {
        let subject = input.promotion_id.clone();
        let result = self.try_record_interaction(input).await;
        settle(EventKind::Interaction, &subject, result)
    }

    /// Records a content view. Failures are logged once and swallowed.
    pub async fn record_content_view(&self, input: TrackContentView) -> TrackOutcome {
        let subject = input.content_id.clone();
        let result = self.try_record_content_view(input).await;
        settle(EventKind::ContentView, &subject, result)
    }

    /// Fire-and-forget interaction; the handle may be dropped.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn_interaction(&self, input: TrackInteraction) -> JoinHandle<TrackOutcome> {
        let tracker = self.clone();
        metrics().pending_writes.inc();
        tokio::spawn(async move {
            let outcome = tracker.record_interaction(input).await;
            metrics().pending_writes.dec();
            outcome
        })
    }

    /// Fire-and-forget content view; the handle may be dropped.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn_content_view(&self, input: TrackContentView) -> JoinHandle<TrackOutcome> {
        let tracker = self.clone();
        metrics().pending_writes.inc();
        tokio::spawn(async move {
            let outcome = tracker.record_content_view(input).await;
            metrics().pending_writes.dec();
            outcome
        })
    }
}

/// The single place a tracking failure is logged.
fn settle(kind: EventKind, subject: &str, result: Result<()>) -> TrackOutcome {
    match result {
        Ok(()) => {
            kind.recorded().inc();
            debug!(kind = kind.name(), subject, "Tracked event");
            TrackOutcome::Stored
        }
        Err(e) => {
            kind.dropped().inc();
            error!(
                kind = kind.name(),
                subject,
                code = e.error_code().unwrap_or("none"),
                error = %e,
                "Failed to track event"
            );
            TrackOutcome::Dropped {
                code: e.error_code(),
                reason: e.to_string(),
            }
        }
    }
}
