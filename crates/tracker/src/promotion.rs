//! Analytics calls made by a promotion panel.

use crate::tracker::{EventTracker, TrackInteraction, TrackOutcome};
use promo_core::{InteractionType, PromotionType};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::task::JoinHandle;

/// One rendered promotion bound to a tracker.
///
/// All calls are fire-and-forget and must run inside a Tokio runtime.
pub struct PromotionHandle {
    tracker: EventTracker,
    promotion_id: String,
    promotion_type: PromotionType,
    viewer_id: Option<String>,
    viewed: AtomicBool,
}

impl PromotionHandle {
    pub fn new(
        tracker: EventTracker,
        promotion_id: impl Into<String>,
        promotion_type: PromotionType,
        viewer_id: Option<String>,
    ) -> Self {
        Self {
            tracker,
            promotion_id: promotion_id.into(),
            promotion_type,
            viewer_id,
            viewed: AtomicBool::new(false),
        }
    }

    pub fn promotion_id(&self) -> &str {
        &self.promotion_id
    }

    /// Records the `view` when the panel first appears. Later calls do nothing.
    pub fn mount(&self) -> Option<JoinHandle<TrackOutcome>> {
        if self.viewed.swap(true, Ordering::AcqRel) {
            return None;
        }
        Some(self.fire(InteractionType::View))
    }

    pub fn click(&self) -> JoinHandle<TrackOutcome> {
        self.fire(InteractionType::Click)
    }

    pub fn play(&self) -> JoinHandle<TrackOutcome> {
        self.fire(InteractionType::Play)
    }

    pub fn share(&self) -> JoinHandle<TrackOutcome> {
        self.fire(InteractionType::Share)
    }

    fn fire(&self, event_type: InteractionType) -> JoinHandle<TrackOutcome> {
        let mut input =
            TrackInteraction::new(self.promotion_id.clone(), self.promotion_type, event_type);
        input.user_id = self.viewer_id.clone();
        self.tracker.spawn_interaction(input)
    }
}
