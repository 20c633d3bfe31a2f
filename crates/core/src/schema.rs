//! Names of the hosted tables the tracker writes to.

use std::fmt;

/// Destination table for a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Interaction events (view/click/play/share) on promotions
    PromotionAnalytics,
    /// Content page views
    ContentViews,
}

impl Collection {
    pub const ALL: [Collection; 2] = [Self::PromotionAnalytics, Self::ContentViews];

    /// Table name as exposed by the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PromotionAnalytics => "promotion_analytics",
            Self::ContentViews => "content_views",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
