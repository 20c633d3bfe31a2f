//! Analytics record types written to the hosted tables.

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use crate::error::{Error, Result};
use crate::schema::Collection;

/// A single row as handed to the store: column name to JSON value.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Kind of promoted item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromotionType {
    Artist,
    Creator,
}

impl PromotionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Artist => "artist",
            Self::Creator => "creator",
        }
    }
}

impl fmt::Display for PromotionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the visitor did with a promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionType {
    View,
    Click,
    Play,
    Share,
}

impl InteractionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Click => "click",
            Self::Play => "play",
            Self::Share => "share",
        }
    }
}

impl fmt::Display for InteractionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row for the `promotion_analytics` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct InteractionEvent {
    #[validate(length(min = 1))]
    pub promotion_id: String,
    pub promotion_type: PromotionType,
    pub event_type: InteractionType,
    /// `None` for anonymous visitors; serialized as `null`
    pub user_id: Option<String>,
    #[validate(length(min = 1))]
    pub session_hash: String,
    pub user_agent: String,
    pub referrer: Option<String>,
}

/// Row for the `content_views` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ContentViewEvent {
    #[validate(length(min = 1))]
    pub content_id: String,
    pub user_id: Option<String>,
    /// Raw session token, not the obfuscated hash
    #[validate(length(min = 1))]
    pub session_id: String,
}

/// A record kind that knows its destination table.
pub trait StoredEvent: Serialize + Validate {
    const COLLECTION: Collection;

    /// Validates the event and flattens it into a column map.
    fn to_record(&self) -> Result<Record> {
        validate_event(self)?;
        match serde_json::to_value(self)? {
            serde_json::Value::Object(map) => Ok(map),
            other => Err(Error::internal(format!(
                "{} did not serialize to an object: {}",
                Self::COLLECTION,
                other
            ))),
        }
    }
}

impl StoredEvent for InteractionEvent {
    const COLLECTION: Collection = Collection::PromotionAnalytics;
}

impl StoredEvent for ContentViewEvent {
    const COLLECTION: Collection = Collection::ContentViews;
}

/// Runs derive validation and maps failures onto a TRACK_001 error.
pub fn validate_event<T: Validate + ?Sized>(event: &T) -> Result<()> {
    event.validate().map_err(|errors| {
        let mut fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|field| field.to_string())
            .collect();
        fields.sort();
        Error::missing_field(&fields.join(", "))
    })
}

/// Treats an empty user id the same as an anonymous visitor.
pub fn normalize_user_id(user_id: Option<String>) -> Option<String> {
    user_id.filter(|id| !id.is_empty())
}
