//! Ambient client values attached to interaction records.

use serde::{Deserialize, Serialize};

/// User agent and referrer of the page the tracker runs in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientEnvironment {
    user_agent: String,
    referrer: Option<String>,
}

impl ClientEnvironment {
    /// An empty referrer means the page was opened directly.
    pub fn new(user_agent: impl Into<String>, referrer: Option<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            referrer: referrer.filter(|r| !r.is_empty()),
        }
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn referrer(&self) -> Option<&str> {
        self.referrer.as_deref()
    }
}
