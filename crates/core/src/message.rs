//! The chat message model and its validity guards.

use serde::{Deserialize, Serialize};

/// A chat message as posted by a client or synthesized for an AI reply.
///
/// Every field is optional on the wire: clients are not forced to send a
/// complete message, and an absent field is echoed back absent rather than
/// as an empty string.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Message {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(example = "1"))]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(example = "alice"))]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(example = "hi"))]
    pub message: Option<String>,
}

impl Message {
    pub fn new(
        id: impl Into<String>,
        username: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: Some(id.into()),
            username: Some(username.into()),
            message: Some(message.into()),
        }
    }

    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }

    pub fn username(&self) -> &str {
        self.username.as_deref().unwrap_or_default()
    }

    pub fn text(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }

    /// True when `id`, `username` and `message` are all present and non-empty.
    pub fn is_complete(&self) -> bool {
        !self.id().is_empty() && !self.username().is_empty() && !self.text().is_empty()
    }
}

/// The check applied right before a message is fanned out to listeners.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BroadcastGuard {
    /// Requires `id`, `username` and `message`.
    #[default]
    Strict,
    /// Requires `id` and `username` only. The message text is never checked,
    /// matching the historical guard that tested `username` twice.
    Legacy,
}

impl BroadcastGuard {
    pub fn permits(self, message: &Message) -> bool {
        match self {
            BroadcastGuard::Strict => message.is_complete(),
            BroadcastGuard::Legacy => !message.id().is_empty() && !message.username().is_empty(),
        }
    }
}

impl std::str::FromStr for BroadcastGuard {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(BroadcastGuard::Strict),
            "legacy" => Ok(BroadcastGuard::Legacy),
            other => Err(format!("'{}' is not a broadcast guard (expected strict or legacy)", other)),
        }
    }
}
