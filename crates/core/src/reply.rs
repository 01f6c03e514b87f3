//! Reply generation for incoming chat messages.

use crate::message::Message;
use anyhow::Result;
use async_trait::async_trait;
use gemini_client::GeminiClient;
use uuid::Uuid;

/// Display name attached to generated replies.
pub const AI_USERNAME: &str = "Gemini";

/// Prefix of every generated reply id.
pub const AI_ID_PREFIX: &str = "ai-";

/// Substituted when the provider answers without any text.
pub const APOLOGY_TEXT: &str = "Sorry, I couldn't come up with a reply to that.";

/// Produces the text of a follow-up message for a user message.
///
/// Implementations are called from a background task; errors are logged
/// there and never reach the author of the original message.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    async fn generate(&self, user_text: &str) -> Result<String>;
}

#[async_trait]
impl ReplyGenerator for GeminiClient {
    async fn generate(&self, user_text: &str) -> Result<String> {
        let generated = self.generate_content(user_text).await?;
        Ok(reply_text(generated))
    }
}

fn reply_text(generated: Option<String>) -> String {
    generated.unwrap_or_else(|| APOLOGY_TEXT.to_string())
}

/// Builds a reply message with a fresh `ai-` id.
pub fn ai_message(text: impl Into<String>) -> Message {
    Message::new(format!("{}{}", AI_ID_PREFIX, Uuid::new_v4()), AI_USERNAME, text)
}

pub fn is_ai_message(message: &Message) -> bool {
    message.username() == AI_USERNAME && message.id().starts_with(AI_ID_PREFIX)
}
