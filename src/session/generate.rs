use crate::api::{BoardApi, ChatMessage, GenerateRequest, GenerateStatus, GeneratedCard};
use crate::domain::{NewCard, Priority};
use std::time::Duration;
use tracing::Instrument;

pub const DEFAULT_GENERATE_ATTEMPTS: u32 = 30;
pub const DEFAULT_GENERATE_INTERVAL: Duration = Duration::from_secs(1);

const FALLBACK_COLUMN: &str = "ideas";
const FALLBACK_ASSIGNEE: &str = "both";

/// Polling budget for card generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateSettings {
    pub attempts: u32,
    pub interval: Duration,
}

impl Default for GenerateSettings {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_GENERATE_ATTEMPTS,
            interval: DEFAULT_GENERATE_INTERVAL,
        }
    }
}

/// Prefill for the new-card form
#[derive(Debug, Clone, PartialEq)]
pub struct CardDraft {
    pub title: String,
    pub desc: String,
    pub column: String,
    pub priority: Priority,
    pub assignee: String,
    /// Comma separated, as typed in the form
    pub tags: String,
    pub source_message: Option<String>,
}

impl CardDraft {
    /// Draft used when generation is unavailable: the message becomes the description
    pub fn fallback(message: &ChatMessage) -> Self {
        Self {
            title: String::new(),
            desc: message.text.clone(),
            column: FALLBACK_COLUMN.to_string(),
            priority: Priority::default(),
            assignee: FALLBACK_ASSIGNEE.to_string(),
            tags: String::new(),
            source_message: Some(message.message_id.clone()),
        }
    }

    pub fn from_generated(message: &ChatMessage, card: GeneratedCard) -> Self {
        Self {
            title: card.title.unwrap_or_default(),
            desc: card
                .desc
                .filter(|desc| !desc.is_empty())
                .unwrap_or_else(|| message.text.clone()),
            column: card.column.unwrap_or_else(|| FALLBACK_COLUMN.to_string()),
            priority: card.priority.unwrap_or_default(),
            assignee: card
                .assignee
                .unwrap_or_else(|| FALLBACK_ASSIGNEE.to_string()),
            tags: card.tags.join(", "),
            source_message: Some(message.message_id.clone()),
        }
    }

    /// Card submitted from the (possibly edited) draft
    pub fn to_new_card(&self) -> NewCard {
        NewCard {
            title: self.title.trim().to_string(),
            desc: Some(self.desc.trim().to_string()).filter(|desc| !desc.is_empty()),
            column: self.column.clone(),
            priority: Some(self.priority),
            assignee: Some(self.assignee.clone()).filter(|a| !a.is_empty()),
            tags: self
                .tags
                .split(',')
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(str::to_string)
                .collect(),
            link: None,
            date: None,
            source_messages: self.source_message.iter().cloned().collect(),
        }
    }
}

/// Asks the backend to draft a card from a chat message.
///
/// Polls at `settings.interval` for up to `settings.attempts` polls. Any
/// failure or timeout yields [`CardDraft::fallback`].
pub async fn generate_card_draft<A: BoardApi + ?Sized>(
    api: &A,
    message: &ChatMessage,
    surrounding: Vec<ChatMessage>,
    settings: GenerateSettings,
) -> CardDraft {
    let span = tracing::debug_span!("generate_card", message_id = %message.message_id);
    poll_for_draft(api, message, surrounding, settings)
        .instrument(span)
        .await
}

async fn poll_for_draft<A: BoardApi + ?Sized>(
    api: &A,
    message: &ChatMessage,
    surrounding: Vec<ChatMessage>,
    settings: GenerateSettings,
) -> CardDraft {
    let request = GenerateRequest {
        message_id: message.message_id.clone(),
        message_text: message.text.clone(),
        surrounding_messages: surrounding,
    };

    let ticket = match api.generate_card(&request).await {
        Ok(ticket) => ticket,
        Err(err) => {
            tracing::warn!(error = %err, "card generation request failed");
            return CardDraft::fallback(message);
        }
    };

    for attempt in 1..=settings.attempts {
        tokio::time::sleep(settings.interval).await;

        let poll = match api.poll_generate_card(&ticket.request_id).await {
            Ok(poll) => poll,
            Err(err) => {
                tracing::warn!(request_id = %ticket.request_id, error = %err, "card generation poll failed");
                return CardDraft::fallback(message);
            }
        };

        match poll.status {
            GenerateStatus::Pending => {
                tracing::trace!(request_id = %ticket.request_id, attempt, "card generation pending");
            }
            GenerateStatus::Done => {
                return match poll.card {
                    Some(card) => CardDraft::from_generated(message, card),
                    None => CardDraft::fallback(message),
                };
            }
            GenerateStatus::Failed => {
                tracing::debug!(request_id = %ticket.request_id, "card generation failed");
                return CardDraft::fallback(message);
            }
        }
    }

    tracing::debug!(
        request_id = %ticket.request_id,
        attempts = settings.attempts,
        "card generation timed out"
    );
    CardDraft::fallback(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MemoryBoardApi;

    fn message() -> ChatMessage {
        ChatMessage::new("42", "marko", "We should cache the file listing")
    }

    #[tokio::test(start_paused = true)]
    async fn test_generated_draft() {
        let api = MemoryBoardApi::default();
        api.queue_generated(
            GeneratedCard {
                title: Some("Cache file listing".to_string()),
                priority: Some(Priority::High),
                tags: vec!["infra".to_string(), "frontend".to_string()],
                ..Default::default()
            },
            3,
        )
        .await;

        let draft = generate_card_draft(&api, &message(), Vec::new(), GenerateSettings::default()).await;

        assert_eq!(draft.title, "Cache file listing");
        assert_eq!(draft.desc, "We should cache the file listing");
        assert_eq!(draft.column, "ideas");
        assert_eq!(draft.priority, Priority::High);
        assert_eq!(draft.tags, "infra, frontend");
        assert_eq!(api.calls("poll_generate_card").await, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_falls_back() {
        let api = MemoryBoardApi::default();
        let settings = GenerateSettings {
            attempts: 5,
            interval: Duration::from_millis(200),
        };

        let draft = generate_card_draft(&api, &message(), Vec::new(), settings).await;

        assert_eq!(draft, CardDraft::fallback(&message()));
        assert_eq!(api.calls("poll_generate_card").await, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_request_error_falls_back() {
        let api = MemoryBoardApi::default();
        api.fail("generate_card").await;

        let draft = generate_card_draft(&api, &message(), Vec::new(), GenerateSettings::default()).await;

        assert!(draft.title.is_empty());
        assert_eq!(draft.desc, "We should cache the file listing");
        assert_eq!(api.calls("poll_generate_card").await, 0);
    }

    #[test]
    fn test_draft_to_new_card() {
        let mut draft = CardDraft::fallback(&message());
        draft.title = "  Cache listing ".to_string();
        draft.tags = "infra, , ai ,".to_string();

        let card = draft.to_new_card();
        assert_eq!(card.title, "Cache listing");
        assert_eq!(card.tags, vec!["infra", "ai"]);
        assert_eq!(card.source_messages, vec!["42"]);
        assert_eq!(card.priority, Some(Priority::Med));
        assert_eq!(card.assignee.as_deref(), Some("both"));
    }
}
