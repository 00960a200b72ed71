//! Records exchanged with the board backend.

use crate::domain::card::{CardId, Priority};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A message from the chat transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub message_id: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl ChatMessage {
    pub fn new(
        message_id: impl Into<String>,
        author: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            message_id: message_id.into(),
            author: author.into(),
            text: text.into(),
            timestamp: None,
        }
    }

    pub fn at(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Parsed RFC 3339 timestamp; `None` when absent or malformed
    pub fn sent_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp
            .as_deref()
            .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
            .map(|ts| ts.with_timezone(&Utc))
    }

    /// Lower-cased author, `unknown` when the transcript has none
    pub fn author_key(&self) -> String {
        if self.author.is_empty() {
            "unknown".to_string()
        } else {
            self.author.to_lowercase()
        }
    }
}

/// What the triage agent decided for a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriageAction {
    Created,
    Updated,
    Skipped,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriageEntry {
    pub message_id: String,
    pub action: TriageAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_id: Option<CardId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl TriageEntry {
    /// Entry recorded when a card is created from a chat message
    pub fn created(message_id: impl Into<String>, card_id: CardId, card_title: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
            action: TriageAction::Created,
            card_id: Some(card_id),
            card_title: Some(card_title.into()),
            reason: None,
        }
    }
}

/// A background agent shown in the agents panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    #[serde(default)]
    pub emoji: String,
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub desc: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_active: Option<String>,
    /// Free-form counters; values are numbers or strings
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub stats: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Removed,
    Moved,
    #[serde(other)]
    Edited,
}

/// One card-level change inside a history commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardChange {
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    pub card: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

impl BoardChange {
    pub fn label(&self) -> String {
        match self.kind {
            ChangeKind::Moved => format!("{} → {}", self.card, self.to.as_deref().unwrap_or("?")),
            ChangeKind::Added => format!("+ {}", self.card),
            ChangeKind::Removed => format!("− {}", self.card),
            ChangeKind::Edited => format!("✎ {}", self.card),
        }
    }
}

/// Number of change labels shown per commit before collapsing
pub const VISIBLE_CHANGES: usize = 4;

/// A commit in the board history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryCommit {
    pub hash: String,
    #[serde(default)]
    pub short: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub date: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<BoardChange>,
}

impl HistoryCommit {
    /// Labels of the visible changes and the count of hidden ones
    pub fn change_summary(&self) -> (Vec<String>, usize) {
        let labels = self
            .changes
            .iter()
            .take(VISIBLE_CHANGES)
            .map(BoardChange::label)
            .collect();
        (labels, self.changes.len().saturating_sub(VISIBLE_CHANGES))
    }
}

/// An external API call made by the assistant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_size_bytes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_file: Option<String>,
}

impl LogEntry {
    /// "2.4s"; `None` for a missing or zero duration
    pub fn duration_label(&self) -> Option<String> {
        self.duration_ms
            .filter(|ms| *ms > 0)
            .map(|ms| format!("{:.1}s", ms as f64 / 1000.0))
    }

    /// "1.5MB"; `None` for a missing or zero size
    pub fn size_label(&self) -> Option<String> {
        self.image_size_bytes
            .filter(|bytes| *bytes > 0)
            .map(|bytes| format!("{:.1}MB", bytes as f64 / 1024.0 / 1024.0))
    }

    /// Body line of the entry
    pub fn detail(&self) -> &str {
        self.prompt
            .as_deref()
            .or(self.error.as_deref())
            .unwrap_or("(no prompt)")
    }
}

/// Body of a card generation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub message_id: String,
    pub message_text: String,
    #[serde(default)]
    pub surrounding_messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTicket {
    pub request_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerateStatus {
    Pending,
    Done,
    #[serde(other)]
    Failed,
}

/// Partial card produced by the generator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratedCard {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub column: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratePoll {
    pub status: GenerateStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<GeneratedCard>,
}

/// Result of restoring a history snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoreOutcome {
    pub ok: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_message_from_json() {
        let json = r#"{"messageId":"41","author":"Marko","text":"ship it","timestamp":"2026-02-03T10:15:00Z"}"#;
        let msg: ChatMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.message_id, "41");
        assert_eq!(msg.author_key(), "marko");
        assert_eq!(msg.sent_at().unwrap().to_rfc3339(), "2026-02-03T10:15:00+00:00");
    }

    #[test]
    fn test_chat_message_bad_timestamp() {
        let msg = ChatMessage::new("1", "", "hi").at("yesterday");
        assert!(msg.sent_at().is_none());
        assert_eq!(msg.author_key(), "unknown");
    }

    #[test]
    fn test_unknown_triage_action() {
        let json = r#"{"messageId":"7","action":"ignored","reason":"chit-chat"}"#;
        let entry: TriageEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.action, TriageAction::Other);
        assert_eq!(entry.reason.as_deref(), Some("chit-chat"));
    }

    #[test]
    fn test_created_triage_serializes_camel_case() {
        let entry = TriageEntry::created("9", CardId::new("12"), "Fix login");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["messageId"], "9");
        assert_eq!(json["action"], "created");
        assert_eq!(json["cardId"], "12");
        assert!(json.get("reason").is_none());
    }

    #[test]
    fn test_agent_stats_keep_mixed_values() {
        let json = r#"{"emoji":"📋","name":"Board Manager","type":"sub-agent","stats":{"triaged":14,"last":"ok"},"lastActive":"2m"}"#;
        let agent: Agent = serde_json::from_str(json).unwrap();
        assert_eq!(agent.kind, "sub-agent");
        assert_eq!(agent.stats["triaged"], 14);
        assert_eq!(agent.stats["last"], "ok");
        assert_eq!(agent.last_active.as_deref(), Some("2m"));
    }

    #[test]
    fn test_history_change_summary() {
        let json = r#"{"hash":"abc123","short":"abc","message":"sync","date":"2026-02-03","changes":[
            {"type":"moved","card":"Login","to":"done"},
            {"type":"added","card":"Docs"},
            {"type":"removed","card":"Old"},
            {"type":"edited","card":"Plan"},
            {"type":"renamed","card":"Misc"},
            {"type":"added","card":"Extra"}
        ]}"#;
        let commit: HistoryCommit = serde_json::from_str(json).unwrap();
        let (labels, hidden) = commit.change_summary();
        assert_eq!(labels, vec!["Login → done", "+ Docs", "− Old", "✎ Plan"]);
        assert_eq!(hidden, 2);
    }

    #[test]
    fn test_log_entry_labels() {
        let entry = LogEntry {
            duration_ms: Some(2460),
            image_size_bytes: Some(1_572_864),
            error: Some("rate limited".to_string()),
            ..Default::default()
        };
        assert_eq!(entry.duration_label().as_deref(), Some("2.5s"));
        assert_eq!(entry.size_label().as_deref(), Some("1.5MB"));
        assert_eq!(entry.detail(), "rate limited");

        let empty = LogEntry::default();
        assert!(empty.duration_label().is_none());
        assert!(empty.size_label().is_none());
        assert_eq!(empty.detail(), "(no prompt)");
    }

    #[test]
    fn test_generate_poll_pending_has_no_card() {
        let poll: GeneratePoll = serde_json::from_str(r#"{"status":"pending"}"#).unwrap();
        assert_eq!(poll.status, GenerateStatus::Pending);
        assert!(poll.card.is_none());

        let poll: GeneratePoll =
            serde_json::from_str(r#"{"status":"done","card":{"title":"T","priority":"high","tags":["ai"]}}"#).unwrap();
        let card = poll.card.unwrap();
        assert_eq!(card.priority, Some(Priority::High));
        assert_eq!(card.tags, vec!["ai"]);
    }
}
