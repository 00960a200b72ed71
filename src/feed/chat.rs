//! Chat transcript timeline: filtering, dividers, reply quotes and triage
//! badges.

use crate::api::{ChatMessage, TriageAction, TriageEntry};
use crate::domain::CardId;
use crate::feed::format::truncate_chars;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Timeline display settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    /// Author whose messages carry triage badges
    pub human_author: String,
    pub body_limit: usize,
    pub quote_limit: usize,
    /// Gap after which a reply quotes the previous message
    pub quote_gap_secs: i64,
    /// Streak length after which a reply quotes the previous message
    pub quote_streak: usize,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            human_author: "marko".to_string(),
            body_limit: 300,
            quote_limit: 120,
            quote_gap_secs: 120,
            quote_streak: 3,
        }
    }
}

/// Which authors the timeline shows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthorFilter {
    #[default]
    All,
    Author(String),
}

impl AuthorFilter {
    pub fn author(name: &str) -> Self {
        Self::Author(name.to_lowercase())
    }

    pub fn matches(&self, message: &ChatMessage) -> bool {
        match self {
            Self::All => true,
            Self::Author(name) => message.author.to_lowercase() == *name,
        }
    }
}

/// Previous message quoted above a reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub author: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriageBadge {
    Created { card_id: Option<CardId>, title: String },
    Updated { card_id: Option<CardId>, title: String },
    Skipped { reason: Option<String> },
    /// Not triaged yet; the host offers "create card"
    Untriaged,
}

impl TriageBadge {
    fn from_entry(entry: &TriageEntry) -> Self {
        match entry.action {
            TriageAction::Created => Self::Created {
                card_id: entry.card_id.clone(),
                title: entry
                    .card_title
                    .clone()
                    .unwrap_or_else(|| "New card".to_string()),
            },
            TriageAction::Updated => Self::Updated {
                card_id: entry.card_id.clone(),
                title: entry.card_title.clone().unwrap_or_else(|| "card".to_string()),
            },
            TriageAction::Skipped | TriageAction::Other => Self::Skipped {
                reason: entry.reason.clone(),
            },
        }
    }
}

/// One rendered row of the timeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEntry {
    pub message_id: String,
    /// Lower-cased author
    pub author: String,
    pub is_human: bool,
    /// "Feb 3, 2026" when the calendar day changed since the previous row
    pub divider: Option<String>,
    /// "10:15 AM"
    pub time: Option<String>,
    pub body: String,
    pub quote: Option<Quote>,
    pub badge: Option<TriageBadge>,
}

fn day_label(sent_at: Option<DateTime<Utc>>) -> Option<String> {
    sent_at.map(|ts| ts.format("%b %-d, %Y").to_string())
}

fn millis(message: &ChatMessage) -> i64 {
    message.sent_at().map(|ts| ts.timestamp_millis()).unwrap_or(0)
}

/// Builds the timeline for the messages passing `filter`, in order.
///
/// Later triage entries for the same message replace earlier ones.
pub fn build_timeline(
    messages: &[ChatMessage],
    triage: &[TriageEntry],
    filter: &AuthorFilter,
    settings: &ChatSettings,
) -> Vec<TimelineEntry> {
    let triage: HashMap<&str, &TriageEntry> = triage
        .iter()
        .map(|entry| (entry.message_id.as_str(), entry))
        .collect();
    let shown: Vec<&ChatMessage> = messages.iter().filter(|m| filter.matches(m)).collect();
    let human = settings.human_author.to_lowercase();

    let mut entries = Vec::with_capacity(shown.len());
    let mut prev_day: Option<String> = None;

    for (idx, message) in shown.iter().enumerate() {
        let author = message.author_key();
        let is_human = author == human;
        let sent_at = message.sent_at();
        let day = day_label(sent_at);

        let divider = day.clone().filter(|d| prev_day.as_ref() != Some(d));
        prev_day = day;

        let quote = idx
            .checked_sub(1)
            .and_then(|prev_idx| reply_quote(&shown, prev_idx, message, &author, settings));

        let badge = (is_human && !message.message_id.is_empty()).then(|| {
            triage
                .get(message.message_id.as_str())
                .map(|entry| TriageBadge::from_entry(entry))
                .unwrap_or(TriageBadge::Untriaged)
        });

        entries.push(TimelineEntry {
            message_id: message.message_id.clone(),
            author,
            is_human,
            divider,
            time: sent_at.map(|ts| ts.format("%-I:%M %p").to_string()),
            body: truncate_chars(&message.text, settings.body_limit),
            quote,
            badge,
        });
    }

    entries
}

fn reply_quote(
    shown: &[&ChatMessage],
    prev_idx: usize,
    message: &ChatMessage,
    author: &str,
    settings: &ChatSettings,
) -> Option<Quote> {
    let prev = shown[prev_idx];
    let prev_author = prev.author_key();
    if prev_author == author || prev.text.is_empty() {
        return None;
    }

    let gap_ms = (millis(message) - millis(prev)).abs();
    let streak = shown[..=prev_idx]
        .iter()
        .rev()
        .take_while(|m| m.author_key() == prev_author)
        .count();

    if gap_ms > settings.quote_gap_secs * 1000 || streak >= settings.quote_streak {
        Some(Quote {
            author: prev_author,
            text: truncate_chars(&prev.text, settings.quote_limit).replace('\n', " "),
        })
    } else {
        None
    }
}

/// "12 messages", or "3 messages (3 of 12)" under an author filter
pub fn timeline_footer(shown: usize, total: usize, filter: &AuthorFilter) -> String {
    match filter {
        AuthorFilter::All => format!("{shown} messages · Live"),
        AuthorFilter::Author(_) => format!("{shown} messages ({shown} of {total}) · Live"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(id: &str, author: &str, text: &str, ts: &str) -> ChatMessage {
        ChatMessage::new(id, author, text).at(ts)
    }

    fn timeline(messages: &[ChatMessage], triage: &[TriageEntry]) -> Vec<TimelineEntry> {
        build_timeline(messages, triage, &AuthorFilter::All, &ChatSettings::default())
    }

    #[test]
    fn test_author_filter_is_case_insensitive() {
        let messages = vec![
            msg("1", "Marko", "hi", "2026-02-03T10:00:00Z"),
            msg("2", "tobbot", "hello", "2026-02-03T10:00:30Z"),
        ];

        let only = build_timeline(
            &messages,
            &[],
            &AuthorFilter::author("MARKO"),
            &ChatSettings::default(),
        );
        assert_eq!(only.len(), 1);
        assert_eq!(only[0].message_id, "1");
    }

    #[test]
    fn test_date_dividers() {
        let messages = vec![
            msg("1", "marko", "a", "2026-02-03T10:00:00Z"),
            msg("2", "tobbot", "b", "2026-02-03T23:59:00Z"),
            msg("3", "marko", "c", "2026-02-04T00:01:00Z"),
            ChatMessage::new("4", "tobbot", "d"),
        ];

        let rows = timeline(&messages, &[]);
        assert_eq!(rows[0].divider.as_deref(), Some("Feb 3, 2026"));
        assert_eq!(rows[1].divider, None);
        assert_eq!(rows[2].divider.as_deref(), Some("Feb 4, 2026"));
        assert_eq!(rows[3].divider, None);
        assert_eq!(rows[3].time, None);
        assert_eq!(rows[0].time.as_deref(), Some("10:00 AM"));
    }

    #[test]
    fn test_body_truncated() {
        let long = "x".repeat(301);
        let rows = timeline(&[msg("1", "tobbot", &long, "2026-02-03T10:00:00Z")], &[]);
        assert_eq!(rows[0].body.chars().count(), 303);
        assert!(rows[0].body.ends_with("..."));
    }

    #[test]
    fn test_quote_after_gap() {
        let messages = vec![
            msg("1", "marko", "line one\nline two", "2026-02-03T10:00:00Z"),
            msg("2", "tobbot", "quick", "2026-02-03T10:01:00Z"),
            msg("3", "marko", "later", "2026-02-03T10:05:00Z"),
        ];

        let rows = timeline(&messages, &[]);
        assert_eq!(rows[1].quote, None);
        assert_eq!(
            rows[2].quote,
            Some(Quote {
                author: "tobbot".to_string(),
                text: "quick".to_string(),
            })
        );

        let rows = timeline(&messages[..1], &[]);
        assert_eq!(rows[0].quote, None);
    }

    #[test]
    fn test_quote_after_streak() {
        let messages = vec![
            msg("1", "tobbot", "one", "2026-02-03T10:00:00Z"),
            msg("2", "tobbot", "two", "2026-02-03T10:00:10Z"),
            msg("3", "tobbot", "three\nlines", "2026-02-03T10:00:20Z"),
            msg("4", "marko", "ok", "2026-02-03T10:00:30Z"),
            msg("5", "marko", "more", "2026-02-03T10:00:40Z"),
        ];

        let rows = timeline(&messages, &[]);
        assert_eq!(rows[3].quote.as_ref().map(|q| q.text.as_str()), Some("three lines"));
        assert_eq!(rows[4].quote, None);
    }

    #[test]
    fn test_triage_badges_only_for_human() {
        let messages = vec![
            msg("1", "marko", "build it", "2026-02-03T10:00:00Z"),
            msg("2", "marko", "tweak it", "2026-02-03T10:00:05Z"),
            msg("3", "marko", "thanks", "2026-02-03T10:00:06Z"),
            msg("4", "marko", "new idea", "2026-02-03T10:00:07Z"),
            msg("5", "tobbot", "done", "2026-02-03T10:00:08Z"),
        ];
        let triage: Vec<TriageEntry> = serde_json::from_str(
            r#"[
                {"messageId":"1","action":"skipped"},
                {"messageId":"1","action":"created","cardId":"12"},
                {"messageId":"2","action":"updated","cardId":"3","cardTitle":"Login"},
                {"messageId":"3","action":"ignored","reason":"chit-chat"},
                {"messageId":"5","action":"created","cardId":"13"}
            ]"#,
        )
        .unwrap();

        let rows = timeline(&messages, &triage);
        assert_eq!(
            rows[0].badge,
            Some(TriageBadge::Created {
                card_id: Some(CardId::new("12")),
                title: "New card".to_string(),
            })
        );
        assert_eq!(
            rows[1].badge,
            Some(TriageBadge::Updated {
                card_id: Some(CardId::new("3")),
                title: "Login".to_string(),
            })
        );
        assert_eq!(
            rows[2].badge,
            Some(TriageBadge::Skipped {
                reason: Some("chit-chat".to_string()),
            })
        );
        assert_eq!(rows[3].badge, Some(TriageBadge::Untriaged));
        assert_eq!(rows[4].badge, None);
    }

    #[test]
    fn test_footer() {
        assert_eq!(timeline_footer(12, 12, &AuthorFilter::All), "12 messages · Live");
        assert_eq!(
            timeline_footer(3, 12, &AuthorFilter::author("tobbot")),
            "3 messages (3 of 12) · Live"
        );
    }
}
