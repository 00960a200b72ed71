//! Detection of an open mention token at the caret.
//!
//! Positions are character offsets into the text, the same unit a text
//! input reports for its caret.

use crate::domain::card::AttachmentKind;
use serde::{Deserialize, Serialize};

/// Candidate source a trigger symbol selects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerKind {
    /// Remote resource search (workspace files)
    Resource,
    /// Filter over the closed label vocabulary
    Label,
}

impl TriggerKind {
    pub fn attachment_kind(self) -> AttachmentKind {
        match self {
            Self::Resource => AttachmentKind::Resource,
            Self::Label => AttachmentKind::Label,
        }
    }
}

/// A trigger symbol and the kind it selects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    pub symbol: char,
    pub kind: TriggerKind,
}

impl Trigger {
    pub fn new(symbol: char, kind: TriggerKind) -> Self {
        Self { symbol, kind }
    }
}

/// Result of scanning text at a caret position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerMatch {
    pub kind: TriggerKind,
    pub symbol: char,
    /// Offset of the trigger symbol
    pub start: usize,
    /// Caret offset the scan ran from
    pub caret: usize,
    /// Lower-cased text between the symbol and the caret
    pub query: String,
}

/// The closed set of trigger symbols configured by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TriggerSet {
    triggers: Vec<Trigger>,
}

impl Default for TriggerSet {
    fn default() -> Self {
        Self::new(vec![
            Trigger::new('@', TriggerKind::Resource),
            Trigger::new('#', TriggerKind::Label),
        ])
    }
}

impl TriggerSet {
    /// Builds a set; a repeated symbol keeps its first kind
    pub fn new(triggers: Vec<Trigger>) -> Self {
        let mut unique: Vec<Trigger> = Vec::with_capacity(triggers.len());
        for trigger in triggers {
            if !unique.iter().any(|t| t.symbol == trigger.symbol) {
                unique.push(trigger);
            }
        }
        Self { triggers: unique }
    }

    pub fn kind_of(&self, symbol: char) -> Option<TriggerKind> {
        self.triggers
            .iter()
            .find(|t| t.symbol == symbol)
            .map(|t| t.kind)
    }

    pub fn symbol_for(&self, kind: TriggerKind) -> Option<char> {
        self.triggers.iter().find(|t| t.kind == kind).map(|t| t.symbol)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Trigger> {
        self.triggers.iter()
    }

    /// Finds the open trigger token ending at `caret`.
    ///
    /// Walks backward from the character before the caret. Whitespace closes
    /// the token (no match); the first trigger symbol found opens it. A caret
    /// past the end of the text is treated as the end.
    pub fn scan(&self, text: &str, caret: usize) -> Option<TriggerMatch> {
        let chars: Vec<char> = text.chars().collect();
        let caret = caret.min(chars.len());

        for idx in (0..caret).rev() {
            let c = chars[idx];
            if c.is_whitespace() {
                return None;
            }
            if let Some(kind) = self.kind_of(c) {
                let query: String = chars[idx + 1..caret].iter().collect();
                return Some(TriggerMatch {
                    kind,
                    symbol: c,
                    start: idx,
                    caret,
                    query: query.to_lowercase(),
                });
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(text: &str, caret: usize) -> Option<TriggerMatch> {
        TriggerSet::default().scan(text, caret)
    }

    #[test]
    fn test_resource_trigger_mid_text() {
        let m = scan("check @rep", 10).unwrap();
        assert_eq!(m.kind, TriggerKind::Resource);
        assert_eq!(m.start, 6);
        assert_eq!(m.query, "rep");
    }

    #[test]
    fn test_caret_past_end_is_clamped() {
        let m = scan("check @rep", 11).unwrap();
        assert_eq!(m.caret, 10);
        assert_eq!(m.query, "rep");
    }

    #[test]
    fn test_label_trigger_at_line_start() {
        let m = scan("#infra is done", 6).unwrap();
        assert_eq!(m.kind, TriggerKind::Label);
        assert_eq!(m.start, 0);
        assert_eq!(m.query, "infra");
    }

    #[test]
    fn test_query_is_lower_cased() {
        let m = scan("see @ReadMe", 11).unwrap();
        assert_eq!(m.query, "readme");
    }

    #[test]
    fn test_bare_trigger_has_empty_query() {
        let m = scan("hey @", 5).unwrap();
        assert_eq!(m.start, 4);
        assert_eq!(m.query, "");
    }

    #[test]
    fn test_whitespace_between_trigger_and_caret_closes_token() {
        assert!(scan("@rep is", 7).is_none());
        assert!(scan("#tag\nnext", 9).is_none());
        assert!(scan("@file\tx", 7).is_none());
    }

    #[test]
    fn test_no_trigger_cases() {
        assert!(scan("", 0).is_none());
        assert!(scan("@abc", 0).is_none());
        assert!(scan("plain", 5).is_none());
        assert!(scan("trailing ", 9).is_none());
    }

    #[test]
    fn test_nearest_trigger_wins() {
        let m = scan("a@b#c", 5).unwrap();
        assert_eq!(m.kind, TriggerKind::Label);
        assert_eq!(m.start, 3);
        assert_eq!(m.query, "c");
    }

    #[test]
    fn test_earlier_tokens_are_irrelevant() {
        let m = scan("@one #two and @thr", 18).unwrap();
        assert_eq!(m.kind, TriggerKind::Resource);
        assert_eq!(m.start, 14);
        assert_eq!(m.query, "thr");
    }

    #[test]
    fn test_offsets_are_characters_not_bytes() {
        let m = scan("née @fïl", 8).unwrap();
        assert_eq!(m.start, 4);
        assert_eq!(m.query, "fïl");
    }

    #[test]
    fn test_custom_trigger_set() {
        let set = TriggerSet::new(vec![
            Trigger::new('+', TriggerKind::Label),
            Trigger::new('+', TriggerKind::Resource),
        ]);

        assert_eq!(set.kind_of('+'), Some(TriggerKind::Label));
        assert!(set.scan("@x", 2).is_none());
        assert_eq!(set.scan("+x", 2).unwrap().kind, TriggerKind::Label);
        assert_eq!(set.symbol_for(TriggerKind::Resource), None);
    }

    #[test]
    fn test_every_prefix_inside_token_matches() {
        let text = "note @Build.RS";
        for caret in 6..=text.chars().count() {
            let m = scan(text, caret).unwrap();
            let expected: String = text.chars().skip(6).take(caret - 6).collect();
            assert_eq!(m.query, expected.to_lowercase());
        }
    }
}
