use crate::domain::card::{Card, Priority};
use crate::error::PinboardError;
use chrono::NaiveDate;
use icu_collator::{Collator, CollatorOptions, Strength};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Year assumed for display dates that carry none ("Feb 3")
pub const DEFAULT_IMPLICIT_YEAR: i32 = 2026;

/// Sort modes offered per board column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Caller-controlled order, returned unchanged
    #[default]
    Default,
    Priority,
    Newest,
    Oldest,
    Alpha,
}

impl SortMode {
    pub const ALL: [SortMode; 5] = [
        SortMode::Default,
        SortMode::Priority,
        SortMode::Newest,
        SortMode::Oldest,
        SortMode::Alpha,
    ];

    /// Parses a persisted or user-supplied key; unknown keys behave as `Default`
    pub fn from_key(key: &str) -> Self {
        key.parse().unwrap_or_default()
    }

    pub fn as_key(self) -> &'static str {
        match self {
            SortMode::Default => "default",
            SortMode::Priority => "priority",
            SortMode::Newest => "newest",
            SortMode::Oldest => "oldest",
            SortMode::Alpha => "alpha",
        }
    }

    /// Label shown in the column sort selector
    pub fn label(self) -> &'static str {
        match self {
            SortMode::Default => "Default",
            SortMode::Priority => "Priority ↑",
            SortMode::Newest => "Newest first",
            SortMode::Oldest => "Oldest first",
            SortMode::Alpha => "A → Z",
        }
    }
}

impl FromStr for SortMode {
    type Err = PinboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "default" => Ok(SortMode::Default),
            "priority" => Ok(SortMode::Priority),
            "newest" => Ok(SortMode::Newest),
            "oldest" => Ok(SortMode::Oldest),
            "alpha" => Ok(SortMode::Alpha),
            _ => Err(PinboardError::InvalidSortMode(s.to_string())),
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_key())
    }
}

/// Orders cards for display using the default implicit year
///
/// Returns a new sequence; the input is never mutated. The sort is stable.
///
/// # Examples
/// ```
/// use pinboard_core::domain::card::{Card, CardId, Priority};
/// use pinboard_core::domain::sorting::{order_cards, SortMode};
///
/// let cards = vec![
///     Card::new(CardId::new("1"), "B", "todo").with_priority(Priority::Low),
///     Card::new(CardId::new("2"), "A", "todo").with_priority(Priority::High),
/// ];
///
/// let ordered = order_cards(&cards, SortMode::Priority);
/// assert_eq!(ordered[0].title, "A");
/// ```
pub fn order_cards(cards: &[Card], mode: SortMode) -> Vec<Card> {
    order_cards_in_year(cards, mode, DEFAULT_IMPLICIT_YEAR)
}

/// Orders cards, resolving year-less display dates against `implicit_year`
pub fn order_cards_in_year(cards: &[Card], mode: SortMode, implicit_year: i32) -> Vec<Card> {
    let mut sorted = cards.to_vec();

    match mode {
        SortMode::Default => {}
        SortMode::Priority => sorted.sort_by(compare_priority),
        SortMode::Newest => sorted.sort_by(|a, b| {
            date_value(b.date.as_deref(), implicit_year)
                .cmp(&date_value(a.date.as_deref(), implicit_year))
                .then_with(|| b.id.ordinal().cmp(&a.id.ordinal()))
        }),
        SortMode::Oldest => sorted.sort_by(|a, b| {
            date_value(a.date.as_deref(), implicit_year)
                .cmp(&date_value(b.date.as_deref(), implicit_year))
                .then_with(|| a.id.ordinal().cmp(&b.id.ordinal()))
        }),
        SortMode::Alpha => {
            let collator = title_collator();
            sorted.sort_by(|a, b| compare_titles_with(collator.as_ref(), &a.title, &b.title))
        }
    }

    sorted
}

/// Compare by priority rank, absent priority ranks as `Med`
fn compare_priority(a: &Card, b: &Card) -> Ordering {
    Priority::rank_of(a.priority).cmp(&Priority::rank_of(b.priority))
}

/// Root-locale collator that ignores case but not accents
fn title_collator() -> Option<Collator> {
    let mut options = CollatorOptions::new();
    options.strength = Some(Strength::Secondary);
    match Collator::try_new(&Default::default(), options) {
        Ok(collator) => Some(collator),
        Err(err) => {
            tracing::warn!(error = %err, "title collator unavailable, comparing code points");
            None
        }
    }
}

/// Locale-aware, case-insensitive title comparison
///
/// Titles that collate equal fall back to their exact text so the order is
/// total.
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    compare_titles_with(title_collator().as_ref(), a, b)
}

fn compare_titles_with(collator: Option<&Collator>, a: &str, b: &str) -> Ordering {
    let primary = match collator {
        Some(collator) => collator.compare(a, b),
        None => a.to_lowercase().cmp(&b.to_lowercase()),
    };
    primary.then_with(|| a.cmp(b))
}

/// Sortable value of a free-text display date, in milliseconds since the epoch
///
/// Dates with an explicit year are parsed as-is; "Feb 3" style dates get
/// `implicit_year` appended. Missing or unparsable dates are 0.
pub fn date_value(date: Option<&str>, implicit_year: i32) -> i64 {
    let Some(raw) = date.map(str::trim).filter(|d| !d.is_empty()) else {
        return 0;
    };

    parse_display_date(raw, implicit_year)
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
        .unwrap_or(0)
}

fn parse_display_date(raw: &str, implicit_year: i32) -> Option<NaiveDate> {
    const WITH_YEAR: [&str; 4] = ["%B %d, %Y", "%B %d %Y", "%Y-%m-%d", "%d %B %Y"];
    const WITHOUT_YEAR: [&str; 2] = ["%B %d %Y", "%d %B %Y"];

    if let Some(day) = WITH_YEAR
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
    {
        return Some(day);
    }

    let with_year = format!("{} {}", raw, implicit_year);
    WITHOUT_YEAR
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&with_year, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::card::CardId;

    fn card(id: &str, title: &str) -> Card {
        Card::new(CardId::new(id), title, "todo")
    }

    fn titles(cards: &[Card]) -> Vec<&str> {
        cards.iter().map(|c| c.title.as_str()).collect()
    }

    #[test]
    fn test_default_is_identity() {
        let cards = vec![card("3", "C"), card("1", "A"), card("2", "B")];

        let ordered = order_cards(&cards, SortMode::Default);

        assert_eq!(ordered, cards);
    }

    #[test]
    fn test_default_after_sort_keeps_sorted_sequence() {
        let cards = vec![card("3", "charlie"), card("1", "Alpha"), card("2", "bravo")];

        let first = order_cards(&cards, SortMode::Alpha);
        let second = order_cards(&first, SortMode::Default);

        assert_eq!(first, second);
    }

    #[test]
    fn test_priority_orders_high_first() {
        let cards = vec![
            card("1", "B").with_priority(Priority::Low),
            card("2", "A").with_priority(Priority::High),
        ];

        let ordered = order_cards(&cards, SortMode::Priority);

        assert_eq!(titles(&ordered), vec!["A", "B"]);
    }

    #[test]
    fn test_priority_absent_is_med_and_stable() {
        let cards = vec![
            card("1", "low").with_priority(Priority::Low),
            card("2", "none-1"),
            card("3", "med").with_priority(Priority::Med),
            card("4", "none-2"),
            card("5", "high").with_priority(Priority::High),
        ];

        let ordered = order_cards(&cards, SortMode::Priority);

        assert_eq!(titles(&ordered), vec!["high", "none-1", "med", "none-2", "low"]);
        for pair in ordered.windows(2) {
            assert!(Priority::rank_of(pair[0].priority) <= Priority::rank_of(pair[1].priority));
        }
    }

    #[test]
    fn test_newest_by_date_then_ordinal() {
        let cards = vec![
            card("1", "jan").with_date("Jan 5"),
            card("2", "feb-a").with_date("Feb 3"),
            card("10", "feb-b").with_date("Feb 3"),
            card("4", "undated"),
        ];

        let ordered = order_cards(&cards, SortMode::Newest);

        assert_eq!(titles(&ordered), vec!["feb-b", "feb-a", "jan", "undated"]);
    }

    #[test]
    fn test_oldest_by_date_then_ordinal() {
        let cards = vec![
            card("10", "feb-b").with_date("Feb 3"),
            card("2", "feb-a").with_date("Feb 3"),
            card("1", "jan").with_date("Jan 5"),
            card("4", "garbage").with_date("someday"),
        ];

        let ordered = order_cards(&cards, SortMode::Oldest);

        assert_eq!(titles(&ordered), vec!["garbage", "jan", "feb-a", "feb-b"]);
    }

    #[test]
    fn test_alpha_is_case_insensitive() {
        let cards = vec![card("1", "zebra"), card("2", "Apple"), card("3", "BANANA")];

        let ordered = order_cards(&cards, SortMode::Alpha);

        assert_eq!(titles(&ordered), vec!["Apple", "BANANA", "zebra"]);
        for pair in ordered.windows(2) {
            assert!(pair[0].title.to_lowercase() <= pair[1].title.to_lowercase());
        }
    }

    #[test]
    fn test_alpha_collates_accented_titles() {
        let cards = vec![card("1", "Zebra"), card("2", "Éclair"), card("3", "apple")];

        let ordered = order_cards(&cards, SortMode::Alpha);

        assert_eq!(titles(&ordered), vec!["apple", "Éclair", "Zebra"]);
    }

    #[test]
    fn test_compare_titles_ties_on_exact_text() {
        assert_eq!(compare_titles("alpha", "alpha"), Ordering::Equal);
        assert_ne!(compare_titles("Alpha", "alpha"), Ordering::Equal);
        assert_eq!(compare_titles("ecole", "éclair"), Ordering::Greater);
    }

    #[test]
    fn test_order_does_not_mutate_input() {
        let cards = vec![card("2", "B"), card("1", "A")];
        let before = cards.clone();

        let _ = order_cards(&cards, SortMode::Alpha);

        assert_eq!(cards, before);
    }

    #[test]
    fn test_date_value_parsing() {
        let feb3 = date_value(Some("Feb 3"), 2026);
        let feb3_full = date_value(Some("February 3"), 2026);
        let feb3_explicit = date_value(Some("Feb 3, 2026"), 2026);
        let feb3_iso = date_value(Some("2026-02-03"), 2026);

        assert!(feb3 > 0);
        assert_eq!(feb3, feb3_full);
        assert_eq!(feb3, feb3_explicit);
        assert_eq!(feb3, feb3_iso);
        assert!(date_value(Some("Feb 4"), 2026) > feb3);
    }

    #[test]
    fn test_date_value_unparsable_is_zero() {
        assert_eq!(date_value(None, 2026), 0);
        assert_eq!(date_value(Some(""), 2026), 0);
        assert_eq!(date_value(Some("soon"), 2026), 0);
        assert_eq!(date_value(Some("Feb 30"), 2026), 0);
    }

    #[test]
    fn test_implicit_year_applies_to_yearless_dates() {
        let in_2025 = date_value(Some("Dec 31"), 2025);
        let in_2026 = date_value(Some("Jan 1"), 2026);
        assert!(in_2025 < in_2026);
        assert!(date_value(Some("Dec 31"), 2026) > date_value(Some("Jan 1"), 2026));
    }

    #[test]
    fn test_sort_mode_keys() {
        assert_eq!(SortMode::from_key("newest"), SortMode::Newest);
        assert_eq!(SortMode::from_key("ALPHA"), SortMode::Alpha);
        assert_eq!(SortMode::from_key("shuffle"), SortMode::Default);
        assert!("shuffle".parse::<SortMode>().is_err());

        for mode in SortMode::ALL {
            assert_eq!(SortMode::from_key(mode.as_key()), mode);
        }
    }
}
