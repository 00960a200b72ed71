//! Keyboard-navigable candidate list attached to a comment input.
//!
//! The controller is a small state machine (`Closed` / `Open`). It never owns
//! the text: it reads and writes through [`TextBuffer`]. Remote lookups are
//! tagged with a [`RequestToken`]; only the most recently issued token may
//! populate the list, so a slow response for an old query is dropped even if
//! it arrives after a newer one.

use crate::compose::attachments::AttachmentSet;
use crate::compose::candidate::{Candidate, CandidateList, LabelVocabulary, ResourceRef};
use crate::compose::trigger::{TriggerKind, TriggerMatch, TriggerSet};
use crate::domain::card::Comment;
use crate::error::Result;
use crate::search::ResourceSearch;

/// Host text input the controller edits through
pub trait TextBuffer {
    fn value(&self) -> &str;

    /// Caret position as a character offset
    fn caret(&self) -> usize;

    /// Replaces the whole value and moves the caret in one update
    fn set_value(&mut self, text: String, caret: usize);
}

/// Token identifying one issued lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestToken(u64);

/// A resource lookup the host must run and report back via
/// [`CandidateListController::apply_lookup`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    pub token: RequestToken,
    pub query: String,
}

/// Keys the candidate list reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Next,
    Previous,
    Commit,
    Cancel,
}

/// Whether a key was handled by the list or should fall through to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Consumed,
    Ignored,
}

#[derive(Debug, Clone)]
struct OpenList {
    trigger: TriggerMatch,
    candidates: CandidateList,
    selected: usize,
}

#[derive(Debug, Clone)]
enum ListState {
    Closed,
    Open(OpenList),
}

#[derive(Debug, Clone)]
pub struct CandidateListController {
    triggers: TriggerSet,
    labels: LabelVocabulary,
    state: ListState,
    issued: u64,
    latest: Option<RequestToken>,
}

impl Default for CandidateListController {
    fn default() -> Self {
        Self::new(TriggerSet::default(), LabelVocabulary::default())
    }
}

impl CandidateListController {
    pub fn new(triggers: TriggerSet, labels: LabelVocabulary) -> Self {
        Self {
            triggers,
            labels,
            state: ListState::Closed,
            issued: 0,
            latest: None,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ListState::Open(_))
    }

    /// Kind of the active trigger, if the list is open
    pub fn kind(&self) -> Option<TriggerKind> {
        self.open_list().map(|open| open.trigger.kind)
    }

    pub fn query(&self) -> Option<&str> {
        self.open_list().map(|open| open.trigger.query.as_str())
    }

    pub fn candidates(&self) -> &[Candidate] {
        self.open_list()
            .map(|open| open.candidates.items())
            .unwrap_or(&[])
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.open_list().map(|open| open.selected)
    }

    pub fn selected(&self) -> Option<&Candidate> {
        self.open_list()
            .and_then(|open| open.candidates.get(open.selected))
    }

    /// Whether the dropdown has anything to show
    pub fn is_visible(&self) -> bool {
        !self.candidates().is_empty()
    }

    fn open_list(&self) -> Option<&OpenList> {
        match &self.state {
            ListState::Open(open) => Some(open),
            ListState::Closed => None,
        }
    }

    fn issue_token(&mut self) -> RequestToken {
        self.issued += 1;
        let token = RequestToken(self.issued);
        self.latest = Some(token);
        token
    }

    /// Re-scans the buffer after a text change.
    ///
    /// Label triggers are resolved immediately. A resource trigger returns a
    /// [`LookupRequest`]; until its result is applied the list keeps the
    /// candidates it already showed for the same token. A token starting at
    /// another position opens with an empty list.
    pub fn on_input<B: TextBuffer + ?Sized>(&mut self, buffer: &B) -> Option<LookupRequest> {
        let Some(trigger) = self.triggers.scan(buffer.value(), buffer.caret()) else {
            if self.is_open() {
                tracing::trace!("trigger token closed");
            }
            self.close();
            return None;
        };

        match trigger.kind {
            TriggerKind::Label => {
                // A pending resource lookup can no longer apply.
                self.latest = None;
                let candidates = self.labels.filter(&trigger.query);
                tracing::trace!(
                    query = %trigger.query,
                    matches = candidates.len(),
                    "label candidates filtered"
                );
                self.state = ListState::Open(OpenList {
                    trigger,
                    candidates,
                    selected: 0,
                });
                None
            }
            TriggerKind::Resource => {
                let (candidates, selected) = match std::mem::replace(&mut self.state, ListState::Closed)
                {
                    ListState::Open(open)
                        if open.trigger.kind == TriggerKind::Resource
                            && open.trigger.start == trigger.start =>
                    {
                        (open.candidates, open.selected)
                    }
                    _ => (CandidateList::empty(TriggerKind::Resource), 0),
                };
                let token = self.issue_token();
                let query = trigger.query.clone();
                tracing::trace!(query = %query, token = token.0, "resource lookup issued");
                self.state = ListState::Open(OpenList {
                    trigger,
                    candidates,
                    selected,
                });
                Some(LookupRequest { token, query })
            }
        }
    }

    /// Applies the outcome of a resource lookup.
    ///
    /// Returns true when the result was applied. Results for superseded
    /// tokens, or arriving after the list closed, are discarded. A failed
    /// lookup closes the list without surfacing an error.
    pub fn apply_lookup(&mut self, token: RequestToken, result: Result<Vec<ResourceRef>>) -> bool {
        if self.latest != Some(token) {
            tracing::debug!(token = token.0, "discarding stale lookup result");
            return false;
        }

        let ListState::Open(open) = &mut self.state else {
            return false;
        };
        if open.trigger.kind != TriggerKind::Resource {
            return false;
        }

        self.latest = None;
        match result {
            Ok(files) => {
                open.candidates = CandidateList::from_resources(files);
                open.selected = 0;
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "resource lookup failed, closing candidate list");
                self.close();
                true
            }
        }
    }

    /// Scans the buffer and, for a resource trigger, runs the lookup inline
    pub async fn refresh<B, S>(&mut self, buffer: &B, search: &S)
    where
        B: TextBuffer + ?Sized,
        S: ResourceSearch + ?Sized,
    {
        if let Some(request) = self.on_input(buffer) {
            let result = search.search(&request.query).await;
            self.apply_lookup(request.token, result);
        }
    }

    /// Routes a navigation key to the list.
    ///
    /// Keys are only consumed while the list is open and has candidates, so
    /// Enter on an empty list still reaches the host (e.g. to submit).
    pub fn handle_key<B: TextBuffer + ?Sized>(
        &mut self,
        key: NavKey,
        buffer: &mut B,
        attachments: &mut AttachmentSet,
    ) -> KeyOutcome {
        let ListState::Open(open) = &mut self.state else {
            return KeyOutcome::Ignored;
        };
        if open.candidates.is_empty() {
            return KeyOutcome::Ignored;
        }

        match key {
            NavKey::Next => {
                open.selected = (open.selected + 1).min(open.candidates.len() - 1);
            }
            NavKey::Previous => {
                open.selected = open.selected.saturating_sub(1);
            }
            NavKey::Commit => {
                let index = open.selected;
                self.select(index, buffer, attachments);
            }
            NavKey::Cancel => self.close(),
        }
        KeyOutcome::Consumed
    }

    /// Commits the candidate at `index` (pointer selection or commit key).
    ///
    /// Removes the trigger token from the text, adds the attachment unless an
    /// equal reference is already present, and closes the list. Returns
    /// false when there is nothing to commit.
    pub fn select<B: TextBuffer + ?Sized>(
        &mut self,
        index: usize,
        buffer: &mut B,
        attachments: &mut AttachmentSet,
    ) -> bool {
        let Some((start, candidate)) = self
            .open_list()
            .and_then(|open| open.candidates.get(index).map(|c| (open.trigger.start, c.clone())))
        else {
            return false;
        };

        let (text, caret) = remove_span(buffer.value(), start, buffer.caret());
        buffer.set_value(text, caret);

        let added = attachments.insert(candidate.to_attachment());
        tracing::debug!(
            kind = %candidate.kind(),
            name = candidate.display_name(),
            added,
            "candidate committed"
        );

        self.close();
        true
    }

    /// Closes the list; any in-flight lookup becomes inert
    pub fn close(&mut self) {
        self.state = ListState::Closed;
        self.latest = None;
    }
}

/// Removes characters `[start, end)` and returns the new text and caret
fn remove_span(text: &str, start: usize, end: usize) -> (String, usize) {
    let end = end.max(start);
    let before: String = text.chars().take(start).collect();
    let after: String = text.chars().skip(end).collect();
    let caret = before.chars().count();
    (before + &after, caret)
}

/// Text and caret of a plain input element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextDraft {
    text: String,
    caret: usize,
}

impl TextDraft {
    pub fn new(text: impl Into<String>, caret: usize) -> Self {
        let mut draft = Self::default();
        draft.set_value(text.into(), caret);
        draft
    }
}

impl TextBuffer for TextDraft {
    fn value(&self) -> &str {
        &self.text
    }

    fn caret(&self) -> usize {
        self.caret
    }

    fn set_value(&mut self, text: String, caret: usize) {
        self.caret = caret.min(text.chars().count());
        self.text = text;
    }
}

/// Comment being composed: input text plus the attachments of one session
#[derive(Debug, Clone, Default)]
pub struct Composition {
    input: TextDraft,
    attachments: AttachmentSet,
}

impl Composition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a text change from the input element
    pub fn set_input(&mut self, text: impl Into<String>, caret: usize) {
        self.input.set_value(text.into(), caret);
    }

    pub fn input(&self) -> &TextDraft {
        &self.input
    }

    pub fn text(&self) -> &str {
        self.input.value()
    }

    pub fn attachments(&self) -> &AttachmentSet {
        &self.attachments
    }

    /// Borrows the input and the attachment set together, as the controller needs
    pub fn parts_mut(&mut self) -> (&mut TextDraft, &mut AttachmentSet) {
        (&mut self.input, &mut self.attachments)
    }

    /// Whether there is anything to post
    pub fn is_blank(&self) -> bool {
        self.text().trim().is_empty() && self.attachments.is_empty()
    }

    /// Builds the comment to post and resets the session.
    ///
    /// Returns `None` when the text is blank and nothing is attached.
    pub fn take_comment(&mut self, author: &str) -> Option<Comment> {
        if self.is_blank() {
            return None;
        }
        let comment = Comment::new(author, self.text().trim())
            .with_attachments(self.attachments.take_for_posting());
        self.input = TextDraft::default();
        Some(comment)
    }
}
