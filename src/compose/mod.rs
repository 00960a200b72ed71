//! Comment composition: inline `@`/`#` mentions and their candidate list.

pub mod attachments;
pub mod candidate;
pub mod controller;
pub mod trigger;

pub use attachments::AttachmentSet;
pub use candidate::{Candidate, CandidateList, LabelVocabulary, ResourceRef};
pub use controller::{
    CandidateListController, Composition, KeyOutcome, LookupRequest, NavKey, RequestToken,
    TextBuffer, TextDraft,
};
pub use trigger::{Trigger, TriggerKind, TriggerMatch, TriggerSet};
