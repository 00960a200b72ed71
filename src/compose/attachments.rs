use crate::domain::card::Attachment;

/// Attachments collected while composing one comment.
///
/// No two entries share the same (kind, name) pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachmentSet {
    items: Vec<Attachment>,
}

impl AttachmentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an attachment; returns false (and changes nothing) for a duplicate
    pub fn insert(&mut self, attachment: Attachment) -> bool {
        if self.items.iter().any(|a| a.same_reference(&attachment)) {
            return false;
        }
        self.items.push(attachment);
        true
    }

    /// Removes the attachment at `index` (the chip's remove button)
    pub fn remove(&mut self, index: usize) -> Option<Attachment> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    pub fn as_slice(&self) -> &[Attachment] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Drains the set into the list sent with a comment
    pub fn take_for_posting(&mut self) -> Vec<Attachment> {
        std::mem::take(&mut self.items)
            .iter()
            .map(Attachment::for_posting)
            .collect()
    }
}
