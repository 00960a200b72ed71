use crate::compose::trigger::TriggerKind;
use crate::domain::card::{Attachment, AttachmentKind};
use serde::{Deserialize, Serialize};

/// A workspace file as returned by the resource search endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRef {
    pub name: String,
    pub path: String,
    /// URL the file is served from, when it is servable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servable: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ext: Option<String>,
    #[serde(default)]
    pub rel: String,
}

impl ResourceRef {
    pub fn new(name: impl Into<String>, path: impl Into<String>, rel: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            servable: None,
            ext: None,
            rel: rel.into(),
        }
    }

    /// Parent directory of the workspace-relative path, `.` for the root
    pub fn parent_dir(&self) -> &str {
        match self.rel.rfind('/') {
            Some(idx) => &self.rel[..idx],
            None => ".",
        }
    }
}

/// A selectable completion item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    Resource(ResourceRef),
    Label(String),
}

impl Candidate {
    pub fn display_name(&self) -> &str {
        match self {
            Self::Resource(file) => &file.name,
            Self::Label(name) => name,
        }
    }

    pub fn kind(&self) -> AttachmentKind {
        match self {
            Self::Resource(_) => AttachmentKind::Resource,
            Self::Label(_) => AttachmentKind::Label,
        }
    }

    /// Attachment committed when this candidate is selected
    pub fn to_attachment(&self) -> Attachment {
        match self {
            Self::Resource(file) => Attachment {
                kind: AttachmentKind::Resource,
                name: file.name.clone(),
                path: Some(file.path.clone()),
                url: file.servable.clone(),
                ext: file.ext.clone(),
                rel: Some(file.rel.clone()),
            },
            Self::Label(name) => Attachment::label(name.clone()),
        }
    }
}

/// Candidates of a single kind; lists are never mixed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateList {
    kind: TriggerKind,
    items: Vec<Candidate>,
}

impl CandidateList {
    pub fn empty(kind: TriggerKind) -> Self {
        Self {
            kind,
            items: Vec::new(),
        }
    }

    pub fn from_resources(files: Vec<ResourceRef>) -> Self {
        Self {
            kind: TriggerKind::Resource,
            items: files.into_iter().map(Candidate::Resource).collect(),
        }
    }

    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: TriggerKind::Label,
            items: labels
                .into_iter()
                .map(|l| Candidate::Label(l.into()))
                .collect(),
        }
    }

    pub fn kind(&self) -> TriggerKind {
        self.kind
    }

    pub fn items(&self) -> &[Candidate] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&Candidate> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The closed vocabulary of labels offered after the label trigger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelVocabulary(Vec<String>);

impl Default for LabelVocabulary {
    fn default() -> Self {
        Self::new(["infra", "frontend", "ai", "automation", "design", "product"])
    }
}

impl LabelVocabulary {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(labels.into_iter().map(Into::into).collect())
    }

    pub fn labels(&self) -> &[String] {
        &self.0
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.iter().any(|l| l.eq_ignore_ascii_case(label))
    }

    /// Labels containing `query` (case-insensitive), in vocabulary order.
    /// An empty query yields the whole vocabulary.
    pub fn filter(&self, query: &str) -> CandidateList {
        let query = query.to_lowercase();
        CandidateList::from_labels(
            self.0
                .iter()
                .filter(|label| query.is_empty() || label.to_lowercase().contains(&query))
                .cloned(),
        )
    }
}
