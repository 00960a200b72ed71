//! Resource directory: cards that point at resources plus loose workspace
//! files.

use crate::compose::candidate::ResourceRef;
use crate::domain::{Card, Priority};
use crate::feed::format::file_icon;
use std::collections::{BTreeMap, HashSet};

/// Column order of the directory listing; unknown columns sort last
pub const COLUMN_ORDER: [&str; 5] = ["progress", "review", "todo", "ideas", "done"];

const COMPLETED_COLUMN: &str = "done";
const IGNORED_NAMES: [&str; 2] = ["package-lock.json", "node_modules"];

pub fn column_weight(column: &str) -> usize {
    COLUMN_ORDER
        .iter()
        .position(|c| *c == column)
        .unwrap_or(COLUMN_ORDER.len())
}

/// One clickable resource under a card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLink {
    pub icon: &'static str,
    pub name: String,
    pub url: Option<String>,
    pub path: Option<String>,
}

/// Resources a card points at: its link first, then its files.
///
/// Files under `workspace_root` get a `/files/...` URL.
pub fn card_resources(card: &Card, workspace_root: &str) -> Vec<ResourceLink> {
    let mut links = Vec::with_capacity(card.files.len() + 1);

    if let Some(link) = &card.link {
        let name = link
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/');
        links.push(ResourceLink {
            icon: if link.contains("localhost") { "🌐" } else { "🔗" },
            name: name.to_string(),
            url: Some(link.clone()),
            path: None,
        });
    }

    for file in &card.files {
        let name = file.rsplit('/').next().unwrap_or(file);
        links.push(ResourceLink {
            icon: file_icon(name),
            name: name.to_string(),
            url: file
                .strip_prefix(workspace_root)
                .map(|rel| format!("/files/{rel}")),
            path: Some(file.clone()),
        });
    }

    links
}

/// Workspace files sharing a parent directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileGroup {
    /// Workspace-relative directory, `.` for the root
    pub dir: String,
    pub files: Vec<ResourceRef>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Directory {
    pub active: Vec<Card>,
    pub completed: Vec<Card>,
    /// Sorted by directory
    pub file_groups: Vec<FileGroup>,
}

impl Directory {
    /// Builds the listing from the board's cards and a workspace file search.
    ///
    /// `query` filters cards by title, link, files and tags. Workspace files
    /// are already filtered by the search that produced them.
    pub fn build(cards: &[Card], workspace_files: &[ResourceRef], query: &str) -> Self {
        let query = query.to_lowercase();

        let mut projects: Vec<&Card> = cards.iter().filter(|c| c.has_resources()).collect();
        projects.sort_by_key(|c| (column_weight(&c.column), Priority::rank_of(c.priority)));
        if !query.is_empty() {
            projects.retain(|c| matches_query(c, &query));
        }

        let (completed, active): (Vec<&Card>, Vec<&Card>) = projects
            .into_iter()
            .partition(|c| c.column == COMPLETED_COLUMN);

        let card_files: HashSet<&str> = cards
            .iter()
            .flat_map(|c| c.files.iter().map(String::as_str))
            .collect();

        let mut groups: BTreeMap<String, Vec<ResourceRef>> = BTreeMap::new();
        for file in workspace_files.iter().filter(|f| {
            !card_files.contains(f.path.as_str())
                && !f.name.starts_with('.')
                && !IGNORED_NAMES.contains(&f.name.as_str())
        }) {
            groups
                .entry(file.parent_dir().to_string())
                .or_default()
                .push(file.clone());
        }

        Self {
            active: active.into_iter().cloned().collect(),
            completed: completed.into_iter().cloned().collect(),
            file_groups: groups
                .into_iter()
                .map(|(dir, files)| FileGroup { dir, files })
                .collect(),
        }
    }

    pub fn project_count(&self) -> usize {
        self.active.len() + self.completed.len()
    }

    pub fn file_count(&self) -> usize {
        self.file_groups.iter().map(|g| g.files.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.project_count() == 0 && self.file_count() == 0
    }

    /// "3 projects · 1 file"; empty parts are left out
    pub fn footer(&self) -> String {
        let mut parts = Vec::with_capacity(2);
        let projects = self.project_count();
        if projects > 0 {
            parts.push(plural(projects, "project"));
        }
        let files = self.file_count();
        if files > 0 {
            parts.push(plural(files, "file"));
        }
        parts.join(" · ")
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

fn matches_query(card: &Card, query: &str) -> bool {
    card.title.to_lowercase().contains(query)
        || card
            .link
            .as_deref()
            .is_some_and(|link| link.to_lowercase().contains(query))
        || card.files.iter().any(|f| f.to_lowercase().contains(query))
        || card.tags.iter().any(|t| t.to_lowercase().contains(query))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CardId;

    fn cards() -> Vec<Card> {
        vec![
            Card::new(CardId::new("1"), "Landing page", "done").with_link("https://site.dev/"),
            Card::new(CardId::new("2"), "API docs", "todo").with_files(vec!["~/ws/docs/api.md".to_string()]),
            Card::new(CardId::new("3"), "Dashboard", "progress")
                .with_link("http://localhost:3000")
                .with_priority(Priority::Low),
            Card::new(CardId::new("4"), "Pipeline", "progress")
                .with_files(vec!["~/ws/ci.sh".to_string()])
                .with_priority(Priority::High)
                .with_tags(vec!["infra".to_string()]),
            Card::new(CardId::new("5"), "No resources", "progress"),
            Card::new(CardId::new("6"), "Archive", "someday").with_link("https://old.dev"),
        ]
    }

    fn titles(cards: &[Card]) -> Vec<&str> {
        cards.iter().map(|c| c.title.as_str()).collect()
    }

    #[test]
    fn test_ordering_and_split() {
        let dir = Directory::build(&cards(), &[], "");
        assert_eq!(titles(&dir.active), vec!["Pipeline", "Dashboard", "API docs", "Archive"]);
        assert_eq!(titles(&dir.completed), vec!["Landing page"]);
        assert_eq!(dir.footer(), "5 projects");
    }

    #[test]
    fn test_query_filter() {
        let dir = Directory::build(&cards(), &[], "INFRA");
        assert_eq!(titles(&dir.active), vec!["Pipeline"]);

        let dir = Directory::build(&cards(), &[], "api.md");
        assert_eq!(titles(&dir.active), vec!["API docs"]);

        let dir = Directory::build(&cards(), &[], "site.dev");
        assert!(dir.active.is_empty());
        assert_eq!(titles(&dir.completed), vec!["Landing page"]);
    }

    #[test]
    fn test_workspace_files_grouped() {
        let files = vec![
            ResourceRef::new("api.md", "~/ws/docs/api.md", "docs/api.md"),
            ResourceRef::new("guide.md", "~/ws/docs/guide.md", "docs/guide.md"),
            ResourceRef::new("README.md", "~/ws/README.md", "README.md"),
            ResourceRef::new(".env", "~/ws/.env", ".env"),
            ResourceRef::new("package-lock.json", "~/ws/package-lock.json", "package-lock.json"),
            ResourceRef::new("app.ts", "~/ws/src/app/app.ts", "src/app/app.ts"),
        ];

        let dir = Directory::build(&cards(), &files, "");
        let groups: Vec<(&str, usize)> = dir
            .file_groups
            .iter()
            .map(|g| (g.dir.as_str(), g.files.len()))
            .collect();
        assert_eq!(groups, vec![(".", 1), ("docs", 1), ("src/app", 1)]);
        assert_eq!(dir.footer(), "5 projects · 3 files");
    }

    #[test]
    fn test_empty_directory() {
        let dir = Directory::build(&[], &[], "");
        assert!(dir.is_empty());
        assert_eq!(dir.footer(), "");
    }

    #[test]
    fn test_card_resources() {
        let card = Card::new(CardId::new("9"), "Site", "todo")
            .with_link("http://localhost:8080/")
            .with_files(vec!["~/ws/site/index.html".to_string(), "/tmp/out.pdf".to_string()]);

        let links = card_resources(&card, "~/ws/");
        assert_eq!(links.len(), 3);
        assert_eq!(links[0].icon, "🌐");
        assert_eq!(links[0].name, "localhost:8080");
        assert_eq!(links[1].name, "index.html");
        assert_eq!(links[1].url.as_deref(), Some("/files/site/index.html"));
        assert_eq!(links[2].icon, "📕");
        assert_eq!(links[2].url, None);
    }
}
