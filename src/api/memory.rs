use crate::api::types::{
    Agent, ChatMessage, GeneratePoll, GenerateRequest, GenerateStatus, GenerateTicket,
    GeneratedCard, HistoryCommit, LogEntry, RestoreOutcome, TriageEntry,
};
use crate::api::BoardApi;
use crate::compose::candidate::ResourceRef;
use crate::domain::{Board, Card, CardId, Comment, Evidence, NewCard};
use crate::error::{PinboardError, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use tokio::sync::Mutex;

#[derive(Debug)]
struct Generation {
    polls_left: u32,
    card: Option<GeneratedCard>,
}

#[derive(Debug, Default)]
struct State {
    board: Board,
    messages: Vec<ChatMessage>,
    triage: Vec<TriageEntry>,
    agents: Vec<Agent>,
    history: Vec<HistoryCommit>,
    snapshots: HashMap<String, Board>,
    logs: Vec<LogEntry>,
    files: Vec<ResourceRef>,
    queued: Option<(u32, GeneratedCard)>,
    generations: HashMap<String, Generation>,
    generation_seq: u64,
    failing: HashSet<String>,
    calls: HashMap<String, usize>,
}

impl State {
    fn enter(&mut self, endpoint: &str) -> Result<()> {
        *self.calls.entry(endpoint.to_string()).or_default() += 1;
        if self.failing.contains(endpoint) {
            return Err(PinboardError::BackendError(format!("{endpoint} unavailable")));
        }
        Ok(())
    }

    fn card_mut(&mut self, id: &CardId) -> Result<&mut Card> {
        self.board
            .cards
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| PinboardError::CardNotFound(id.to_string()))
    }
}

/// In-process board backend.
///
/// Endpoints are named after the [`BoardApi`] method that serves them and
/// can be switched to failing with [`MemoryBoardApi::fail`].
#[derive(Debug, Default)]
pub struct MemoryBoardApi {
    state: Mutex<State>,
}

impl MemoryBoardApi {
    pub fn new(board: Board) -> Self {
        Self {
            state: Mutex::new(State {
                board,
                ..State::default()
            }),
        }
    }

    pub async fn board(&self) -> Board {
        self.state.lock().await.board.clone()
    }

    pub async fn set_files(&self, files: Vec<ResourceRef>) {
        self.state.lock().await.files = files;
    }

    pub async fn set_messages(&self, messages: Vec<ChatMessage>) {
        self.state.lock().await.messages = messages;
    }

    pub async fn set_agents(&self, agents: Vec<Agent>) {
        self.state.lock().await.agents = agents;
    }

    pub async fn set_logs(&self, logs: Vec<LogEntry>) {
        self.state.lock().await.logs = logs;
    }

    /// Records a commit (newest first) and the board it points at
    pub async fn push_history(&self, commit: HistoryCommit, snapshot: Board) {
        let mut state = self.state.lock().await;
        state.snapshots.insert(commit.hash.clone(), snapshot);
        state.history.insert(0, commit);
    }

    /// The next generation request completes with `card` after `polls` pending polls
    pub async fn queue_generated(&self, card: GeneratedCard, polls: u32) {
        self.state.lock().await.queued = Some((polls, card));
    }

    pub async fn fail(&self, endpoint: &str) {
        self.state.lock().await.failing.insert(endpoint.to_string());
    }

    pub async fn recover(&self, endpoint: &str) {
        self.state.lock().await.failing.remove(endpoint);
    }

    /// Number of calls an endpoint has received, failed ones included
    pub async fn calls(&self, endpoint: &str) -> usize {
        self.state
            .lock()
            .await
            .calls
            .get(endpoint)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl BoardApi for MemoryBoardApi {
    async fn fetch_board(&self) -> Result<Board> {
        let mut state = self.state.lock().await;
        state.enter("fetch_board")?;
        Ok(state.board.clone())
    }

    async fn add_card(&self, card: &NewCard) -> Result<Card> {
        let mut state = self.state.lock().await;
        state.enter("add_card")?;

        let next = state
            .board
            .cards
            .iter()
            .map(|c| c.id.ordinal())
            .max()
            .unwrap_or(0)
            + 1;

        let mut created = Card::new(CardId::new(next.to_string()), card.title.clone(), card.column.clone());
        created.desc = card.desc.clone();
        created.priority = card.priority;
        created.assignee = card.assignee.clone();
        created.tags = card.tags.clone();
        created.link = card.link.clone();
        created.date = card.date.clone();
        created.source_messages = card.source_messages.clone();

        state.board.cards.push(created.clone());
        Ok(created)
    }

    async fn move_card(&self, id: &CardId, column: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        state.enter("move_card")?;
        state.board.move_card(id, column)
    }

    async fn delete_card(&self, id: &CardId) -> Result<()> {
        let mut state = self.state.lock().await;
        state.enter("delete_card")?;
        state.board.remove_card(id).map(|_| ())
    }

    async fn post_comment(&self, id: &CardId, comment: &Comment) -> Result<Comment> {
        let mut state = self.state.lock().await;
        state.enter("post_comment")?;

        let mut stored = comment.clone();
        if stored.timestamp.is_none() {
            stored.timestamp = Some(Utc::now().to_rfc3339());
        }
        state.card_mut(id)?.comments.push(stored.clone());
        Ok(stored)
    }

    async fn upload_evidence(&self, id: &CardId, _image: &str, caption: &str) -> Result<Evidence> {
        let mut state = self.state.lock().await;
        state.enter("upload_evidence")?;

        let card = state.card_mut(id)?;
        let evidence = Evidence {
            url: format!("/evidence/{}-{}.png", id, card.evidence.len() + 1),
            caption: (!caption.is_empty()).then(|| caption.to_string()),
        };
        card.evidence.push(evidence.clone());
        Ok(evidence)
    }

    async fn fetch_messages(&self, ids: Option<&[String]>) -> Result<Vec<ChatMessage>> {
        let mut state = self.state.lock().await;
        state.enter("fetch_messages")?;
        Ok(match ids {
            Some(ids) => state
                .messages
                .iter()
                .filter(|m| ids.contains(&m.message_id))
                .cloned()
                .collect(),
            None => state.messages.clone(),
        })
    }

    async fn fetch_triage(&self) -> Result<Vec<TriageEntry>> {
        let mut state = self.state.lock().await;
        state.enter("fetch_triage")?;
        Ok(state.triage.clone())
    }

    async fn post_triage(&self, entry: &TriageEntry) -> Result<()> {
        let mut state = self.state.lock().await;
        state.enter("post_triage")?;
        match state
            .triage
            .iter_mut()
            .find(|t| t.message_id == entry.message_id)
        {
            Some(existing) => *existing = entry.clone(),
            None => state.triage.push(entry.clone()),
        }
        Ok(())
    }

    async fn fetch_agents(&self) -> Result<Vec<Agent>> {
        let mut state = self.state.lock().await;
        state.enter("fetch_agents")?;
        Ok(state.agents.clone())
    }

    async fn fetch_history(&self, limit: usize) -> Result<Vec<HistoryCommit>> {
        let mut state = self.state.lock().await;
        state.enter("fetch_history")?;
        Ok(state.history.iter().take(limit).cloned().collect())
    }

    async fn fetch_snapshot(&self, hash: &str) -> Result<Board> {
        let mut state = self.state.lock().await;
        state.enter("fetch_snapshot")?;
        state
            .snapshots
            .get(hash)
            .cloned()
            .ok_or_else(|| PinboardError::BackendError(format!("unknown commit {hash}")))
    }

    async fn restore_snapshot(&self, hash: &str) -> Result<RestoreOutcome> {
        let mut state = self.state.lock().await;
        state.enter("restore_snapshot")?;
        match state.snapshots.get(hash).cloned() {
            Some(board) => {
                state.board = board;
                Ok(RestoreOutcome { ok: true })
            }
            None => Ok(RestoreOutcome { ok: false }),
        }
    }

    async fn fetch_logs(&self) -> Result<Vec<LogEntry>> {
        let mut state = self.state.lock().await;
        state.enter("fetch_logs")?;
        Ok(state.logs.clone())
    }

    async fn search_files(&self, query: &str) -> Result<Vec<ResourceRef>> {
        let mut state = self.state.lock().await;
        state.enter("search_files")?;
        let query = query.to_lowercase();
        Ok(state
            .files
            .iter()
            .filter(|f| query.is_empty() || f.rel.to_lowercase().contains(&query))
            .cloned()
            .collect())
    }

    async fn generate_card(&self, _request: &GenerateRequest) -> Result<GenerateTicket> {
        let mut state = self.state.lock().await;
        state.enter("generate_card")?;

        state.generation_seq += 1;
        let request_id = format!("gen-{}", state.generation_seq);
        let generation = match state.queued.take() {
            Some((polls_left, card)) => Generation {
                polls_left,
                card: Some(card),
            },
            None => Generation {
                polls_left: 0,
                card: None,
            },
        };
        state.generations.insert(request_id.clone(), generation);
        Ok(GenerateTicket { request_id })
    }

    async fn poll_generate_card(&self, request_id: &str) -> Result<GeneratePoll> {
        let mut state = self.state.lock().await;
        state.enter("poll_generate_card")?;

        let generation = state
            .generations
            .get_mut(request_id)
            .ok_or_else(|| PinboardError::BackendError(format!("unknown request {request_id}")))?;

        if generation.card.is_none() || generation.polls_left > 0 {
            generation.polls_left = generation.polls_left.saturating_sub(1);
            return Ok(GeneratePoll {
                status: GenerateStatus::Pending,
                card: None,
            });
        }

        Ok(GeneratePoll {
            status: GenerateStatus::Done,
            card: generation.card.clone(),
        })
    }
}
