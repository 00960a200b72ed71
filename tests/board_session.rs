use pinboard_core::api::{BoardApi, ChatMessage, GeneratedCard, MemoryBoardApi, TriageAction};
use pinboard_core::domain::{order_cards, Board, BoardConfig, Card, CardId, NewCard, Priority, SortMode};
use pinboard_core::feed::{build_timeline, AuthorFilter, ChatSettings, TriageBadge};
use pinboard_core::session::{generate_card_draft, BoardSession, ColumnSort, GenerateSettings, Poller};
use pinboard_core::storage::{JsonSortPreferences, SortPreferenceStore};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::Mutex;

fn board() -> Board {
    Board::new(
        vec!["ideas".to_string(), "todo".to_string(), "done".to_string()],
        vec![
            Card::new(CardId::new("1"), "B", "todo")
                .with_priority(Priority::Low)
                .with_date("Feb 10"),
            Card::new(CardId::new("2"), "A", "todo")
                .with_priority(Priority::High)
                .with_date("Jan 30"),
            Card::new(CardId::new("3"), "c", "todo").with_date("Feb 10"),
        ],
    )
}

fn titles(cards: &[Card]) -> Vec<&str> {
    cards.iter().map(|c| c.title.as_str()).collect()
}

#[test]
fn priority_scenario() {
    let cards = vec![
        Card::new(CardId::new("1"), "B", "todo").with_priority(Priority::Low),
        Card::new(CardId::new("2"), "A", "todo").with_priority(Priority::High),
    ];
    assert_eq!(titles(&order_cards(&cards, SortMode::Priority)), vec!["A", "B"]);
    assert_eq!(titles(&cards), vec!["B", "A"]);
}

#[tokio::test]
async fn column_sort_survives_remount() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(JsonSortPreferences::new(temp_dir.path()));
    let config = BoardConfig::default();

    let api = Arc::new(MemoryBoardApi::new(board()));
    let mut session = BoardSession::new(api, config.clone());
    session.refresh().await.unwrap();
    let cards = session.board().cards_in("todo");

    let mut sort = ColumnSort::mount("todo", store.clone(), &config).await;
    assert_eq!(titles(&sort.apply(&cards)), vec!["B", "A", "c"]);

    sort.change(SortMode::Newest).await;
    assert_eq!(titles(&sort.apply(&cards)), vec!["c", "B", "A"]);

    let remounted = ColumnSort::mount("todo", store.clone(), &config).await;
    assert_eq!(remounted.mode(), SortMode::Newest);
    assert_eq!(store.get("done").await.unwrap(), None);

    let oldest = session.column_cards("todo", SortMode::Oldest);
    assert_eq!(titles(&oldest), vec!["A", "B", "c"]);
}

#[tokio::test(start_paused = true)]
async fn poller_picks_up_remote_changes() {
    let api = Arc::new(MemoryBoardApi::new(board()));
    let session = Arc::new(Mutex::new(BoardSession::new(api.clone(), BoardConfig::default())));

    let polled = session.clone();
    let poller = Poller::spawn(Duration::from_secs(5), move || {
        let session = polled.clone();
        async move {
            if let Err(err) = session.lock().await.refresh().await {
                tracing::warn!(error = %err, "board refresh failed");
            }
        }
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(session.lock().await.board().cards.len(), 3);

    api.add_card(&NewCard {
        title: "Remote".to_string(),
        column: "ideas".to_string(),
        ..Default::default()
    })
    .await
    .unwrap();

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(session.lock().await.board().cards.len(), 4);

    poller.stop();
}

#[tokio::test(start_paused = true)]
async fn chat_message_becomes_card_with_badge() {
    let api = Arc::new(MemoryBoardApi::new(board()));
    let message = ChatMessage::new("m-7", "Marko", "Cache the file listing").at("2026-02-11T09:30:00Z");
    api.set_messages(vec![message.clone()]).await;
    api.queue_generated(
        GeneratedCard {
            title: Some("Cache listing".to_string()),
            column: Some("todo".to_string()),
            ..Default::default()
        },
        1,
    )
    .await;

    let draft = generate_card_draft(api.as_ref(), &message, Vec::new(), GenerateSettings::default()).await;
    assert_eq!(draft.title, "Cache listing");

    let mut session = BoardSession::new(api.clone(), BoardConfig::default());
    session.refresh().await.unwrap();
    let created = session
        .add_card(draft.to_new_card(), draft.source_message.as_deref())
        .await
        .unwrap();
    assert_eq!(created.source_messages, vec!["m-7"]);
    assert!(created.date.is_some());

    let messages = api.fetch_messages(None).await.unwrap();
    let triage = api.fetch_triage().await.unwrap();
    assert_eq!(triage[0].action, TriageAction::Created);

    let rows = build_timeline(&messages, &triage, &AuthorFilter::All, &ChatSettings::default());
    assert_eq!(
        rows[0].badge,
        Some(TriageBadge::Created {
            card_id: Some(created.id.clone()),
            title: "Cache listing".to_string(),
        })
    );
}
