use std::path::PathBuf;

use anyhow::bail;
use anyhow::Result;
use mockito::Matcher;
use tempfile::TempDir;
use tokio::sync::mpsc;

use super::ActionsService;
use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::models::ExchangeId;
use crate::domain::models::PanelSize;
use crate::domain::models::QueryOutcome;
use crate::domain::models::QueryRequest;
use crate::domain::services::SessionStore;
use crate::domain::services::USER_TOKEN_KEY;
use crate::infrastructure::transport::http::HttpTransport;

/// Runs the worker over the given actions until they are all handled.
async fn run_actions(url: &str, store_path: PathBuf, actions: Vec<Action>) -> Result<Vec<Event>> {
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    for action in actions {
        action_tx.send(action)?;
    }
    drop(action_tx);

    ActionsService::start(
        Box::new(HttpTransport::new(url)),
        SessionStore::new(store_path),
        event_tx,
        &mut action_rx,
    )
    .await?;

    // Spawned requests hold a sender until they finish.
    let mut events = vec![];
    while let Some(event) = event_rx.recv().await {
        events.push(event);
    }

    return Ok(events);
}

#[tokio::test]
async fn it_resolves_a_query() -> Result<()> {
    let dir = TempDir::new()?;
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/query")
        .match_header("authorization", Matcher::Missing)
        .with_status(404)
        .with_body(r#"{"error":"No answer found"}"#)
        .create_async()
        .await;

    let events = run_actions(
        &server.url(),
        dir.path().join("storage.json"),
        vec![Action::SubmitQuery(QueryRequest {
            id: ExchangeId(3),
            question: "What is the library timing?".to_string(),
            token: None,
        })],
    )
    .await?;

    assert_eq!(events.len(), 1);
    match &events[0] {
        Event::QueryResolved(id, outcome) => {
            assert_eq!(*id, ExchangeId(3));
            assert_eq!(outcome, &QueryOutcome::NotFound);
        }
        _ => bail!("Expected a resolved query"),
    }
    mock.assert_async().await;
    return Ok(());
}

#[tokio::test]
async fn it_loads_history() -> Result<()> {
    let dir = TempDir::new()?;
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/chat-history")
        .match_header("authorization", "Bearer user-token")
        .with_status(200)
        .with_body(
            r#"{"history":[{"_id":"h1","question":"Hi","answer":"Hello","timestamp":"2024-03-01T10:00:00"}]}"#,
        )
        .create_async()
        .await;

    let events = run_actions(
        &server.url(),
        dir.path().join("storage.json"),
        vec![Action::FetchHistory("user-token".to_string())],
    )
    .await?;

    match &events[0] {
        Event::HistoryLoaded(records) => {
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].id, "h1");
        }
        _ => bail!("Expected loaded history"),
    }
    return Ok(());
}

#[tokio::test]
async fn it_reports_history_failures() -> Result<()> {
    let dir = TempDir::new()?;
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/chat-history")
        .with_status(500)
        .create_async()
        .await;

    let events = run_actions(
        &server.url(),
        dir.path().join("storage.json"),
        vec![Action::FetchHistory("user-token".to_string())],
    )
    .await?;

    assert!(matches!(events[0], Event::HistoryFailed(_)));
    return Ok(());
}

#[tokio::test]
async fn it_persists_size_and_logout() -> Result<()> {
    let dir = TempDir::new()?;
    let store = SessionStore::new(dir.path().join("storage.json"));
    store.set(USER_TOKEN_KEY, "user-token").await?;

    let events = run_actions(
        "http://127.0.0.1:9",
        dir.path().join("storage.json"),
        vec![
            Action::SavePanelSize(PanelSize {
                width: 55,
                height: 60,
            }),
            Action::Logout(),
        ],
    )
    .await?;

    assert!(events.is_empty());
    assert_eq!(
        store.panel_size().await?,
        PanelSize {
            width: 55,
            height: 60
        }
    );
    assert!(!store.session().await?.is_logged_in());
    return Ok(());
}

#[tokio::test]
async fn it_reports_store_failures_and_keeps_running() -> Result<()> {
    let dir = TempDir::new()?;

    // A directory can't be read or written as the store file.
    let events = run_actions(
        "http://127.0.0.1:9",
        dir.path().to_path_buf(),
        vec![
            Action::Logout(),
            Action::SavePanelSize(PanelSize {
                width: 55,
                height: 60,
            }),
        ],
    )
    .await?;

    assert_eq!(events.len(), 2);
    match &events[0] {
        Event::WorkerError(err) => assert!(err.starts_with("Unable to log out")),
        _ => bail!("Expected a worker error for the logout"),
    }
    match &events[1] {
        Event::WorkerError(err) => assert!(err.starts_with("Unable to save the chat panel size")),
        _ => bail!("Expected a worker error for the panel size"),
    }
    return Ok(());
}
