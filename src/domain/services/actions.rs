#[cfg(test)]
#[path = "actions_test.rs"]
mod tests;

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;

use super::SessionStore;
use super::USER_TOKEN_KEY;
use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::models::QueryRequest;
use crate::domain::models::TransportBox;

fn send_event(tx: &mpsc::UnboundedSender<Event>, event: Event) {
    if tx.send(event).is_err() {
        tracing::debug!("UI is gone, dropping event");
    }
}

/// Store failures are reported in the chat panel, the worker keeps running.
fn worker_error(tx: &mpsc::UnboundedSender<Event>, context: &str, err: anyhow::Error) {
    tracing::error!(error = ?err, context, "Worker action failed");
    send_event(tx, Event::WorkerError(format!("{context}: {err}")));
}

async fn submit_query(
    transport: Arc<TransportBox>,
    req: QueryRequest,
    tx: mpsc::UnboundedSender<Event>,
) {
    let outcome = transport
        .submit_query(&req.question, req.token.as_deref())
        .await;
    send_event(&tx, Event::QueryResolved(req.id, outcome));
}

async fn fetch_history(
    transport: Arc<TransportBox>,
    token: String,
    tx: mpsc::UnboundedSender<Event>,
) {
    match transport.chat_history(&token).await {
        Ok(records) => send_event(&tx, Event::HistoryLoaded(records)),
        Err(err) => send_event(&tx, Event::HistoryFailed(err.to_string())),
    }
}

/// Background worker for the chat panel. Network calls run on their own
/// tasks so a history fetch and a query can be in flight together.
pub struct ActionsService {}

impl ActionsService {
    pub async fn start(
        transport: TransportBox,
        store: SessionStore,
        tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        let transport = Arc::new(transport);

        while let Some(action) = rx.recv().await {
            match action {
                Action::SubmitQuery(req) => {
                    tokio::spawn(submit_query(transport.clone(), req, tx.clone()));
                }
                Action::FetchHistory(token) => {
                    tokio::spawn(fetch_history(transport.clone(), token, tx.clone()));
                }
                Action::SavePanelSize(size) => {
                    if let Err(err) = store.save_panel_size(&size).await {
                        worker_error(&tx, "Unable to save the chat panel size", err);
                    }
                }
                Action::Logout() => match store.remove(USER_TOKEN_KEY).await {
                    Ok(()) => tracing::info!("User logged out"),
                    Err(err) => worker_error(&tx, "Unable to log out", err),
                },
            }
        }

        return Ok(());
    }
}
