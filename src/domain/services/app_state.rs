#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

use std::collections::HashSet;
use std::time::Instant;

use anyhow::Result;
use ratatui::prelude::Rect;
use tokio::sync::mpsc;

use super::html::html_to_text;
use super::Conversation;
use super::ExchangeList;
use super::HistoryView;
use super::PanelShell;
use super::RevealScheduler;
use super::Scroll;
use super::LOGIN_HINT_TEXT;
use crate::domain::models::Action;
use crate::domain::models::Author;
use crate::domain::models::ExchangeId;
use crate::domain::models::HistoryRecord;
use crate::domain::models::Message;
use crate::domain::models::MessageType;
use crate::domain::models::PanelSize;
use crate::domain::models::QueryOutcome;
use crate::domain::models::Session;
use crate::domain::models::SlashCommand;

pub const WELCOME_TEXT: &str = "Welcome to Sahayak! Ask me anything.";
pub const TYPING_TEXT: &str = "Sahayak is typing...";
pub const LOGGED_OUT_TEXT: &str = "You have been logged out.";
pub const NOT_LOGGED_IN_TEXT: &str = "You are not logged in.";

pub fn help_text() -> String {
    let text = r#"
COMMANDS:
- /history (/hi) - Show or hide your chat history. Requires a login.
- /grow (/g) - Make the chat panel bigger.
- /shrink (/s) - Make the chat panel smaller.
- /login - How to log in.
- /logout - Log out of Sahayak.
- /quit /exit (/q) - Exit Sahayak.
- /help (/h) - Provides this help menu.

HOTKEYS:
- CTRL+/ - Open or close the chat panel
- Esc - Close the chat panel
- ALT+= / ALT+- - Grow or shrink the chat panel
- CTRL+H - Show or hide chat history
- Up arrow - Scroll up, or select the previous history entry
- Down arrow - Scroll down, or select the next history entry
- Enter - Send your message, or expand the selected history entry
- CTRL+U - Page up
- CTRL+D - Page down
- CTRL+C - Exit Sahayak.
        "#;

    return text.trim().to_string();
}

enum TimelineItem {
    Exchange(ExchangeId),
    Notice(Message),
}

pub struct AppState<'a> {
    pub conversation: Conversation,
    pub exchange_list: ExchangeList<'a>,
    pub history: HistoryView,
    pub last_known_height: u16,
    pub last_known_width: u16,
    pub panel: PanelShell,
    pub reveal: RevealScheduler,
    pub scroll: Scroll,
    pub session: Session,
    failed: HashSet<ExchangeId>,
    timeline: Vec<TimelineItem>,
}

impl<'a> AppState<'a> {
    pub fn new(session: Session, size: PanelSize, reveal: RevealScheduler) -> AppState<'a> {
        return AppState {
            conversation: Conversation::default(),
            exchange_list: ExchangeList::default(),
            history: HistoryView::default(),
            last_known_height: 0,
            last_known_width: 0,
            panel: PanelShell::new(size),
            reveal,
            scroll: Scroll::default(),
            session,
            failed: HashSet::new(),
            timeline: vec![],
        };
    }

    fn reset_conversation(&mut self) {
        self.conversation.reset();
        self.reveal.clear();
        self.failed.clear();
        self.timeline.clear();
        self.history.hide();
    }

    pub fn open_panel(&mut self) {
        if self.panel.is_open() {
            return;
        }

        self.reset_conversation();
        self.panel.open();
        self.timeline
            .push(TimelineItem::Notice(Message::new(Author::Sahayak, WELCOME_TEXT)));
        self.sync_dependants();
    }

    /// Closing drops the conversation and every running animation. Answers
    /// still on their way are ignored when they arrive.
    pub fn close_panel(&mut self) {
        self.reset_conversation();
        self.panel.close();
        self.sync_dependants();
    }

    pub fn toggle_panel(&mut self) {
        if self.panel.is_open() {
            self.close_panel();
        } else {
            self.open_panel();
        }
    }

    pub fn add_notice(&mut self, message: Message) {
        self.timeline.push(TimelineItem::Notice(message));
        self.sync_dependants();
        self.scroll.last();
    }

    /// Sends the text as a query. Returns false when nothing was sent, for
    /// blank text or while another query is waiting for its answer.
    pub fn submit(&mut self, text: &str, tx: &mpsc::UnboundedSender<Action>) -> Result<bool> {
        let req = match self.conversation.submit(text, &self.session) {
            Some(req) => req,
            None => return Ok(false),
        };

        self.timeline.push(TimelineItem::Exchange(req.id));
        tx.send(Action::SubmitQuery(req))?;

        self.sync_dependants();
        self.scroll.last();

        return Ok(true);
    }

    pub fn handle_query_resolved(&mut self, id: ExchangeId, outcome: QueryOutcome, now: Instant) {
        let outcome = match outcome {
            QueryOutcome::Answered(html) => QueryOutcome::answered(Some(html_to_text(&html))),
            other => other,
        };

        let text = match self.conversation.resolve(id, &outcome) {
            Some(text) => text.to_string(),
            None => {
                tracing::debug!(id = id.0, "Dropping answer for an exchange that is gone");
                return;
            }
        };

        if outcome.is_error() {
            self.failed.insert(id);
        }

        self.reveal.start(id, &text, now);
        self.sync_dependants();
        self.scroll.last();
    }

    /// Advances the typing animations. Returns true when something changed.
    pub fn handle_tick(&mut self, now: Instant) -> bool {
        if !self.reveal.tick(now) {
            return false;
        }

        self.sync_dependants();
        self.scroll.last();
        return true;
    }

    pub fn grow(&mut self, tx: &mpsc::UnboundedSender<Action>) -> Result<()> {
        if self.panel.increase() {
            tx.send(Action::SavePanelSize(self.panel.size()))?;
        }

        return Ok(());
    }

    pub fn shrink(&mut self, tx: &mpsc::UnboundedSender<Action>) -> Result<()> {
        if self.panel.decrease() {
            tx.send(Action::SavePanelSize(self.panel.size()))?;
        }

        return Ok(());
    }

    pub fn toggle_history(&mut self, tx: &mpsc::UnboundedSender<Action>) -> Result<()> {
        if let Some(action) = self.history.toggle(&self.session) {
            tx.send(action)?;
        }

        return Ok(());
    }

    pub fn handle_history_loaded(&mut self, records: Vec<HistoryRecord>) {
        self.history.loaded(records);
    }

    pub fn handle_history_failed(&mut self, err: &str) {
        tracing::error!(error = err, "Failed to load chat history");
        self.history.failed();
    }

    pub fn handle_worker_error(&mut self, err: &str) {
        self.add_notice(Message::new_with_type(
            Author::Sahayak,
            MessageType::Error,
            err,
        ));
    }

    pub fn logout(&mut self, tx: &mpsc::UnboundedSender<Action>) -> Result<()> {
        if !self.session.is_logged_in() {
            self.add_notice(Message::new(Author::Sahayak, NOT_LOGGED_IN_TEXT));
            return Ok(());
        }

        self.session.logout();
        self.history.reset();
        tx.send(Action::Logout())?;
        self.add_notice(Message::new(Author::Sahayak, LOGGED_OUT_TEXT));

        return Ok(());
    }

    /// Returns `(should_break, should_continue)` for the UI loop.
    pub fn handle_slash_commands(
        &mut self,
        input_str: &str,
        tx: &mpsc::UnboundedSender<Action>,
    ) -> Result<(bool, bool)> {
        let command = match SlashCommand::parse(input_str) {
            Some(command) => command,
            None => return Ok((false, false)),
        };

        if command.is_quit() {
            return Ok((true, false));
        }

        if command.is_help() {
            self.add_notice(Message::new(Author::Sahayak, &help_text()));
        } else if command.is_history() {
            self.toggle_history(tx)?;
        } else if command.is_grow() {
            self.grow(tx)?;
        } else if command.is_shrink() {
            self.shrink(tx)?;
        } else if command.is_logout() {
            self.logout(tx)?;
        } else if command.is_login() {
            self.add_notice(Message::new(Author::Sahayak, LOGIN_HINT_TEXT));
        }

        return Ok((false, true));
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.last_known_width = rect.width;
        self.last_known_height = rect.height;
        self.sync_dependants();
    }

    /// Messages to render, in timeline order. Answers still being revealed
    /// show only their revealed part.
    pub fn messages(&self) -> Vec<Message> {
        let mut messages = vec![];

        for item in &self.timeline {
            let id = match item {
                TimelineItem::Notice(message) => {
                    messages.push(message.clone());
                    continue;
                }
                TimelineItem::Exchange(id) => *id,
            };

            if let Some(exchange) = self.conversation.get(id) {
                let submitted_at = exchange.submitted_at().format("%-I:%M %p").to_string();
                messages.push(Message::new(Author::User, exchange.query()).with_footer(&submitted_at));

                match exchange.response() {
                    None => messages.push(Message::new_with_type(
                        Author::Sahayak,
                        MessageType::Typing,
                        TYPING_TEXT,
                    )),
                    Some(response) => {
                        let text = match self.reveal.get(id) {
                            Some(state) => state.visible_text(),
                            None => response.to_string(),
                        };
                        let mut mtype = MessageType::Normal;
                        if self.failed.contains(&id) {
                            mtype = MessageType::Error;
                        }
                        messages.push(Message::new_with_type(Author::Sahayak, mtype, &text));
                    }
                }
            }
        }

        return messages;
    }

    fn sync_dependants(&mut self) {
        let messages = self.messages();
        self.exchange_list
            .set_messages(&messages, self.last_known_width as usize);

        let lines_len = u16::try_from(self.exchange_list.len()).unwrap_or(u16::MAX);
        self.scroll.set_state(lines_len, self.last_known_height);

        if self.conversation.is_in_flight() {
            self.scroll.last();
        }
    }
}
