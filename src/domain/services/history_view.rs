#[cfg(test)]
#[path = "history_view_test.rs"]
mod tests;

use chrono::Local;

use super::history::group_by_date;
use super::history::ExpandedRecord;
use super::html::html_to_text;
use super::presenters::format_timestamp_in;
use super::presenters::NO_HISTORY_TEXT;
use crate::domain::models::Action;
use crate::domain::models::HistoryRecord;
use crate::domain::models::Session;
use crate::domain::models::NO_ANSWER_TEXT;

pub const LOGIN_REQUIRED_TEXT: &str = "Please login to see chat history";
pub const LOGIN_HINT_TEXT: &str = "Run `sahayak login` in your shell, then reopen Sahayak.";
pub const HISTORY_FAILED_TEXT: &str = "Failed to load chat history";
pub const HISTORY_LOADING_TEXT: &str = "Loading chat history...";

#[derive(Clone, Debug, PartialEq)]
pub enum HistoryStatus {
    Empty,
    Loading,
    Loaded(Vec<HistoryRecord>),
    Failed,
}

/// One line of the history panel. `record` is set on the line that selects
/// a record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryLine {
    pub text: String,
    pub record: Option<String>,
    pub is_heading: bool,
}

impl HistoryLine {
    fn plain(text: &str) -> HistoryLine {
        return HistoryLine {
            text: text.to_string(),
            record: None,
            is_heading: false,
        };
    }
}

/// Chat history shown in place of the conversation. Records are fetched the
/// first time the view opens and kept for the rest of the run.
pub struct HistoryView {
    visible: bool,
    status: HistoryStatus,
    selected: usize,
    expanded: ExpandedRecord,
}

impl Default for HistoryView {
    fn default() -> HistoryView {
        return HistoryView {
            visible: false,
            status: HistoryStatus::Empty,
            selected: 0,
            expanded: ExpandedRecord::default(),
        };
    }
}

impl HistoryView {
    pub fn is_visible(&self) -> bool {
        return self.visible;
    }

    #[cfg(test)]
    pub fn status(&self) -> &HistoryStatus {
        return &self.status;
    }

    #[cfg(test)]
    pub fn selected(&self) -> usize {
        return self.selected;
    }

    #[cfg(test)]
    pub fn expanded(&self) -> &ExpandedRecord {
        return &self.expanded;
    }

    /// Flips visibility. Opening with nothing cached while logged in returns
    /// the fetch to run.
    pub fn toggle(&mut self, session: &Session) -> Option<Action> {
        self.visible = !self.visible;
        if !self.visible {
            return None;
        }

        let token = session.user_token.as_ref()?;
        let needs_fetch = match &self.status {
            HistoryStatus::Empty | HistoryStatus::Failed => true,
            HistoryStatus::Loaded(records) => records.is_empty(),
            HistoryStatus::Loading => false,
        };

        if !needs_fetch {
            return None;
        }

        self.status = HistoryStatus::Loading;
        return Some(Action::FetchHistory(token.to_string()));
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Forgets cached records, used on logout.
    pub fn reset(&mut self) {
        self.visible = false;
        self.status = HistoryStatus::Empty;
        self.selected = 0;
        self.expanded.collapse();
    }

    pub fn loaded(&mut self, records: Vec<HistoryRecord>) {
        self.selected = 0;
        self.expanded.collapse();
        self.status = HistoryStatus::Loaded(records);
    }

    pub fn failed(&mut self) {
        self.status = HistoryStatus::Failed;
    }

    fn records(&self) -> &[HistoryRecord] {
        match &self.status {
            HistoryStatus::Loaded(records) => return records,
            _ => return &[],
        }
    }

    /// Ids in display order, which follows the date grouping.
    fn ordered_ids(&self) -> Vec<String> {
        return group_by_date(self.records())
            .into_iter()
            .flat_map(|(_, group)| return group.into_iter().map(|r| return r.id.to_string()))
            .collect();
    }

    pub fn select_next(&mut self) {
        let count = self.ordered_ids().len();
        if count > 0 {
            self.selected = (self.selected + 1).min(count - 1);
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn toggle_selected(&mut self) {
        if let Some(id) = self.ordered_ids().get(self.selected) {
            self.expanded.toggle(id);
        }
    }

    pub fn lines(&self, session: &Session) -> Vec<HistoryLine> {
        if !session.is_logged_in() {
            return vec![
                HistoryLine::plain(LOGIN_REQUIRED_TEXT),
                HistoryLine::plain(LOGIN_HINT_TEXT),
            ];
        }

        let records = match &self.status {
            HistoryStatus::Empty | HistoryStatus::Loading => {
                return vec![HistoryLine::plain(HISTORY_LOADING_TEXT)]
            }
            HistoryStatus::Failed => return vec![HistoryLine::plain(HISTORY_FAILED_TEXT)],
            HistoryStatus::Loaded(records) => records,
        };

        if records.is_empty() {
            return vec![HistoryLine::plain(NO_HISTORY_TEXT)];
        }

        let mut lines = vec![];
        let mut idx = 0;
        for (date, group) in group_by_date(records) {
            lines.push(HistoryLine {
                text: date,
                record: None,
                is_heading: true,
            });

            for record in group {
                let marker = if idx == self.selected { ">" } else { " " };
                lines.push(HistoryLine {
                    text: format!("{marker} Question: {}", record.question),
                    record: Some(record.id.to_string()),
                    is_heading: false,
                });

                if self.expanded.is_expanded(&record.id) {
                    lines.push(HistoryLine::plain(&format!(
                        "  {}",
                        format_timestamp_in(&record.timestamp, &Local)
                    )));
                    let mut answer = html_to_text(&record.answer);
                    if answer.is_empty() {
                        answer = NO_ANSWER_TEXT.to_string();
                    }
                    for (line_idx, answer_line) in answer.lines().enumerate() {
                        let prefix = if line_idx == 0 { "Answer: " } else { "" };
                        lines.push(HistoryLine::plain(&format!("  {prefix}{answer_line}")));
                    }
                }

                idx += 1;
            }
        }

        return lines;
    }
}
