#[cfg(test)]
#[path = "exchange_list_test.rs"]
mod tests;

use std::collections::HashMap;

use ratatui::prelude::Backend;
use ratatui::prelude::Rect;
use ratatui::text::Line;
use ratatui::widgets::Block;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::Bubble;
use super::BubbleAlignment;
use crate::domain::models::Author;
use crate::domain::models::Message;
use crate::domain::models::MessageType;

struct BubbleCacheEntry<'a> {
    author: Author,
    text: String,
    footer: Option<String>,
    mtype: MessageType,
    lines: Vec<Line<'a>>,
}

impl BubbleCacheEntry<'_> {
    fn matches(&self, message: &Message) -> bool {
        return self.author == message.author
            && self.mtype == message.message_type()
            && self.footer == message.footer
            && self.text == message.text;
    }
}

/// Rendered bubbles for every message in the panel. Lines are cached per
/// message and rebuilt when the message or the width changes.
pub struct ExchangeList<'a> {
    cache: HashMap<usize, BubbleCacheEntry<'a>>,
    line_width: usize,
    lines_len: usize,
    messages_len: usize,
}

impl<'a> Default for ExchangeList<'a> {
    fn default() -> ExchangeList<'a> {
        return ExchangeList {
            cache: HashMap::new(),
            line_width: 0,
            lines_len: 0,
            messages_len: 0,
        };
    }
}

impl<'a> ExchangeList<'a> {
    pub fn set_messages(&mut self, messages: &[Message], line_width: usize) {
        if self.line_width != line_width || messages.len() < self.messages_len {
            self.cache.clear();
            self.line_width = line_width;
        }
        self.messages_len = messages.len();

        self.lines_len = messages
            .iter()
            .enumerate()
            .map(|(idx, message)| {
                if let Some(entry) = self.cache.get(&idx) {
                    if entry.matches(message) {
                        return entry.lines.len();
                    }
                }

                let mut align = BubbleAlignment::Left;
                if message.author == Author::User {
                    align = BubbleAlignment::Right;
                }

                let lines = Bubble::new(message, align, line_width).as_lines();
                let lines_len = lines.len();
                self.cache.insert(
                    idx,
                    BubbleCacheEntry {
                        author: message.author,
                        text: message.text.to_string(),
                        footer: message.footer.clone(),
                        mtype: message.message_type(),
                        lines,
                    },
                );

                return lines_len;
            })
            .sum();
    }

    pub fn len(&self) -> usize {
        return self.lines_len;
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        return self.lines_len == 0;
    }

    pub fn lines(&self) -> Vec<Line<'a>> {
        let mut indexes: Vec<usize> = self.cache.keys().cloned().collect();
        indexes.sort();

        return indexes
            .iter()
            .filter_map(|idx| return self.cache.get(idx))
            .flat_map(|entry| return entry.lines.to_owned())
            .collect();
    }

    pub fn render<B: Backend>(&self, frame: &mut Frame<B>, rect: Rect, scroll: u16) {
        frame.render_widget(
            Paragraph::new(self.lines())
                .block(Block::default())
                .scroll((scroll, 0)),
            rect,
        );
    }
}
