#[cfg(test)]
#[path = "bubble_test.rs"]
mod tests;

use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;

use crate::domain::models::Author;
use crate::domain::models::Message;
use crate::domain::models::MessageType;

#[derive(PartialEq, Eq)]
pub enum BubbleAlignment {
    Left,
    Right,
}

// Left border and padding, right padding and border.
const BORDER_WIDTH: usize = 4;
const OUTER_PADDING_PERCENTAGE: f32 = 0.04;

pub struct Bubble<'a> {
    alignment: BubbleAlignment,
    message: &'a Message,
    window_max_width: usize,
}

fn char_len(text: &str) -> usize {
    return text.chars().count();
}

impl<'a> Bubble<'_> {
    pub fn new(
        message: &'a Message,
        alignment: BubbleAlignment,
        window_max_width: usize,
    ) -> Bubble<'a> {
        return Bubble {
            alignment,
            message,
            window_max_width,
        };
    }

    pub fn as_lines(&self) -> Vec<Line<'a>> {
        let max_line_length = self.max_line_length();
        let title = self.message.author.to_string();
        let footer = self.message.footer.clone().unwrap_or_default();

        let top_fill = "─".repeat((max_line_length + 2).saturating_sub(char_len(&title)));
        let bottom_fill = "─".repeat((max_line_length + 2).saturating_sub(char_len(&footer)));

        let mut lines = vec![self.pad_line(format!("╭{title}{top_fill}╮"), self.border_style())];
        for line in self.message.as_string_lines(max_line_length) {
            let fill = " ".repeat(max_line_length.saturating_sub(char_len(&line)));
            lines.push(self.pad_line(format!("│ {line}{fill} │"), self.text_style()));
        }
        lines.push(self.pad_line(format!("╰{bottom_fill}{footer}╯"), self.border_style()));

        return lines;
    }

    fn max_line_length(&self) -> usize {
        let min_outer_padding =
            (self.window_max_width as f32 * OUTER_PADDING_PERCENTAGE).ceil() as usize;
        let available = self
            .window_max_width
            .saturating_sub(BORDER_WIDTH + min_outer_padding)
            .max(1);

        let longest = self
            .message
            .text
            .lines()
            .map(char_len)
            .max()
            .unwrap_or(0);

        let footer_len = self.message.footer.as_deref().map(char_len).unwrap_or(0);

        return longest
            .min(available)
            .max(char_len(&self.message.author.to_string()))
            .max(footer_len);
    }

    fn pad_line(&self, body: String, style: Style) -> Line<'a> {
        let outer = " ".repeat(self.window_max_width.saturating_sub(char_len(&body)));

        if self.alignment == BubbleAlignment::Left {
            return Line::from(vec![Span::styled(body, style), Span::from(outer)]);
        }

        return Line::from(vec![Span::from(outer), Span::styled(body, style)]);
    }

    fn border_style(&self) -> Style {
        if self.message.message_type() == MessageType::Error {
            return Style::default().fg(Color::Red);
        }

        match self.message.author {
            Author::User => return Style::default().fg(Color::Blue),
            Author::Sahayak => return Style::default().fg(Color::Green),
        }
    }

    fn text_style(&self) -> Style {
        match self.message.message_type() {
            MessageType::Error => return Style::default().fg(Color::Red),
            MessageType::Typing => {
                return Style::default()
                    .fg(Color::Gray)
                    .add_modifier(Modifier::ITALIC)
            }
            MessageType::Normal => return Style::default(),
        }
    }
}
