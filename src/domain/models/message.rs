#[cfg(test)]
#[path = "message_test.rs"]
mod tests;

use super::Author;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MessageType {
    Normal,
    Error,
    Typing,
}

/// A block of text rendered in the chat panel. Exchanges are rendered as a
/// pair of messages, and Sahayak's own notices (help, errors) are plain
/// messages.
#[derive(Clone, Debug)]
pub struct Message {
    pub author: Author,
    pub text: String,
    pub footer: Option<String>,
    mtype: MessageType,
}

impl Message {
    pub fn new(author: Author, text: &str) -> Message {
        return Message {
            author,
            text: text.to_string().replace('\t', "  "),
            footer: None,
            mtype: MessageType::Normal,
        };
    }

    pub fn new_with_type(author: Author, mtype: MessageType, text: &str) -> Message {
        return Message {
            author,
            text: text.to_string().replace('\t', "  "),
            footer: None,
            mtype,
        };
    }

    pub fn with_footer(mut self, footer: &str) -> Message {
        self.footer = Some(footer.to_string());
        return self;
    }

    pub fn message_type(&self) -> MessageType {
        return self.mtype;
    }

    pub fn as_string_lines(&self, line_max_width: usize) -> Vec<String> {
        let mut lines: Vec<String> = Vec::new();
        let line_max_width = line_max_width.max(1);

        for full_line in self.text.split('\n') {
            if full_line.trim().is_empty() {
                lines.push(" ".to_string());
                continue;
            }

            let mut char_count = 0;
            let mut current_lines: Vec<&str> = vec![];

            for word in full_line.split(' ') {
                let word_len = word.chars().count();
                if word_len + char_count + 1 > line_max_width && !current_lines.is_empty() {
                    lines.push(current_lines.join(" ").trim_end().to_string());
                    current_lines = vec![word];
                    char_count = word_len + 1;
                } else {
                    current_lines.push(word);
                    char_count += word_len + 1;
                }
            }
            if !current_lines.is_empty() {
                lines.push(current_lines.join(" ").trim_end().to_string());
            }
        }

        return lines;
    }
}
