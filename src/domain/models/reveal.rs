#[cfg(test)]
#[path = "reveal_test.rs"]
mod tests;

use std::time::Instant;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealPhase {
    Idle,
    Revealing,
    Done,
}

/// Typing animation progress for one resolved exchange. Progress is counted
/// in chars so multi-byte text never gets split mid character.
#[derive(Clone, Debug)]
pub struct RevealState {
    full_text: String,
    total: usize,
    revealed: usize,
    phase: RevealPhase,
    due_at: Option<Instant>,
}

impl RevealState {
    pub fn new(text: &str) -> RevealState {
        return RevealState {
            full_text: text.to_string(),
            total: text.chars().count(),
            revealed: 0,
            phase: RevealPhase::Idle,
            due_at: None,
        };
    }

    #[cfg(test)]
    pub fn phase(&self) -> RevealPhase {
        return self.phase;
    }

    #[cfg(test)]
    pub fn revealed(&self) -> usize {
        return self.revealed;
    }

    #[cfg(test)]
    pub fn total(&self) -> usize {
        return self.total;
    }

    pub fn is_done(&self) -> bool {
        return self.phase == RevealPhase::Done;
    }

    pub fn due_at(&self) -> Option<Instant> {
        return self.due_at;
    }

    pub fn visible_text(&self) -> String {
        return self.full_text.chars().take(self.revealed).collect();
    }

    /// Schedules the next character. Empty text has nothing to reveal and
    /// finishes immediately.
    pub fn arm(&mut self, due_at: Instant) {
        if self.revealed >= self.total {
            self.finish();
            return;
        }

        self.phase = RevealPhase::Revealing;
        self.due_at = Some(due_at);
    }

    /// Reveals one more character. Returns true while more remain.
    pub fn advance(&mut self) -> bool {
        if self.phase != RevealPhase::Revealing {
            return false;
        }

        self.revealed = (self.revealed + 1).min(self.total);
        if self.revealed == self.total {
            self.finish();
            return false;
        }

        self.due_at = None;
        return true;
    }

    fn finish(&mut self) {
        self.revealed = self.total;
        self.phase = RevealPhase::Done;
        self.due_at = None;
    }
}
