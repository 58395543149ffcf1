#[cfg(test)]
#[path = "events_test.rs"]
mod tests;

use std::time::Duration;
use std::time::Instant;

use anyhow::Result;
use crossterm::event::Event as CrosstermEvent;
use crossterm::event::EventStream;
use crossterm::event::KeyEventKind;
use crossterm::event::MouseEventKind;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time;
use tui_textarea::Input;
use tui_textarea::Key;

use crate::domain::models::Event;

const IDLE_TICK: Duration = Duration::from_millis(500);

/// Maps one key press to an event. Terminals report CTRL+/ as CTRL+7 or
/// CTRL+_, so all three toggle the panel.
pub fn map_input(input: Input) -> Event {
    match input {
        Input {
            key: Key::Char('/' | '7' | '_'),
            ctrl: true,
            ..
        } => return Event::PanelToggle(),
        Input {
            key: Key::Char('=' | '+'),
            alt: true,
            ..
        } => return Event::PanelGrow(),
        Input {
            key: Key::Char('-'),
            alt: true,
            ..
        } => return Event::PanelShrink(),
        Input {
            key: Key::Char('h'),
            ctrl: true,
            ..
        } => return Event::KeyboardCTRLH(),
        Input {
            key: Key::Char('c'),
            ctrl: true,
            ..
        } => return Event::KeyboardCTRLC(),
        Input {
            key: Key::Char('d'),
            ctrl: true,
            ..
        } => return Event::UIScrollPageDown(),
        Input {
            key: Key::Char('u'),
            ctrl: true,
            ..
        } => return Event::UIScrollPageUp(),
        Input { key: Key::Esc, .. } => return Event::KeyboardEsc(),
        Input { key: Key::Down, .. } | Input {
            key: Key::MouseScrollDown,
            ..
        } => return Event::UIScrollDown(),
        Input { key: Key::Up, .. } | Input {
            key: Key::MouseScrollUp,
            ..
        } => return Event::UIScrollUp(),
        Input {
            key: Key::PageDown, ..
        } => return Event::UIScrollPageDown(),
        Input {
            key: Key::PageUp, ..
        } => return Event::UIScrollPageUp(),
        Input {
            key: Key::Enter, ..
        } => return Event::KeyboardEnter(),
        input => return Event::KeyboardCharInput(input),
    }
}

/// How long to sleep before the next tick: until the next reveal is due, and
/// never longer than the idle tick.
pub fn wake_after(deadline: Option<Instant>, now: Instant) -> Duration {
    match deadline {
        Some(deadline) => return deadline.saturating_duration_since(now).min(IDLE_TICK),
        None => return IDLE_TICK,
    }
}

pub struct EventsService {
    crossterm_events: EventStream,
    events: mpsc::UnboundedReceiver<Event>,
}

impl EventsService {
    pub fn new(events: mpsc::UnboundedReceiver<Event>) -> EventsService {
        return EventsService {
            crossterm_events: EventStream::new(),
            events,
        };
    }

    fn handle_crossterm(&self, event: CrosstermEvent) -> Option<Event> {
        match event {
            CrosstermEvent::Paste(text) => {
                return Some(Event::KeyboardPaste(text));
            }
            CrosstermEvent::Resize(cols, rows) => {
                return Some(Event::UIResize(cols, rows));
            }
            CrosstermEvent::Mouse(mouseevent) => match mouseevent.kind {
                MouseEventKind::ScrollUp => return Some(Event::UIScrollUp()),
                MouseEventKind::ScrollDown => return Some(Event::UIScrollDown()),
                _ => return None,
            },
            CrosstermEvent::Key(keyevent) => {
                if keyevent.kind == KeyEventKind::Release {
                    return None;
                }
                return Some(map_input(keyevent.into()));
            }
            _ => return None,
        }
    }

    /// Waits for the next event. `reveal_deadline` is when the next typing
    /// animation step is due, if any.
    pub async fn next(&mut self, reveal_deadline: Option<Instant>) -> Result<Event> {
        loop {
            let sleep_for = wake_after(reveal_deadline, Instant::now());
            let evt = tokio::select! {
                event = self.events.recv() => event,
                event = self.crossterm_events.next() => match event {
                    Some(Ok(input)) => self.handle_crossterm(input),
                    Some(Err(_)) => None,
                    None => None
                },
                _ = time::sleep(sleep_for) => Some(Event::UITick())
            };

            if let Some(event) = evt {
                return Ok(event);
            }
        }
    }
}
