use std::io;
use std::time::Instant;

use anyhow::Result;
use crossterm::cursor;
use crossterm::event::DisableBracketedPaste;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableBracketedPaste;
use crossterm::event::EnableMouseCapture;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::*;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Clear;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Scrollbar;
use ratatui::widgets::ScrollbarOrientation;
use ratatui::widgets::Wrap;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tui_textarea::Input;
use tui_textarea::Key;

use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::models::Loading;
use crate::domain::models::TextArea;
use crate::domain::services::events::EventsService;
use crate::domain::services::AppState;
use crate::domain::services::RevealScheduler;
use crate::domain::services::SessionStore;

const PANEL_TITLE: &str = "Welcome to Sahayak";
const HISTORY_TITLE: &str = "Chat History";
const LAUNCHER_TEXT: &str = "Chat with Sahayak (CTRL+/)";

fn launcher_rect(area: Rect) -> Rect {
    let width = (LAUNCHER_TEXT.chars().count() as u16 + 4).min(area.width);
    let height = 3_u16.min(area.height);

    return Rect {
        x: area.x + area.width - width,
        y: area.y + area.height - height,
        width,
        height,
    };
}

fn render_launcher<B: Backend>(frame: &mut Frame<B>) {
    let rect = launcher_rect(frame.size());
    frame.render_widget(
        Paragraph::new(LAUNCHER_TEXT)
            .style(Style::default().fg(Color::White))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(Color::Blue)),
            )
            .alignment(Alignment::Center),
        rect,
    );
}

fn render_history<B: Backend>(frame: &mut Frame<B>, rect: Rect, app_state: &AppState<'_>) {
    let history_lines = app_state.history.lines(&app_state.session);

    // Keep the selected record on screen.
    let selected_idx = history_lines
        .iter()
        .position(|line| return line.text.starts_with('>'))
        .unwrap_or(0);
    let scroll = (selected_idx as u16).saturating_sub(rect.height.saturating_sub(1));

    let lines = history_lines
        .iter()
        .map(|line| {
            let mut style = Style::default();
            if line.is_heading {
                style = style.fg(Color::Cyan).add_modifier(Modifier::BOLD);
            } else if line.text.starts_with('>') {
                style = style.fg(Color::Yellow);
            }

            return Line::from(Span::styled(line.text.to_string(), style));
        })
        .collect::<Vec<Line>>();

    frame.render_widget(
        Paragraph::new(lines)
            .block(Block::default().title(HISTORY_TITLE))
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0)),
        rect,
    );
}

fn paste(textarea: &mut tui_textarea::TextArea<'_>, text: &str) {
    for char in text.chars() {
        let key = match char {
            '\n' => Key::Enter,
            '\r' => continue,
            c => Key::Char(c),
        };
        textarea.input(Input {
            key,
            ctrl: false,
            alt: false,
        });
    }
}

async fn start_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app_state: &mut AppState<'_>,
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let mut events = EventsService::new(rx);
    let mut textarea = TextArea::default();
    let loading = Loading::default();

    #[cfg(feature = "dev")]
    {
        app_state.open_panel();
        paste(&mut textarea, "What are the library timings?");
    }

    loop {
        terminal.draw(|frame| {
            if !app_state.panel.is_open() {
                render_launcher(frame);
                return;
            }

            let rect = app_state.panel.panel_rect(frame.size());
            let block = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Blue))
                .title(PANEL_TITLE)
                .title_alignment(Alignment::Center);
            let inner = block.inner(rect);
            frame.render_widget(Clear, rect);
            frame.render_widget(block, rect);

            let layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints(vec![Constraint::Min(1), Constraint::Max(4)])
                .split(inner);

            if layout[0].width != app_state.last_known_width
                || layout[0].height != app_state.last_known_height
            {
                app_state.set_rect(layout[0]);
            }

            if app_state.history.is_visible() {
                render_history(frame, layout[0], app_state);
            } else {
                app_state
                    .exchange_list
                    .render(frame, layout[0], app_state.scroll.position);
                frame.render_stateful_widget(
                    Scrollbar::new(ScrollbarOrientation::VerticalRight),
                    layout[0].inner(&Margin {
                        vertical: 1,
                        horizontal: 0,
                    }),
                    &mut app_state.scroll.scrollbar_state,
                );
            }

            if app_state.conversation.is_in_flight() {
                loading.render(frame, layout[1]);
            } else {
                frame.render_widget(textarea.widget(), layout[1]);
            }
        })?;

        let event = events.next(app_state.reveal.next_deadline()).await?;
        let is_open = app_state.panel.is_open();
        let in_flight = app_state.conversation.is_in_flight();

        match event {
            Event::KeyboardCTRLC() => break,
            Event::PanelToggle() => {
                app_state.toggle_panel();
                textarea = TextArea::default();
            }
            Event::QueryResolved(id, outcome) => {
                app_state.handle_query_resolved(id, outcome, Instant::now());
            }
            Event::HistoryLoaded(records) => app_state.handle_history_loaded(records),
            Event::HistoryFailed(err) => app_state.handle_history_failed(&err),
            Event::UITick() => {
                app_state.handle_tick(Instant::now());
            }
            Event::UIResize(cols, rows) => app_state.panel.set_viewport(cols, rows),
            Event::WorkerError(err) => app_state.handle_worker_error(&err),
            Event::KeyboardEnter() if !is_open => app_state.open_panel(),
            _ if !is_open => (),
            Event::KeyboardEsc() => {
                app_state.close_panel();
                textarea = TextArea::default();
            }
            Event::PanelGrow() => app_state.grow(&tx)?,
            Event::PanelShrink() => app_state.shrink(&tx)?,
            Event::KeyboardCTRLH() => app_state.toggle_history(&tx)?,
            Event::UIScrollUp() => {
                if app_state.history.is_visible() {
                    app_state.history.select_previous();
                } else {
                    app_state.scroll.up();
                }
            }
            Event::UIScrollDown() => {
                if app_state.history.is_visible() {
                    app_state.history.select_next();
                } else {
                    app_state.scroll.down();
                }
            }
            Event::UIScrollPageUp() => app_state.scroll.up_page(),
            Event::UIScrollPageDown() => app_state.scroll.down_page(),
            Event::KeyboardPaste(text) if !in_flight => paste(&mut textarea, &text),
            Event::KeyboardCharInput(input) if !in_flight => {
                textarea.input(input);
            }
            Event::KeyboardEnter() if !in_flight => {
                let input_str = textarea.lines().join("\n");
                if input_str.trim().is_empty() {
                    if app_state.history.is_visible() {
                        app_state.history.toggle_selected();
                    }
                    continue;
                }

                textarea = TextArea::default();
                let (should_break, should_continue) =
                    app_state.handle_slash_commands(&input_str, &tx)?;
                if should_break {
                    break;
                }
                if should_continue {
                    continue;
                }

                app_state.history.hide();
                app_state.submit(&input_str, &tx)?;
            }
            _ => (),
        }
    }

    return Ok(());
}

pub fn destruct_terminal_for_panic() {
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(
        io::stdout(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    );
    let _ = crossterm::execute!(io::stdout(), cursor::Show);
}

pub async fn start(
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let store = SessionStore::default();
    let session = store.session().await?;
    let size = store.panel_size().await?;
    let mut app_state = AppState::new(session, size, RevealScheduler::default());

    let (cols, rows) = crossterm::terminal::size()?;
    app_state.panel.set_viewport(cols, rows);

    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    enable_raw_mode()?;
    crossterm::execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;

    start_loop(&mut terminal, &mut app_state, tx, rx).await?;

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    return Ok(());
}
