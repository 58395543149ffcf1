use tui_textarea::Input;

use super::ExchangeId;
use super::HistoryRecord;
use super::QueryOutcome;

pub enum Event {
    HistoryFailed(String),
    HistoryLoaded(Vec<HistoryRecord>),
    KeyboardCharInput(Input),
    KeyboardCTRLC(),
    KeyboardCTRLH(),
    KeyboardEnter(),
    KeyboardEsc(),
    KeyboardPaste(String),
    PanelGrow(),
    PanelShrink(),
    PanelToggle(),
    QueryResolved(ExchangeId, QueryOutcome),
    UIResize(u16, u16),
    UIScrollDown(),
    UIScrollPageDown(),
    UIScrollPageUp(),
    UIScrollUp(),
    UITick(),
    WorkerError(String),
}
