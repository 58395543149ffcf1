pub mod accounts;
pub mod actions;
mod app_state;
mod bubble;
mod conversation;
pub mod events;
mod exchange_list;
pub mod history;
mod history_view;
pub mod html;
mod panel;
pub mod presenters;
mod reveal_scheduler;
mod scroll;
mod session_store;

pub use app_state::*;
pub use bubble::*;
pub use conversation::*;
pub use exchange_list::*;
pub use history_view::*;
pub use panel::*;
pub use reveal_scheduler::*;
pub use scroll::*;
pub use session_store::*;
