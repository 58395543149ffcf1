mod action;
mod author;
mod event;
mod exchange;
mod loading;
mod message;
mod panel_size;
mod query_outcome;
mod records;
mod reveal;
mod session;
mod slash_commands;
mod textarea;
mod transport;

pub use action::*;
pub use author::*;
pub use event::*;
pub use exchange::*;
pub use loading::*;
pub use message::*;
pub use panel_size::*;
pub use query_outcome::*;
pub use records::*;
pub use reveal::*;
pub use session::*;
pub use slash_commands::*;
pub use textarea::*;
pub use transport::*;
