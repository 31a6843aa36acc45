//! Chat bot front end.
//!
//! - `command`: inbound text and callback parsing
//! - `render`: transport-neutral replies
//! - `service`: command handling over the serving corpus
//! - `telegram`: Bot API transport and long polling

pub mod command;
pub mod render;
pub mod service;
pub mod telegram;
pub mod types;

pub use command::Command;
pub use render::{InlineButton, OutgoingMessage, ParseMode};
pub use service::BotService;
pub use telegram::{TelegramClient, Transport, run_polling};
