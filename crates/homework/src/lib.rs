//! Homework crate: Practicum review status polling and Telegram notifications.
#![allow(clippy::uninlined_format_args)]
/// Practicum homework statuses client
pub mod client;
/// Classified poll cycle errors
pub mod error;
/// Telegram delivery
pub mod notifier;
/// Poll loop orchestration
pub mod poller;
/// Response shape validation
pub mod response;
/// Status to verdict mapping
pub mod status;

pub use client::{EndpointClient, HomeworkSource};
pub use error::{ErrorKind, PollError};
pub use notifier::{Messenger, Notifier, TelegramBot};
pub use poller::{CycleOutcome, Poller};
pub use response::HomeworkRecord;
