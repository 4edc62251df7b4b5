//! Management-command engine for calendar events.
//!
//! A client manages a calendar by storing a `CLASS:PRIVATE` event whose
//! SUMMARY names a command (e.g. `share-read`). This crate provides:
//! - `command` to recognize such events and run their handler
//! - `ics` to splice the handler's audit text back into the stored ICS text
//! - `protocol` for the JSON shapes exchanged with the management endpoint

pub mod command;
pub mod config;
pub mod error;
pub mod event;
pub mod ics;
pub mod protocol;

pub use command::{BlockUpdate, CommandHandler, CommandRegistry, Dispatcher, Outcome};
pub use config::EngineConfig;
pub use error::{CommandError, CommandResult};
pub use event::{Classification, ManagementEvent};
