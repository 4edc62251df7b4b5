//! Management command validation and dispatch.

mod dispatch;
mod registry;

pub use dispatch::{BlockUpdate, Clock, Dispatcher, Outcome};
pub use registry::{BuiltinCommand, CommandHandler, CommandRegistry};
