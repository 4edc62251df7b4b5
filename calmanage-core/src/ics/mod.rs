//! Raw ICS handling.
//!
//! The engine never regenerates an event from its structured form. It reads
//! the few properties it needs and splices DESCRIPTION back into the stored
//! text, so everything it does not understand survives byte-for-byte.

pub mod fold;
mod parse;
mod rewrite;

pub use fold::{DEFAULT_FOLD_WIDTH, fold, unfold};
pub use parse::parse_management_event;
pub use rewrite::{DESCRIPTION, introduces_property, replace_description};
