//! The command table: identifier → handler, in registration order.
//!
//! Validation and dispatch read the same table, so every identifier that
//! validates has a handler.

use std::fmt;

use tracing::info;

use crate::error::{CommandError, CommandResult};
use crate::event::ManagementEvent;

/// Runs one management command.
///
/// Returns the text to append to the event's DESCRIPTION, or `None` for
/// commands whose effect is purely structural.
pub trait CommandHandler: Send + Sync {
    fn handle(&self, event: &ManagementEvent) -> CommandResult<Option<String>>;
}

impl<F> CommandHandler for F
where
    F: Fn(&ManagementEvent) -> CommandResult<Option<String>> + Send + Sync,
{
    fn handle(&self, event: &ManagementEvent) -> CommandResult<Option<String>> {
        self(event)
    }
}

/// Commands every registry starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinCommand {
    ShareRead,
    ShareReadWrite,
    ShareWrite,
    SetName,
    AddCalendar,
    SetCalendarColour,
    SetCalendarDefaultAlert,
    SetCalendarDefaultDuration,
    SetCalendarDefaultHome,
    SetCalendarNotificationLocation,
    SetCalendarTimezone,
    SetCalendarLogAudit,
    SetCalendarNotificationDeletes,
}

impl BuiltinCommand {
    pub const ALL: [BuiltinCommand; 13] = [
        BuiltinCommand::ShareRead,
        BuiltinCommand::ShareReadWrite,
        BuiltinCommand::ShareWrite,
        BuiltinCommand::SetName,
        BuiltinCommand::AddCalendar,
        BuiltinCommand::SetCalendarColour,
        BuiltinCommand::SetCalendarDefaultAlert,
        BuiltinCommand::SetCalendarDefaultDuration,
        BuiltinCommand::SetCalendarDefaultHome,
        BuiltinCommand::SetCalendarNotificationLocation,
        BuiltinCommand::SetCalendarTimezone,
        BuiltinCommand::SetCalendarLogAudit,
        BuiltinCommand::SetCalendarNotificationDeletes,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BuiltinCommand::ShareRead => "share-read",
            BuiltinCommand::ShareReadWrite => "share-readwrite",
            BuiltinCommand::ShareWrite => "share-write",
            BuiltinCommand::SetName => "set-name",
            BuiltinCommand::AddCalendar => "add-calendar",
            BuiltinCommand::SetCalendarColour => "set-calendar-colour",
            BuiltinCommand::SetCalendarDefaultAlert => "set-calendar-default-alert",
            BuiltinCommand::SetCalendarDefaultDuration => "set-calendar-default-duration",
            BuiltinCommand::SetCalendarDefaultHome => "set-calendar-default-home",
            BuiltinCommand::SetCalendarNotificationLocation => {
                "set-calendar-notification-location"
            }
            BuiltinCommand::SetCalendarTimezone => "set-calendar-timezone",
            BuiltinCommand::SetCalendarLogAudit => "set-calendar-log-audit",
            BuiltinCommand::SetCalendarNotificationDeletes => "set-calendar-notification-deletes",
        }
    }

    /// Access level granted by the sharing commands.
    pub fn share_access(self) -> Option<&'static str> {
        match self {
            BuiltinCommand::ShareRead => Some("read"),
            BuiltinCommand::ShareReadWrite => Some("read-write"),
            BuiltinCommand::ShareWrite => Some("write"),
            _ => None,
        }
    }
}

impl fmt::Display for BuiltinCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl CommandHandler for BuiltinCommand {
    fn handle(&self, _event: &ManagementEvent) -> CommandResult<Option<String>> {
        info!(command = self.name(), "Processing management command");

        // Sharing is the only built-in that reports back through DESCRIPTION;
        // the others act on the calendar collection itself.
        Ok(self
            .share_access()
            .map(|access| format!("Calendar shared with {access} access")))
    }
}

struct Entry {
    id: String,
    handler: Box<dyn CommandHandler>,
}

/// Ordered, immutable-once-built set of recognized command identifiers.
pub struct CommandRegistry {
    prefix: String,
    entries: Vec<Entry>,
}

impl CommandRegistry {
    /// An empty registry whose identifiers all start with `prefix`.
    pub fn new(prefix: Option<&str>) -> Self {
        CommandRegistry {
            prefix: prefix.unwrap_or_default().to_string(),
            entries: Vec::new(),
        }
    }

    /// A registry holding every [`BuiltinCommand`].
    pub fn with_builtins(prefix: Option<&str>) -> Self {
        let mut registry = Self::new(prefix);
        for command in BuiltinCommand::ALL {
            let id = registry.qualify(command.name());
            registry.entries.push(Entry {
                id,
                handler: Box::new(command),
            });
        }
        registry
    }

    /// Add a command. Its identifier is `name` behind the registry prefix.
    pub fn register(
        &mut self,
        name: &str,
        handler: impl CommandHandler + 'static,
    ) -> CommandResult<()> {
        if name.trim().is_empty() {
            return Err(CommandError::Config("Command name must not be empty".into()));
        }

        let id = self.qualify(name.trim());
        if self.contains(&id) {
            return Err(CommandError::Config(format!(
                "Command '{id}' is already registered"
            )));
        }

        self.entries.push(Entry {
            id,
            handler: Box::new(handler),
        });
        Ok(())
    }

    fn qualify(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn handler(&self, id: &str) -> Option<&dyn CommandHandler> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.handler.as_ref())
    }

    /// Identifiers in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One identifier per line, in registration order.
    pub fn listing(&self) -> String {
        self.ids().collect::<Vec<_>>().join("\n")
    }

    /// Whether `event` is a management command: CLASS is PRIVATE and the
    /// trimmed SUMMARY is exactly a registered identifier.
    pub fn is_management_command(&self, event: &ManagementEvent) -> bool {
        if !event.is_private() {
            return false;
        }

        match event.command_name() {
            Some(name) => self.contains(name),
            None => false,
        }
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::with_builtins(None)
    }
}

impl fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("prefix", &self.prefix)
            .field("ids", &self.ids().collect::<Vec<_>>())
            .finish()
    }
}
