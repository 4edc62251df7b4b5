//! Runs a validated command and reflects its output into DESCRIPTION.

use std::fmt::Write;

use chrono::{Local, NaiveDateTime};
use tracing::{debug, error, warn};

use super::registry::CommandRegistry;
use crate::config::EngineConfig;
use crate::error::{CommandError, CommandResult};
use crate::event::ManagementEvent;
use crate::ics::{parse_management_event, replace_description};

/// Source of the local wall-clock time stamped into audit separators.
pub type Clock = fn() -> NaiveDateTime;

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// What happened to the stored raw block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockUpdate {
    /// DESCRIPTION was spliced; persist this text.
    Rewritten(String),
    /// The block has no DESCRIPTION line, so it was left as is.
    Skipped,
    /// The command produced no text; the block needs no change.
    Unchanged,
    /// No stored block was supplied.
    NotRequested,
}

/// Result of [`Dispatcher::handle`] when no error occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The event is an ordinary record; nothing was touched.
    NotAManagementCommand,
    Applied {
        command: String,
        /// The new DESCRIPTION, if the command appended to it
        narrative: Option<String>,
        block: BlockUpdate,
    },
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied { .. })
    }

    /// The rewritten block, if there is one to persist.
    pub fn rewritten_block(&self) -> Option<&str> {
        match self {
            Outcome::Applied {
                block: BlockUpdate::Rewritten(raw),
                ..
            } => Some(raw),
            _ => None,
        }
    }
}

/// Maps validated commands to their handlers and applies the result.
///
/// Immutable once built; share it behind an `Arc` to handle events from
/// several threads.
#[derive(Debug)]
pub struct Dispatcher {
    registry: CommandRegistry,
    fold_width: usize,
    timestamp_format: String,
    clock: Clock,
}

impl Dispatcher {
    pub fn new(registry: CommandRegistry, config: &EngineConfig) -> Self {
        Dispatcher {
            registry,
            fold_width: config.fold_width,
            timestamp_format: config.timestamp_format.clone(),
            clock: local_now,
        }
    }

    /// Built-in commands, prefixed as configured.
    pub fn from_config(config: &EngineConfig) -> CommandResult<Self> {
        config.validate()?;
        let registry = CommandRegistry::with_builtins(config.command_prefix.as_deref());
        Ok(Self::new(registry, config))
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn is_management_command(&self, event: &ManagementEvent) -> bool {
        self.registry.is_management_command(event)
    }

    /// Validate `event`, run its command and update DESCRIPTION.
    ///
    /// When `stored_block` is given, the new DESCRIPTION is also spliced into
    /// it. `event.narrative` is only written once everything has succeeded,
    /// so on error the event is exactly as it was passed in.
    pub fn handle(
        &self,
        event: &mut ManagementEvent,
        stored_block: Option<&str>,
    ) -> CommandResult<Outcome> {
        if !self.is_management_command(event) {
            debug!("Invalid or non-management event, skipping");
            return Ok(Outcome::NotAManagementCommand);
        }

        let command = event.command_name().unwrap_or_default().to_string();

        let Some(handler) = self.registry.handler(&command) else {
            error!(%command, "Unsupported management command");
            return Err(CommandError::UnrecognizedCommand(command));
        };

        let output = handler.handle(event)?;

        let Some(text) = output.filter(|text| !text.is_empty()) else {
            return Ok(Outcome::Applied {
                command,
                narrative: None,
                block: BlockUpdate::Unchanged,
            });
        };

        let Some(existing) = event.narrative.as_deref() else {
            error!(%command, "Event has no DESCRIPTION to append to");
            return Err(CommandError::NarrativePropertyMissing(command));
        };

        let narrative = self.append_update(existing, &text)?;

        let block = match stored_block {
            None => BlockUpdate::NotRequested,
            Some(raw) => match replace_description(raw, &narrative, self.fold_width) {
                Some(rewritten) => BlockUpdate::Rewritten(rewritten),
                None => {
                    warn!(%command, "Stored event has no DESCRIPTION line, rewrite skipped");
                    BlockUpdate::Skipped
                }
            },
        };

        event.narrative = Some(narrative.clone());

        Ok(Outcome::Applied {
            command,
            narrative: Some(narrative),
            block,
        })
    }

    /// Parse `raw`, then [`handle`](Self::handle) it with `raw` as the stored block.
    pub fn handle_ics(&self, raw: &str) -> CommandResult<(ManagementEvent, Outcome)> {
        let mut event = parse_management_event(raw)?;
        let outcome = self.handle(&mut event, Some(raw))?;
        Ok((event, outcome))
    }

    fn append_update(&self, existing: &str, text: &str) -> CommandResult<String> {
        let now = (self.clock)();

        let mut narrative = String::with_capacity(existing.len() + text.len() + 48);
        narrative.push_str(existing);
        write!(
            narrative,
            "\n\n======= update ({}) =======\n{}",
            now.format(&self.timestamp_format),
            text
        )
        .map_err(|_| {
            CommandError::Config(format!(
                "Invalid timestamp_format '{}'",
                self.timestamp_format
            ))
        })?;

        Ok(narrative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Classification;
    use crate::ics::DEFAULT_FOLD_WIDTH;
    use chrono::NaiveDate;

    fn fixed_clock() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(9, 7, 3)
            .unwrap()
    }

    fn testing(_: &ManagementEvent) -> CommandResult<Option<String>> {
        Ok(Some("testing".to_string()))
    }

    fn failing(_: &ManagementEvent) -> CommandResult<Option<String>> {
        Err(CommandError::Handler {
            command: "explode".to_string(),
            message: "directory unavailable".to_string(),
        })
    }

    fn dispatcher() -> Dispatcher {
        let mut registry = CommandRegistry::new(None);
        registry.register("share-read", testing).unwrap();
        registry.register("explode", failing).unwrap();
        registry
            .register("set-name", |_: &ManagementEvent| -> CommandResult<Option<String>> {
                Ok(None)
            })
            .unwrap();
        Dispatcher::new(registry, &EngineConfig::default()).with_clock(fixed_clock)
    }

    fn private(summary: &str, narrative: Option<&str>) -> ManagementEvent {
        ManagementEvent::new(Some(Classification::Private), Some(summary), narrative)
    }

    const BLOCK: &str = "BEGIN:VCALENDAR\r\n\
BEGIN:VEVENT\r\n\
UID:cmd-1\r\n\
CLASS:PRIVATE\r\n\
SUMMARY:share-read\r\n\
DESCRIPTION:\r\n\
DTSTART:20240305T090000Z\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

    #[test]
    fn test_end_to_end_share_read() {
        let dispatcher = dispatcher();
        let mut event = private("share-read", Some(""));

        let outcome = dispatcher.handle(&mut event, Some(BLOCK)).unwrap();

        let expected = "\n\n======= update (05-03-2024 09:07:03) =======\ntesting";
        assert_eq!(event.narrative.as_deref(), Some(expected));

        let Outcome::Applied {
            command,
            narrative,
            block: BlockUpdate::Rewritten(raw),
        } = outcome
        else {
            panic!("expected a rewritten block");
        };
        assert_eq!(command, "share-read");
        assert_eq!(narrative.as_deref(), Some(expected));

        let folded = crate::ics::fold(
            &format!("DESCRIPTION:{}", crate::ics::fold::escape_text(expected)),
            DEFAULT_FOLD_WIDTH,
        )
        .join("\r\n");
        assert_eq!(raw, BLOCK.replace("DESCRIPTION:\r\n", &format!("{folded}\r\n")));
    }

    #[test]
    fn test_appends_after_existing_narrative() {
        let dispatcher = dispatcher();
        let mut event = private("share-read", Some("created by admin"));

        dispatcher.handle(&mut event, None).unwrap();

        assert_eq!(
            event.narrative.as_deref(),
            Some("created by admin\n\n======= update (05-03-2024 09:07:03) =======\ntesting")
        );
    }

    #[test]
    fn test_not_a_command_leaves_event_untouched() {
        let dispatcher = dispatcher();
        let mut event = ManagementEvent::new(
            Some(Classification::Public),
            Some("share-read"),
            Some("note"),
        );
        let before = event.clone();

        let outcome = dispatcher.handle(&mut event, Some(BLOCK)).unwrap();

        assert_eq!(outcome, Outcome::NotAManagementCommand);
        assert_eq!(event, before);
    }

    #[test]
    fn test_handler_failure_is_atomic() {
        let dispatcher = dispatcher();
        let mut event = private("explode", Some("keep me"));
        let before = event.clone();

        let err = dispatcher.handle(&mut event, Some(BLOCK)).unwrap_err();

        assert!(matches!(err, CommandError::Handler { .. }));
        assert_eq!(event, before);
    }

    #[test]
    fn test_missing_narrative_is_an_error() {
        let dispatcher = dispatcher();
        let mut event = private("share-read", None);

        let err = dispatcher.handle(&mut event, Some(BLOCK)).unwrap_err();

        assert!(matches!(err, CommandError::NarrativePropertyMissing(ref c) if c == "share-read"));
        assert_eq!(event.narrative, None);
    }

    #[test]
    fn test_structural_command_needs_no_rewrite() {
        let dispatcher = dispatcher();
        let mut event = private("set-name", None);

        let outcome = dispatcher.handle(&mut event, Some(BLOCK)).unwrap();

        assert_eq!(
            outcome,
            Outcome::Applied {
                command: "set-name".to_string(),
                narrative: None,
                block: BlockUpdate::Unchanged,
            }
        );
        assert_eq!(event.narrative, None);
    }

    #[test]
    fn test_block_without_description_is_skipped() {
        let dispatcher = dispatcher();
        let mut event = private("share-read", Some(""));
        let block = BLOCK.replace("DESCRIPTION:\r\n", "");

        let outcome = dispatcher.handle(&mut event, Some(&block)).unwrap();

        assert!(matches!(
            outcome,
            Outcome::Applied {
                block: BlockUpdate::Skipped,
                ..
            }
        ));
        assert_eq!(outcome.rewritten_block(), None);
        assert!(event.narrative.as_deref().unwrap().ends_with("testing"));
    }

    #[test]
    fn test_handle_ics_with_builtins() {
        let dispatcher = Dispatcher::from_config(&EngineConfig::default())
            .unwrap()
            .with_clock(fixed_clock);
        let raw = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:TEST\r\n\
BEGIN:VEVENT\r\n\
UID:cmd-2\r\n\
CLASS:PRIVATE\r\n\
SUMMARY:share-readwrite\r\n\
DESCRIPTION:requested by ops\r\n\
DTSTART:20240305T090000Z\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

        let (event, outcome) = dispatcher.handle_ics(raw).unwrap();

        let expected = "requested by ops\n\n======= update (05-03-2024 09:07:03) =======\n\
Calendar shared with read-write access";
        assert_eq!(event.narrative.as_deref(), Some(expected));

        let rewritten = outcome.rewritten_block().expect("rewritten block");
        assert!(rewritten.starts_with("BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:TEST\r\n"));
        assert!(rewritten.ends_with("DTSTART:20240305T090000Z\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n"));

        let reparsed = parse_management_event(rewritten).unwrap();
        assert_eq!(reparsed.narrative.as_deref(), Some(expected));
    }

    #[test]
    fn test_custom_timestamp_format() {
        let config = EngineConfig {
            timestamp_format: "%Y-%m-%dT%H:%M".to_string(),
            ..EngineConfig::default()
        };
        let mut registry = CommandRegistry::new(None);
        registry.register("share-read", testing).unwrap();
        let dispatcher = Dispatcher::new(registry, &config).with_clock(fixed_clock);
        let mut event = private("share-read", Some(""));

        dispatcher.handle(&mut event, None).unwrap();

        assert_eq!(
            event.narrative.as_deref(),
            Some("\n\n======= update (2024-03-05T09:07) =======\ntesting")
        );
    }
}
