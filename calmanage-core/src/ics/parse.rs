//! ICS parsing using the icalendar crate's parser.

use icalendar::parser::{read_calendar, unfold};

use super::fold::unescape_text;
use crate::error::{CommandError, CommandResult};
use crate::event::{Classification, ManagementEvent};

/// Parse the first VEVENT of `content` into a [`ManagementEvent`].
pub fn parse_management_event(content: &str) -> CommandResult<ManagementEvent> {
    let unfolded = unfold(content);
    let calendar = read_calendar(&unfolded).map_err(|e| CommandError::IcsParse(e.to_string()))?;

    let vevent = calendar
        .components
        .iter()
        .find(|c| c.name == "VEVENT")
        .ok_or_else(|| CommandError::IcsParse("No VEVENT component found".into()))?;

    let classification = vevent
        .find_prop("CLASS")
        .map(|p| Classification::from_ics_str(p.val.as_ref()));
    let summary = vevent
        .find_prop("SUMMARY")
        .map(|p| unescape_text(p.val.as_ref()));
    let narrative = vevent
        .find_prop("DESCRIPTION")
        .map(|p| unescape_text(p.val.as_ref()));

    Ok(ManagementEvent {
        classification,
        summary,
        narrative,
    })
}
