//! The event subset the engine looks at.
//!
//! A management command is an ordinary VEVENT that a client creates with
//! `CLASS:PRIVATE` and a SUMMARY naming the command. Only those two
//! properties and DESCRIPTION matter here; everything else in the event
//! is carried untouched in the raw ICS text.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Event visibility marker (CLASS property).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    Public,
    Private,
    Confidential,
    /// IANA or X- value we don't know about
    Other(String),
}

impl Classification {
    pub fn from_ics_str(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "PUBLIC" => Classification::Public,
            "PRIVATE" => Classification::Private,
            "CONFIDENTIAL" => Classification::Confidential,
            other => Classification::Other(other.to_string()),
        }
    }

    pub fn as_ics_str(&self) -> &str {
        match self {
            Classification::Public => "PUBLIC",
            Classification::Private => "PRIVATE",
            Classification::Confidential => "CONFIDENTIAL",
            Classification::Other(s) => s,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ics_str())
    }
}

/// The subject of a management operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagementEvent {
    /// CLASS
    pub classification: Option<Classification>,
    /// SUMMARY, used as the command identifier
    pub summary: Option<String>,
    /// DESCRIPTION, the audit channel commands append to
    pub narrative: Option<String>,
}

impl ManagementEvent {
    pub fn new(
        classification: Option<Classification>,
        summary: Option<&str>,
        narrative: Option<&str>,
    ) -> Self {
        ManagementEvent {
            classification,
            summary: summary.map(str::to_string),
            narrative: narrative.map(str::to_string),
        }
    }

    pub fn is_private(&self) -> bool {
        self.classification == Some(Classification::Private)
    }

    /// SUMMARY with surrounding whitespace removed.
    pub fn command_name(&self) -> Option<&str> {
        self.summary.as_deref().map(str::trim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_parse_is_case_insensitive() {
        assert_eq!(Classification::from_ics_str("private"), Classification::Private);
        assert_eq!(Classification::from_ics_str(" PUBLIC "), Classification::Public);
        assert_eq!(
            Classification::from_ics_str("X-SECRET"),
            Classification::Other("X-SECRET".to_string())
        );
    }

    #[test]
    fn test_command_name_trims_summary() {
        let event = ManagementEvent::new(Some(Classification::Private), Some("  set-name \t"), None);
        assert_eq!(event.command_name(), Some("set-name"));
        assert!(event.is_private());
    }
}
