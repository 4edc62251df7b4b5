//! JSON shapes for the management endpoint.
//!
//! Shared by calmanage-server and the CLI's `--json` output.

use serde::{Deserialize, Serialize};

use crate::command::{BlockUpdate, Outcome};

/// Body of `POST /manage-event`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ManageRequest {
    /// Raw ICS text of the stored event
    pub ics: String,
}

/// What happened to the stored ICS text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewriteStatus {
    Rewritten,
    Skipped,
    Unchanged,
    NotRequested,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ManageResponse {
    NotACommand,
    Applied {
        command: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        narrative: Option<String>,
        rewrite: RewriteStatus,
        /// The ICS text to persist, present only when it was rewritten
        #[serde(skip_serializing_if = "Option::is_none")]
        ics: Option<String>,
    },
}

impl From<Outcome> for ManageResponse {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::NotAManagementCommand => ManageResponse::NotACommand,
            Outcome::Applied {
                command,
                narrative,
                block,
            } => {
                let (rewrite, ics) = match block {
                    BlockUpdate::Rewritten(raw) => (RewriteStatus::Rewritten, Some(raw)),
                    BlockUpdate::Skipped => (RewriteStatus::Skipped, None),
                    BlockUpdate::Unchanged => (RewriteStatus::Unchanged, None),
                    BlockUpdate::NotRequested => (RewriteStatus::NotRequested, None),
                };
                ManageResponse::Applied {
                    command,
                    narrative,
                    rewrite,
                    ics,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_json_shape() {
        let response = ManageResponse::from(Outcome::Applied {
            command: "set-name".to_string(),
            narrative: None,
            block: BlockUpdate::Unchanged,
        });

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "outcome": "applied",
                "command": "set-name",
                "rewrite": "unchanged"
            })
        );

        let json = serde_json::to_value(ManageResponse::from(Outcome::NotAManagementCommand)).unwrap();
        assert_eq!(json, serde_json::json!({ "outcome": "not_a_command" }));
    }

    #[test]
    fn test_rewritten_block_is_carried() {
        let response = ManageResponse::from(Outcome::Applied {
            command: "share-read".to_string(),
            narrative: Some("n".to_string()),
            block: BlockUpdate::Rewritten("DESCRIPTION:n\r\n".to_string()),
        });

        let ManageResponse::Applied { rewrite, ics, .. } = response else {
            panic!("expected applied");
        };
        assert_eq!(rewrite, RewriteStatus::Rewritten);
        assert_eq!(ics.as_deref(), Some("DESCRIPTION:n\r\n"));
    }
}
