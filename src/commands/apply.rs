use std::path::Path;

use anyhow::{Context, Result};
use calmanage_core::protocol::ManageResponse;
use calmanage_core::{Dispatcher, Outcome};

use crate::render::Render;

pub fn run(dispatcher: &Dispatcher, path: &Path, dry_run: bool, json: bool) -> Result<()> {
    let outcome = apply_file(dispatcher, path, dry_run)?;

    if json {
        let response = ManageResponse::from(outcome);
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!("{}", outcome.render());

    if dry_run {
        if let Some(raw) = outcome.rewritten_block() {
            println!();
            print!("{raw}");
        }
    }

    Ok(())
}

/// Run the command stored in `path`, saving the rewritten event unless `dry_run`.
pub fn apply_file(dispatcher: &Dispatcher, path: &Path, dry_run: bool) -> Result<Outcome> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let (_, outcome) = dispatcher
        .handle_ics(&content)
        .with_context(|| format!("Failed to apply {}", path.display()))?;

    if !dry_run {
        if let Some(raw) = outcome.rewritten_block() {
            std::fs::write(path, raw)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use calmanage_core::{BlockUpdate, EngineConfig};

    const SHARE_READ: &str = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:TEST\r\n\
BEGIN:VEVENT\r\n\
UID:cli-1\r\n\
CLASS:PRIVATE\r\n\
SUMMARY:share-read\r\n\
DESCRIPTION:requested\r\n\
DTSTART:20240101T100000Z\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

    fn dispatcher() -> Dispatcher {
        Dispatcher::from_config(&EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_apply_file_saves_rewritten_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cmd.ics");
        std::fs::write(&path, SHARE_READ).unwrap();

        let outcome = apply_file(&dispatcher(), &path, false).unwrap();
        assert!(matches!(
            outcome,
            Outcome::Applied {
                block: BlockUpdate::Rewritten(_),
                ..
            }
        ));

        let saved = std::fs::read_to_string(&path).unwrap();
        assert!(saved.contains("SUMMARY:share-read\r\nDESCRIPTION:requested\\n\\n======= update ("));
        assert!(saved.ends_with("DTSTART:20240101T100000Z\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n"));
    }

    #[test]
    fn test_apply_file_dry_run_leaves_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cmd.ics");
        std::fs::write(&path, SHARE_READ).unwrap();

        let outcome = apply_file(&dispatcher(), &path, true).unwrap();

        assert!(outcome.rewritten_block().is_some());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), SHARE_READ);
    }

    #[test]
    fn test_apply_file_ignores_ordinary_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meeting.ics");
        let ordinary = SHARE_READ.replace("CLASS:PRIVATE", "CLASS:PUBLIC");
        std::fs::write(&path, &ordinary).unwrap();

        let outcome = apply_file(&dispatcher(), &path, false).unwrap();

        assert_eq!(outcome, Outcome::NotAManagementCommand);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), ordinary);
    }
}
