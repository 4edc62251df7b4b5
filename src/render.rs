//! TUI rendering for engine outcomes.
//!
//! Extension traits that add colored terminal output to calmanage-core
//! types using owo_colors.

use calmanage_core::{BlockUpdate, Outcome};
use owo_colors::OwoColorize;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for BlockUpdate {
    fn render(&self) -> String {
        match self {
            BlockUpdate::Rewritten(_) => "DESCRIPTION rewritten".green().to_string(),
            BlockUpdate::Skipped => "no DESCRIPTION line, rewrite skipped".yellow().to_string(),
            BlockUpdate::Unchanged => "no changes".dimmed().to_string(),
            BlockUpdate::NotRequested => "not saved".dimmed().to_string(),
        }
    }
}

impl Render for Outcome {
    fn render(&self) -> String {
        match self {
            Outcome::NotAManagementCommand => "not a management command".dimmed().to_string(),
            Outcome::Applied { command, block, .. } => {
                format!("{} {} {}", "✓".green(), command.bold(), block.render())
            }
        }
    }
}
