use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use calmanage_core::Dispatcher;
use calmanage_core::ics::parse_management_event;
use dialoguer::Confirm;
use owo_colors::OwoColorize;

use super::apply::apply_file;
use crate::render::Render;

pub fn run(dispatcher: &Dispatcher, dir: &Path, dry_run: bool, force: bool) -> Result<()> {
    let candidates = find_commands(dispatcher, dir)?;

    if candidates.is_empty() {
        println!("{}", "No management commands found".dimmed());
        return Ok(());
    }

    for (path, command) in &candidates {
        println!("   {} {}", command.bold(), display_name(path).dimmed());
    }

    if !dry_run && !force {
        println!();
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Apply {} {}?",
                candidates.len(),
                if candidates.len() == 1 { "command" } else { "commands" }
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            return Ok(());
        }
    }

    println!();
    let mut failures = 0;
    for (path, _) in &candidates {
        match apply_file(dispatcher, path, dry_run) {
            Ok(outcome) => println!("{} {}", display_name(path), outcome.render()),
            Err(e) => {
                failures += 1;
                println!("{} {}", display_name(path), format!("{e:#}").red());
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} commands failed", failures, candidates.len());
    }

    Ok(())
}

/// `.ics` files in `dir` holding a management command, sorted by path,
/// paired with the command name. Unparsable files are skipped.
pub fn find_commands(dispatcher: &Dispatcher, dir: &Path) -> Result<Vec<(PathBuf, String)>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "ics"))
        .collect();
    paths.sort();

    let mut found = Vec::new();
    for path in paths {
        let Ok(content) = std::fs::read_to_string(&path) else {
            continue;
        };
        let event = match parse_management_event(&content) {
            Ok(event) => event,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Skipping unparsable file");
                continue;
            }
        };
        if dispatcher.is_management_command(&event) {
            if let Some(name) = event.command_name() {
                found.push((path.clone(), name.to_string()));
            }
        }
    }

    Ok(found)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
