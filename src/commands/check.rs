use std::path::Path;

use anyhow::{Context, Result};
use calmanage_core::Dispatcher;
use calmanage_core::ics::parse_management_event;
use owo_colors::OwoColorize;

pub fn run(dispatcher: &Dispatcher, path: &Path, json: bool) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let event = parse_management_event(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    let is_command = dispatcher.is_management_command(&event);

    if json {
        let value = serde_json::json!({
            "is_command": is_command,
            "command": if is_command { event.command_name() } else { None },
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    match event.command_name() {
        Some(name) if is_command => println!("{} {}", "command:".green(), name.bold()),
        _ => println!("{}", "not a management command".dimmed()),
    }

    Ok(())
}
