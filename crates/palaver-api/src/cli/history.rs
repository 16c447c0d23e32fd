//! Chat history CLI commands: list, add, clear.

use anyhow::Result;
use chrono::SecondsFormat;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::Confirm;

use palaver_types::chat::{ChatMessage, ROLE_ASSISTANT, ROLE_USER};

use crate::state::AppState;

/// Longest content preview shown in the table before truncation.
const PREVIEW_CHARS: usize = 80;

/// List all stored messages in insertion order.
pub async fn list_messages(state: &AppState, json: bool) -> Result<()> {
    let messages = state.history()?.list_all().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&messages)?);
        return Ok(());
    }

    if messages.is_empty() {
        println!();
        println!("  No messages stored.");
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Time").fg(Color::White),
        Cell::new("Role").fg(Color::White),
        Cell::new("Content").fg(Color::White),
    ]);

    for message in &messages {
        table.add_row(vec![
            Cell::new(message.created_at.to_rfc3339_opts(SecondsFormat::Secs, true))
                .fg(Color::DarkGrey),
            role_cell(message),
            Cell::new(preview(&message.content)),
        ]);
    }

    println!("{table}");
    println!(
        "  {}",
        style(format!("{} message(s)", messages.len())).dim()
    );

    Ok(())
}

/// Append a message.
pub async fn add_message(state: &AppState, role: &str, content: &str, json: bool) -> Result<()> {
    let receipt = state.history()?.append(role, content).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&receipt)?);
    } else {
        println!(
            "  {} Stored message {}",
            style("✓").green().bold(),
            style(receipt.id).dim()
        );
    }

    Ok(())
}

/// Remove every stored message, confirming first unless `force`.
pub async fn clear_messages(state: &AppState, force: bool, json: bool) -> Result<()> {
    let history = state.history()?;

    if !force && !json {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Permanently delete {} stored messages?",
                style("all").red().bold()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    let removed = history.clear_all().await?;

    if json {
        println!(
            "{}",
            serde_json::json!({"status": "cleared", "removed": removed})
        );
    } else {
        println!(
            "  {} Cleared {} message(s)",
            style("✓").green().bold(),
            removed
        );
    }

    Ok(())
}

fn role_cell(message: &ChatMessage) -> Cell {
    let cell = Cell::new(&message.role);
    match message.role.as_str() {
        ROLE_USER => cell.fg(Color::Cyan),
        ROLE_ASSISTANT => cell.fg(Color::Green),
        _ => cell,
    }
}

/// First line of `content`, cut to [`PREVIEW_CHARS`] characters.
fn preview(content: &str) -> String {
    let first_line = content.lines().next().unwrap_or_default();
    let mut out: String = first_line.chars().take(PREVIEW_CHARS).collect();
    if first_line.chars().count() > PREVIEW_CHARS || content.lines().nth(1).is_some() {
        out.push('…');
    }
    out
}
