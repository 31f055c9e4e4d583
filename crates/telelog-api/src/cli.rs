//! Operator CLI commands: inspect stored users and messages from a shell.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use crate::state::AppState;

/// Show stored statistics for one user.
pub async fn show_stats(state: &AppState, telegram_id: i64, json: bool) -> Result<()> {
    let Some((user, stats)) = state.service.user_stats(telegram_id).await? else {
        println!(
            "  {} No user with telegram id {}",
            style("i").blue().bold(),
            style(telegram_id).yellow()
        );
        return Ok(());
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "user": user,
                "stats": stats,
            }))?
        );
        return Ok(());
    }

    println!();
    println!(
        "  {} {}",
        style("User:").bold(),
        style(user.username.as_deref().unwrap_or("(no username)")).cyan()
    );
    println!("  {} {}", style("Telegram ID:").bold(), user.telegram_id);
    println!(
        "  {} {}",
        style("Status:").bold(),
        if user.is_active {
            style("active").green()
        } else {
            style("inactive").yellow()
        }
    );
    println!("  {} {}", style("Messages:").bold(), stats.message_count);
    println!(
        "  {} {}",
        style("First seen:").bold(),
        user.created_at.format("%Y-%m-%d %H:%M:%S")
    );
    if let Some(last) = stats.last_message_at {
        println!(
            "  {} {}",
            style("Last message:").bold(),
            last.format("%Y-%m-%d %H:%M:%S")
        );
    }
    println!();
    Ok(())
}

/// Show the most recent stored messages for one user.
pub async fn show_messages(
    state: &AppState,
    telegram_id: i64,
    limit: i64,
    json: bool,
) -> Result<()> {
    let messages = state.service.recent_messages(telegram_id, limit).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&messages)?);
        return Ok(());
    }

    if messages.is_empty() {
        println!();
        println!(
            "  {} No stored messages for telegram id {}",
            style("i").blue().bold(),
            style(telegram_id).yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Time").fg(Color::White),
        Cell::new("Kind").fg(Color::White),
        Cell::new("Chat").fg(Color::White),
        Cell::new("Text").fg(Color::White),
    ]);

    for msg in &messages {
        let preview: String = if msg.text.chars().count() > 60 {
            format!("{}...", msg.text.chars().take(57).collect::<String>())
        } else {
            msg.text.clone()
        };
        table.add_row(vec![
            Cell::new(msg.created_at.format("%Y-%m-%d %H:%M:%S")).fg(Color::DarkGrey),
            Cell::new(msg.kind.to_string()).fg(Color::Cyan),
            Cell::new(msg.chat_id),
            Cell::new(preview),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} message{}",
        style(messages.len()).bold(),
        if messages.len() == 1 { "" } else { "s" }
    );
    println!();
    Ok(())
}
