//! One-shot completion command.

use anyhow::Result;
use console::style;
use uuid::Uuid;

use crate::state::AppState;

/// Relay `message` upstream and print the normalized reply.
///
/// # Examples
///
/// ```bash
/// palaver ask "What is the capital of France?"
/// palaver ask --json "hi"
/// ```
pub async fn ask(state: &AppState, message: &str, json: bool) -> Result<()> {
    let relay = state.relay()?;
    let correlation_id = Uuid::now_v7().to_string();

    let result = relay.complete(message, &correlation_id).await?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "response": result.content,
                "request_id": result.correlation_id,
            })
        );
    } else {
        println!();
        println!("  {}", result.content);
        println!();
        println!(
            "  {}",
            style(format!("request {}", result.correlation_id)).dim()
        );
    }

    Ok(())
}
