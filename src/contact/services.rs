use anyhow::Context;
use tracing::{info, warn};

use crate::contact::repo_types::{Message, NewMessage};
use crate::state::AppState;

/// Persists one contact message, then forwards it to the mailer if one is configured.
/// Only the insert can fail the call.
pub async fn save_message(st: &AppState, message: NewMessage) -> anyhow::Result<Message> {
    let saved = st
        .messages
        .insert(message)
        .await
        .context("save contact message")?;
    info!(message_id = %saved.id, "contact message saved");

    if let Some(mailer) = &st.mailer {
        let (subject, body) = notification(&saved);
        if let Err(e) = mailer.notify(&subject, &body).await {
            warn!(error = ?e, message_id = %saved.id, "contact notification failed");
        }
    }

    Ok(saved)
}

fn notification(m: &Message) -> (String, String) {
    (
        format!("New contact message from {}", m.name),
        format!("Name: {}\nEmail: {}\n\n{}\n", m.name, m.email, m.message),
    )
}
