use fledge::config::env_loader::load_inbox_config;
use fledge::extraction::api::GeminiAPI;
use fledge::gmail::api::GmailAPI;
use fledge::gmail::model::is_newsletter;
use std::error::Error;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    if let Err(err) = run().await {
        error!("Inbox extraction failed: {}", err);
    }
}

async fn run() -> Result<(), Box<dyn Error>> {
    let config = load_inbox_config();

    let gmail = GmailAPI::connect(&config.token_path).await?;
    let gemini = GeminiAPI::from_env();

    let messages = gmail.list_messages(config.max_results).await?;

    if messages.is_empty() {
        info!("No messages found.");
        return Ok(());
    }

    for message_ref in messages {
        let message = match gmail.get_message(&message_ref.id).await {
            Ok(message) => message,
            Err(err) => {
                warn!("Failed to fetch message {}: {}", message_ref.id, err);
                continue;
            }
        };

        let subject = message.subject();

        if !is_newsletter(&subject) {
            info!("Skipping '{}': not a newsletter", subject);
            continue;
        }

        let body = match message.payload.plain_text_body() {
            Some(body) => body,
            None => {
                warn!("No plain text body in '{}'", subject);
                continue;
            }
        };

        match gemini.extract_events(&body).await {
            Ok(events) => {
                info!("Extracted {} events from '{}'", events.len(), subject);

                println!("{}", serde_json::to_string_pretty(&events)?);
            }
            Err(err) => {
                warn!("Extraction failed for '{}': {:?}", subject, err);
            }
        }
    }

    Ok(())
}
