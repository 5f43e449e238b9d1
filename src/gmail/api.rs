use crate::gmail::dto::{Message, MessageListResponse, MessageRef};
use crate::gmail::token::{self, StoredToken};
use lazy_static::lazy_static;
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::policies::ExponentialBackoff;
use reqwest_retry::RetryTransientMiddleware;
use serde::Deserialize;
use std::error::Error;
use std::path::Path;
use tracing::info;

const GMAIL_MESSAGES_URL: &str = "https://gmail.googleapis.com/gmail/v1/users/me/messages";
const MAX_RETRIES: u32 = 5;

lazy_static! {
    static ref REST_CLIENT: ClientWithMiddleware = ClientBuilder::new(Client::new())
        .with(RetryTransientMiddleware::new_with_policy(
            ExponentialBackoff::builder().build_with_max_retries(MAX_RETRIES)
        ))
        .build();
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

pub struct GmailAPI {
    access_token: String,
}

impl GmailAPI {
    /**
    Opens the stored token file, refreshing and writing it back when the
    access token has expired. The consent flow is not handled here; the
    file must already exist.
    */
    pub async fn connect(token_path: &Path) -> Result<Self, Box<dyn Error>> {
        let mut token = token::load(token_path)?;

        if token.is_expired() {
            info!("Access token expired, refreshing");

            token = Self::refresh(token).await?;
            token::store(token_path, &token)?;
        }

        Ok(Self {
            access_token: token.token.to_string(),
        })
    }

    async fn refresh(token: StoredToken) -> Result<StoredToken, Box<dyn Error>> {
        let response = REST_CLIENT
            .post(&token.token_uri)
            .form(&[
                ("client_id", token.client_id.as_str()),
                ("client_secret", token.client_secret.as_str()),
                ("refresh_token", token.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json::<RefreshResponse>()
            .await?;

        Ok(token.refreshed(response.access_token, response.expires_in))
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_messages(&self, max_results: u32) -> Result<Vec<MessageRef>, Box<dyn Error>> {
        let response = REST_CLIENT
            .get(format!("{}?maxResults={}", GMAIL_MESSAGES_URL, max_results))
            .bearer_auth(&self.access_token)
            .send()
            .await?
            .error_for_status()?
            .json::<MessageListResponse>()
            .await?;

        Ok(response.messages)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_message(&self, id: &str) -> Result<Message, Box<dyn Error>> {
        let message = REST_CLIENT
            .get(format!("{}/{}?format=full", GMAIL_MESSAGES_URL, id))
            .bearer_auth(&self.access_token)
            .send()
            .await?
            .error_for_status()?
            .json::<Message>()
            .await?;

        Ok(message)
    }
}
