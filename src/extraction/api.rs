use crate::extraction::dto::{AgeRange, ExtractedEvent, GenerateContentResponse};
use lazy_static::lazy_static;
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::policies::ExponentialBackoff;
use reqwest_retry::RetryTransientMiddleware;
use serde_json::{json, Value};
use std::env;
use strum::IntoEnumIterator;
use tracing::{error, info};

const GEMINI_GENERATE_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent";
const API_KEY_VAR: &str = "GEMINI_API_KEY";
const MAX_RETRIES: u32 = 5;

lazy_static! {
    static ref REST_CLIENT: ClientWithMiddleware = ClientBuilder::new(Client::new())
        .with(RetryTransientMiddleware::new_with_policy(
            ExponentialBackoff::builder().build_with_max_retries(MAX_RETRIES)
        ))
        .build();
}

pub struct GeminiAPI {
    api_key: String,
}

impl GeminiAPI {
    pub fn from_env() -> Self {
        Self {
            api_key: env::var(API_KEY_VAR)
                .unwrap_or_else(|_| panic!("{} must be set.", API_KEY_VAR)),
        }
    }

    /**
    Asks the model to pull event records out of a newsletter body,
    constrained to the response schema. An empty array means the body
    had no events.
    */
    #[tracing::instrument(skip(self, body))]
    pub async fn extract_events(&self, body: &str) -> Result<Vec<ExtractedEvent>, APIError> {
        info!("Extracting events from a {} character body", body.len());

        let prompt = format!(
            "Parse out any events in this newsletter {} (return nothing if there's no events) \
             and give them the most appropriate age rating based on the context. Also provide \
             the link to the event (if provided, usually starts with <http) and the location.",
            body
        );

        let request = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema()
            }
        });

        let response = REST_CLIENT
            .post(GEMINI_GENERATE_URL)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(APIError::RequestFailed)?
            .error_for_status()
            .map_err(|err| APIError::RequestFailed(err.into()))?
            .json::<GenerateContentResponse>()
            .await
            .map_err(|err| {
                error!("Response parse failed: {:?}", err);
                APIError::InvalidResponse
            })?;

        let text = match response.text() {
            Some(text) => text,
            None => {
                error!("Response carried no candidates");
                return Err(APIError::InvalidResponse);
            }
        };

        serde_json::from_str::<Vec<ExtractedEvent>>(&text).map_err(|err| {
            error!("Extracted JSON parse failed: {:?}", err);
            APIError::InvalidResponse
        })
    }
}

/// Schema the model's JSON reply must follow: an array of flat event
/// records with the rating constrained to the known age spans.
fn response_schema() -> Value {
    let ratings: Vec<&'static str> = AgeRange::iter().map(<&'static str>::from).collect();

    json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "event_name": { "type": "string" },
                "rating": { "type": "string", "enum": ratings },
                "event_link": { "type": "string" },
                "event_location": { "type": "string" }
            },
            "required": ["event_name", "rating", "event_link", "event_location"]
        }
    })
}

#[derive(Debug)]
pub enum APIError {
    RequestFailed(reqwest_middleware::Error),
    InvalidResponse,
}
