use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::Path;

/// On-disk OAuth token in the Google authorized-user format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredToken {
    pub token: String,
    pub refresh_token: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    pub client_id: String,
    pub client_secret: String,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub expiry: Option<DateTime<Utc>>,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

impl StoredToken {
    pub fn is_expired(&self) -> bool {
        self.expiry
            .map(|expiry| expiry <= Utc::now())
            .unwrap_or(false)
    }

    /// Applies a refresh response. Google does not resend the refresh
    /// token, so the stored one is preserved.
    pub fn refreshed(self, access_token: String, expires_in: Option<i64>) -> Self {
        Self {
            token: access_token,
            expiry: expires_in.map(|seconds| Utc::now() + Duration::seconds(seconds)),
            ..self
        }
    }
}

pub fn load(path: &Path) -> Result<StoredToken, Box<dyn Error>> {
    let contents = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read token file {}: {}", path.display(), err))?;

    Ok(serde_json::from_str(&contents)?)
}

pub fn store(path: &Path, token: &StoredToken) -> Result<(), Box<dyn Error>> {
    fs::write(path, serde_json::to_string_pretty(token)?)?;

    Ok(())
}
