use serde::{Deserialize, Serialize};

/// Age spans the model may assign; the wire values are the spans themselves.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::EnumIter, strum::IntoStaticStr,
)]
pub enum AgeRange {
    #[serde(rename = "0-1")]
    #[strum(serialize = "0-1")]
    Infant,
    #[serde(rename = "1-3")]
    #[strum(serialize = "1-3")]
    Toddler,
    #[serde(rename = "3-6")]
    #[strum(serialize = "3-6")]
    YoungChild,
    #[serde(rename = "6-11")]
    #[strum(serialize = "6-11")]
    Child,
    #[serde(rename = "11-14")]
    #[strum(serialize = "11-14")]
    Adolescent,
    #[serde(rename = "14-18")]
    #[strum(serialize = "14-18")]
    Teen,
    #[serde(rename = "0-18")]
    #[strum(serialize = "0-18")]
    Youth,
    #[serde(rename = "18-65")]
    #[strum(serialize = "18-65")]
    Adult,
    #[serde(rename = "65-100")]
    #[strum(serialize = "65-100")]
    Senior,
}

/// One event pulled out of a newsletter body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedEvent {
    pub event_name: String,
    pub rating: AgeRange,
    pub event_link: String,
    pub event_location: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<ResponseCandidate>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, if any.
    pub fn text(&self) -> Option<String> {
        self.candidates.first().map(|candidate| {
            candidate
                .content
                .parts
                .iter()
                .map(|part| part.text.as_str())
                .collect()
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ResponseCandidate {
    #[serde(default)]
    pub content: ResponseContent,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResponseContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: String,
}
