use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use serde::Deserialize;
use tracing::warn;

// Gmail pads body data inconsistently across messages
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

const PLAIN_TEXT_MIME_TYPE: &str = "text/plain";
const SUBJECT_HEADER: &str = "Subject";
const DEFAULT_SUBJECT: &str = "No Subject";

#[derive(Debug, Deserialize)]
pub struct MessageListResponse {
    #[serde(default)]
    pub messages: Vec<MessageRef>,
}

#[derive(Debug, Deserialize)]
pub struct MessageRef {
    pub id: String,
    #[serde(rename = "threadId", default)]
    pub thread_id: String,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    pub id: String,
    #[serde(default)]
    pub snippet: String,
    pub payload: MessagePayload,
}

impl Message {
    pub fn subject(&self) -> String {
        self.payload
            .headers
            .iter()
            .find(|header| header.name == SUBJECT_HEADER)
            .map(|header| header.value.to_string())
            .unwrap_or_else(|| DEFAULT_SUBJECT.to_string())
    }
}

/// One node of the MIME tree: either a container of further parts or a
/// leaf carrying base64-encoded body data.
#[derive(Debug, Default, Deserialize)]
pub struct MessagePayload {
    #[serde(rename = "mimeType", default)]
    pub mime_type: String,
    #[serde(default)]
    pub headers: Vec<Header>,
    #[serde(default)]
    pub body: Option<MessageBody>,
    #[serde(default)]
    pub parts: Vec<MessagePayload>,
}

impl MessagePayload {
    /**
    Depth-first search for the first text/plain part with body data,
    decoded to UTF-8. A partless payload decodes its own body.
    */
    pub fn plain_text_body(&self) -> Option<String> {
        if !self.parts.is_empty() {
            for part in &self.parts {
                if part.mime_type == PLAIN_TEXT_MIME_TYPE {
                    if let Some(decoded) = part.decode_body() {
                        return Some(decoded);
                    }
                } else if !part.parts.is_empty() {
                    if let Some(decoded) = part.plain_text_body() {
                        return Some(decoded);
                    }
                }
            }

            return None;
        }

        self.decode_body()
    }

    fn decode_body(&self) -> Option<String> {
        let data = self.body.as_ref()?.data.as_ref()?;

        let bytes = match URL_SAFE_LENIENT.decode(data) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!("Failed to decode body data: {}", err);
                return None;
            }
        };

        match String::from_utf8(bytes) {
            Ok(text) => Some(text),
            Err(err) => {
                warn!("Body data is not valid UTF-8: {}", err);
                None
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct MessageBody {
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub data: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(mime_type: &str, data: Option<&str>) -> MessagePayload {
        MessagePayload {
            mime_type: mime_type.to_string(),
            body: Some(MessageBody {
                size: data.map(|data| data.len() as u64).unwrap_or(0),
                data: data.map(str::to_string),
            }),
            ..Default::default()
        }
    }

    #[test_log::test]
    fn should_decode_a_single_plain_text_part() {
        let payload = MessagePayload {
            mime_type: "multipart/alternative".to_string(),
            parts: vec![leaf("text/plain", Some("SGVsbG8="))],
            ..Default::default()
        };

        assert_eq!(payload.plain_text_body(), Some("Hello".to_string()));
    }

    #[test_log::test]
    fn should_find_nothing_in_an_html_only_message() {
        let payload = MessagePayload {
            mime_type: "multipart/alternative".to_string(),
            parts: vec![leaf("text/html", Some("PGI+SGVsbG88L2I+"))],
            ..Default::default()
        };

        assert_eq!(payload.plain_text_body(), None);
    }

    #[test_log::test]
    fn should_return_the_first_plain_text_leaf_depth_first() {
        let nested = MessagePayload {
            mime_type: "multipart/alternative".to_string(),
            parts: vec![
                leaf("text/html", Some("PGI+Tm9wZTwvYj4=")),
                leaf("text/plain", Some("Rmlyc3Q=")),
            ],
            ..Default::default()
        };
        let payload = MessagePayload {
            mime_type: "multipart/mixed".to_string(),
            parts: vec![
                nested,
                leaf("text/plain", Some("U2Vjb25k")),
            ],
            ..Default::default()
        };

        assert_eq!(payload.plain_text_body(), Some("First".to_string()));
    }

    #[test_log::test]
    fn should_skip_a_plain_text_part_without_data() {
        let payload = MessagePayload {
            mime_type: "multipart/alternative".to_string(),
            parts: vec![
                leaf("text/plain", None),
                leaf("text/plain", Some("SGVsbG8=")),
            ],
            ..Default::default()
        };

        assert_eq!(payload.plain_text_body(), Some("Hello".to_string()));
    }

    #[test_log::test]
    fn should_decode_a_partless_payload_from_its_own_body() {
        let payload = leaf("text/plain", Some("SGVsbG8"));

        assert_eq!(payload.plain_text_body(), Some("Hello".to_string()));
    }

    #[test_log::test]
    fn should_deserialize_a_full_format_message() {
        let message = serde_json::from_str::<Message>(
            r##"
            {
              "id": "19842fa3b2",
              "threadId": "19842fa3b2",
              "snippet": "This week at the sanctuary...",
              "payload": {
                "mimeType": "multipart/alternative",
                "headers": [
                  { "name": "From", "value": "news@example.org" },
                  { "name": "Subject", "value": "Weekly Highlights" }
                ],
                "body": { "size": 0 },
                "parts": [
                  {
                    "mimeType": "text/plain",
                    "body": { "size": 5, "data": "SGVsbG8=" }
                  },
                  {
                    "mimeType": "text/html",
                    "body": { "size": 12, "data": "PGI+SGVsbG88L2I+" }
                  }
                ]
              }
            }
            "##,
        );

        assert!(message.is_ok(), "{:?}", message);

        let message = message.unwrap();

        assert_eq!(message.subject(), "Weekly Highlights");
        assert_eq!(message.payload.plain_text_body(), Some("Hello".to_string()));
    }

    #[test_log::test]
    fn should_default_the_subject_when_the_header_is_missing() {
        let message = Message {
            id: "19842fa3b2".to_string(),
            snippet: String::new(),
            payload: MessagePayload::default(),
        };

        assert_eq!(message.subject(), "No Subject");
    }

    #[test_log::test]
    fn should_deserialize_an_empty_message_list() {
        let response = serde_json::from_str::<MessageListResponse>(r##"{ "resultSizeEstimate": 0 }"##);

        assert!(response.is_ok(), "{:?}", response);
        assert!(response.unwrap().messages.is_empty());
    }
}
