use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

/// Raw inbound body of `POST /send-notification`.
///
/// Fields stay as untyped JSON until [`NotificationRequest::try_from`]
/// decides whether they are usable. A body that is not declared as JSON, or
/// that is not a JSON object, yields an empty payload.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct NotificationPayload {
    pub topic: Option<Value>,
    pub title: Option<Value>,
    pub body: Option<Value>,
}

impl NotificationPayload {
    /// Parses `bytes` only when `content_type` is `application/json` or a
    /// `+json` suffix type.
    pub fn from_body(content_type: Option<&str>, bytes: &[u8]) -> Self {
        if content_type.is_some_and(is_json_content_type) {
            Self::from_bytes(bytes)
        } else {
            Self::default()
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(bytes) {
            Ok(Value::Object(mut map)) => Self {
                topic: map.remove("topic"),
                title: map.remove("title"),
                body: map.remove("body"),
            },
            _ => Self::default(),
        }
    }
}

fn is_json_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

/// A validated request to notify every device subscribed to `topic`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct NotificationRequest {
    #[validate(length(min = 1, message = "topic is required"))]
    #[schema(example = "common")]
    pub topic: String,
    #[validate(length(min = 1, message = "title is required"))]
    #[schema(example = "New Notification")]
    pub title: String,
    #[validate(length(min = 1, message = "body is required"))]
    #[schema(example = "This is a test notification")]
    pub body: String,
}

impl TryFrom<NotificationPayload> for NotificationRequest {
    type Error = validator::ValidationErrors;

    /// Non-string values are treated the same as absent ones.
    fn try_from(payload: NotificationPayload) -> Result<Self, Self::Error> {
        let request = Self {
            topic: string_field(payload.topic),
            title: string_field(payload.title),
            body: string_field(payload.body),
        };
        request.validate()?;
        Ok(request)
    }
}

fn string_field(value: Option<Value>) -> String {
    match value {
        Some(Value::String(s)) => s,
        _ => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

/// Message handed to the delivery provider. Serializes to the FCM v1
/// `message` shape: `{"notification": {"title", "body"}, "topic"}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicMessage {
    pub notification: Notification,
    pub topic: String,
}

impl From<NotificationRequest> for TopicMessage {
    fn from(request: NotificationRequest) -> Self {
        Self {
            notification: Notification {
                title: request.title,
                body: request.body,
            },
            topic: request.topic,
        }
    }
}
