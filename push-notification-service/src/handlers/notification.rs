use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
};

use crate::error::NotificationError;
use crate::models::{NotificationPayload, NotificationRequest, TopicMessage};
use crate::services::record_dispatch;
use crate::AppState;

pub const SENT_MESSAGE: &str = "Successfully sent message";

/// Send a push notification to a topic
///
/// The body is read as raw bytes so that malformed, untyped or non-JSON
/// payloads end in the same 400 as missing fields instead of an extractor
/// rejection. Bodies not declared as JSON are treated as empty.
#[utoipa::path(
    post,
    path = "/send-notification",
    request_body = NotificationRequest,
    responses(
        (status = 200, description = "Successfully sent message", body = String),
        (status = 400, description = "Missing required parameters", body = String),
        (status = 500, description = "Error sending message", body = String)
    ),
    tag = "Notifications"
)]
#[tracing::instrument(skip_all)]
pub async fn send_notification(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, &'static str), NotificationError> {
    let provider = state.push_provider.name();
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());

    let payload = NotificationPayload::from_body(content_type, &body);

    let request = NotificationRequest::try_from(payload).map_err(|errors| {
        let fields: Vec<_> = errors.field_errors().into_keys().collect();
        tracing::warn!(?fields, "Rejected notification with missing parameters");
        record_dispatch(provider, "rejected");
        NotificationError::from(errors)
    })?;

    let message = TopicMessage::from(request);

    match state.push_provider.send(&message).await {
        Ok(response) => {
            record_dispatch(provider, "sent");
            tracing::info!(
                topic = %message.topic,
                message_id = %response.message_id,
                "Successfully sent message"
            );
            Ok((StatusCode::OK, SENT_MESSAGE))
        }
        Err(e) => {
            record_dispatch(provider, "failed");
            tracing::error!(
                topic = %message.topic,
                error = %e,
                error_kind = e.kind(),
                "Error sending message"
            );
            Err(NotificationError::from(e))
        }
    }
}
