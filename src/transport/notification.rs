use serde::{Deserialize, Serialize};

use crate::domain::{
    AccountId, BotId, FailureDetail, FailureReason, NotificationRequest, NotificationResult,
    Params, Recipient,
};

#[derive(Debug, Serialize)]
pub struct NotificationJsonRequest<'a> {
    #[serde(rename = "type")]
    notification_type: &'a str,
    users: Vec<UserJson<'a>>,
}

#[derive(Debug, Serialize)]
struct UserJson<'a> {
    phone: &'a str,
    priority: &'a str,
    params: &'a Params,
}

impl<'a> From<&'a Recipient> for UserJson<'a> {
    fn from(value: &'a Recipient) -> Self {
        Self {
            phone: value.phone().raw(),
            priority: value.priority().as_str(),
            params: value.params(),
        }
    }
}

// Yalo sends `"id": ""` and `"message_ids": null` on failures, so every field but
// `success` is optional and nulls collapse to defaults.
#[derive(Debug, Deserialize)]
struct NotificationJsonResponse {
    success: bool,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    message_ids: Option<Vec<String>>,
    #[serde(default)]
    reason: Option<ReasonJson>,
}

#[derive(Debug, Deserialize)]
struct ReasonJson {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    details: Option<Vec<DetailJson>>,
}

#[derive(Debug, Deserialize)]
struct DetailJson {
    #[serde(default)]
    phone: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    parameter: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl From<ReasonJson> for FailureReason {
    fn from(value: ReasonJson) -> Self {
        Self {
            description: value.description.unwrap_or_default(),
            error_code: value.error.unwrap_or_default(),
            details: value
                .details
                .unwrap_or_default()
                .into_iter()
                .map(FailureDetail::from)
                .collect(),
        }
    }
}

impl From<DetailJson> for FailureDetail {
    fn from(value: DetailJson) -> Self {
        Self {
            phone: value.phone.unwrap_or_default(),
            kind: value.kind.unwrap_or_default(),
            parameter: value.parameter.unwrap_or_default(),
            description: value.description.unwrap_or_default(),
        }
    }
}

pub fn notifications_endpoint(account_id: &AccountId, bot_id: &BotId) -> String {
    format!(
        "/notifications/api/v1/accounts/{}/bots/{}/notifications",
        account_id.as_str(),
        bot_id.as_str()
    )
}

pub fn encode_notification_json(request: &NotificationRequest) -> NotificationJsonRequest<'_> {
    NotificationJsonRequest {
        notification_type: request.notification_type().as_str(),
        users: request.users().iter().map(UserJson::from).collect(),
    }
}

/// Decode a notification response body.
///
/// `success` is the only discriminant: a `reason` on a successful response is
/// ignored, and a failure without `reason` yields an empty [`FailureReason`].
pub fn decode_notification_json_response(
    json: &str,
) -> Result<NotificationResult, serde_json::Error> {
    let parsed: NotificationJsonResponse = serde_json::from_str(json)?;

    if parsed.success {
        return Ok(NotificationResult::Success {
            id: parsed.id.unwrap_or_default(),
            message_ids: parsed.message_ids.unwrap_or_default(),
        });
    }

    Ok(NotificationResult::Failure {
        reason: parsed.reason.map(FailureReason::from).unwrap_or_default(),
    })
}
