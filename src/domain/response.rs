#[derive(Debug, Clone, PartialEq, Eq)]
/// Outcome reported by Yalo for a notification request.
///
/// A [`NotificationResult::Failure`] is a regular response, not an error: the request
/// reached Yalo and was rejected (for example because a template parameter is missing).
pub enum NotificationResult {
    Success {
        id: String,
        message_ids: Vec<String>,
    },
    Failure {
        reason: FailureReason,
    },
}

impl NotificationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The rejection reason, if any.
    pub fn reason(&self) -> Option<&FailureReason> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { reason } => Some(reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FailureReason {
    pub description: String,
    /// Machine-readable code (`error` on the wire), e.g. `validation_error`.
    pub error_code: String,
    pub details: Vec<FailureDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FailureDetail {
    pub phone: String,
    /// Detail type (`type` on the wire), e.g. `invalid-button-param`.
    pub kind: String,
    /// Path of the offending template parameter, e.g. `buttons.0.parameters.text`.
    pub parameter: String,
    pub description: String,
}
