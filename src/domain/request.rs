use crate::domain::validation::ValidationError;
use crate::domain::value::{NotificationType, Priority, RawPhoneNumber};

/// Template parameters for one recipient.
///
/// The shape is defined by the template configured on the Yalo side; it is passed
/// through verbatim.
pub type Params = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Per-call adjustment of the recipient record, applied in order before sending.
pub enum NotificationOption {
    /// Override the default priority (`"1"`).
    Priority(Priority),
}

impl NotificationOption {
    /// Shortcut for [`NotificationOption::Priority`] with validation.
    pub fn priority(value: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self::Priority(Priority::new(value)?))
    }

    fn apply(&self, recipient: &mut Recipient) {
        match self {
            Self::Priority(priority) => recipient.priority = priority.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// One entry of the `users` array.
pub struct Recipient {
    phone: RawPhoneNumber,
    priority: Priority,
    params: Params,
}

impl Recipient {
    /// Create a recipient with the default priority.
    pub fn new(phone: RawPhoneNumber, params: Params) -> Self {
        Self {
            phone,
            priority: Priority::default(),
            params,
        }
    }

    pub fn phone(&self) -> &RawPhoneNumber {
        &self.phone
    }

    pub fn priority(&self) -> &Priority {
        &self.priority
    }

    pub fn params(&self) -> &Params {
        &self.params
    }
}

#[derive(Debug, Clone, PartialEq)]
/// A templated notification request.
///
/// The client always sends exactly one recipient per call; see
/// [`NotificationRequest::single`].
pub struct NotificationRequest {
    notification_type: NotificationType,
    users: Vec<Recipient>,
}

impl NotificationRequest {
    /// Build a single-recipient request, applying `options` in order (last write wins).
    pub fn single(
        notification_type: NotificationType,
        phone: RawPhoneNumber,
        params: Params,
        options: &[NotificationOption],
    ) -> Self {
        let mut recipient = Recipient::new(phone, params);
        for option in options {
            option.apply(&mut recipient);
        }
        Self {
            notification_type,
            users: vec![recipient],
        }
    }

    pub fn notification_type(&self) -> &NotificationType {
        &self.notification_type
    }

    pub fn users(&self) -> &[Recipient] {
        &self.users
    }
}
