//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod validation;
mod value;

pub use request::{NotificationOption, NotificationRequest, Params, Recipient};
pub use response::{FailureDetail, FailureReason, NotificationResult};
pub use validation::ValidationError;
pub use value::{
    AccountId, BearerToken, BotId, NotificationType, PhoneNumber, Priority, RawPhoneNumber,
};

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn params() -> Params {
        json!({ "name": "Ana" }).as_object().cloned().unwrap()
    }

    #[test]
    fn identifiers_reject_empty() {
        assert!(matches!(
            AccountId::new("   "),
            Err(ValidationError::Empty {
                field: AccountId::FIELD
            })
        ));
        assert!(matches!(
            BotId::new(""),
            Err(ValidationError::Empty {
                field: BotId::FIELD
            })
        ));
        assert!(matches!(
            NotificationType::new(" "),
            Err(ValidationError::Empty {
                field: NotificationType::FIELD
            })
        ));
        assert!(matches!(
            RawPhoneNumber::new(""),
            Err(ValidationError::Empty {
                field: RawPhoneNumber::FIELD
            })
        ));
    }

    #[test]
    fn identifiers_are_trimmed() {
        assert_eq!(AccountId::new(" acc ").unwrap().as_str(), "acc");
        assert_eq!(RawPhoneNumber::new(" +15555550100 ").unwrap().raw(), "+15555550100");
    }

    #[test]
    fn token_rejects_header_unsafe_characters() {
        assert!(matches!(
            BearerToken::new("abc def"),
            Err(ValidationError::InvalidToken)
        ));
        assert!(matches!(
            BearerToken::new("abc\u{e9}"),
            Err(ValidationError::InvalidToken)
        ));
        assert!(BearerToken::new("abc.def-123_XYZ").is_ok());
    }

    #[test]
    fn token_debug_and_redacted_show_only_prefix() {
        let token = BearerToken::new("0123456789SECRETSECRET").unwrap();
        assert_eq!(token.redacted(), "0123456789...");
        let debug = format!("{token:?}");
        assert!(debug.contains("0123456789..."));
        assert!(!debug.contains("SECRET"));
    }

    #[test]
    fn short_token_redacts_without_panicking() {
        let token = BearerToken::new("abc").unwrap();
        assert_eq!(token.redacted(), "abc...");
    }

    #[test]
    fn phone_number_parses_with_region_and_trims() {
        let pn = PhoneNumber::parse(Some(phonenumber::country::Id::US), " 5555550100 ").unwrap();
        assert_eq!(pn.raw(), "5555550100");
        assert_eq!(pn.e164(), "+15555550100");
    }

    #[test]
    fn raw_phone_number_from_phone_number_uses_e164() {
        let pn = PhoneNumber::parse(Some(phonenumber::country::Id::RU), "79251234567").unwrap();
        let raw: RawPhoneNumber = pn.into();
        assert_eq!(raw.raw(), "+79251234567");
    }

    #[test]
    fn phone_number_rejects_garbage() {
        assert!(matches!(
            PhoneNumber::parse(None, "not a number"),
            Err(ValidationError::InvalidPhoneNumber { .. })
        ));
    }

    #[test]
    fn single_request_defaults_priority_to_one() {
        let request = NotificationRequest::single(
            NotificationType::new("order_update").unwrap(),
            RawPhoneNumber::new("+15555550100").unwrap(),
            params(),
            &[],
        );
        assert_eq!(request.users().len(), 1);
        assert_eq!(request.users()[0].priority().as_str(), "1");
        assert_eq!(request.users()[0].params(), &params());
    }

    #[test]
    fn options_apply_in_order_and_last_write_wins() {
        let request = NotificationRequest::single(
            NotificationType::new("order_update").unwrap(),
            RawPhoneNumber::new("+15555550100").unwrap(),
            params(),
            &[
                NotificationOption::priority("3").unwrap(),
                NotificationOption::priority("2").unwrap(),
            ],
        );
        assert_eq!(request.users()[0].priority().as_str(), "2");
    }

    #[test]
    fn priority_option_rejects_empty() {
        assert!(NotificationOption::priority("  ").is_err());
    }

    #[test]
    fn result_accessors() {
        let ok = NotificationResult::Success {
            id: "abc".to_owned(),
            message_ids: vec!["m1".to_owned()],
        };
        assert!(ok.is_success());
        assert!(ok.reason().is_none());

        let failed = NotificationResult::Failure {
            reason: FailureReason::default(),
        };
        assert!(!failed.is_success());
        assert!(failed.reason().is_some());
    }
}
