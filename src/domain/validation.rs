use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    InvalidPhoneNumber { input: String },
    InvalidToken,
    InvalidBaseUrl { input: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::InvalidPhoneNumber { input } => write!(f, "invalid phone number: {input}"),
            Self::InvalidToken => write!(
                f,
                "token must contain only visible ASCII characters and no whitespace"
            ),
            Self::InvalidBaseUrl { input } => {
                write!(f, "invalid base URL (expected http or https): {input}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::ValidationError;

    #[test]
    fn display_messages_are_human_readable() {
        let err = ValidationError::Empty { field: "phone" };
        assert_eq!(err.to_string(), "phone must not be empty");

        let err = ValidationError::InvalidPhoneNumber {
            input: "bad".to_owned(),
        };
        assert_eq!(err.to_string(), "invalid phone number: bad");

        let err = ValidationError::InvalidBaseUrl {
            input: "ftp://x".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "invalid base URL (expected http or https): ftp://x"
        );
    }

    #[test]
    fn token_message_does_not_echo_the_secret() {
        let err = ValidationError::InvalidToken;
        assert!(!err.to_string().contains("Bearer"));
    }
}
