//! Typed Rust client for Yalo WhatsApp notifications.
//!
//! The crate has three layers: a domain layer of strong types, a transport layer for
//! the JSON wire format, and a client layer that adds bearer auth, a request-rate
//! ceiling, retries with backoff and response classification.
//!
//! ```rust,no_run
//! use yalo::{
//!     AccountId, BearerToken, BotId, NotificationResult, NotificationType, RawPhoneNumber,
//!     RequestContext, YaloClient,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = YaloClient::new(
//!         AccountId::new("...")?,
//!         BotId::new("...")?,
//!         BearerToken::new("...")?,
//!     );
//!     let params = serde_json::json!({ "name": "Ana" });
//!     let result = client
//!         .send_notification(
//!             &RequestContext::background(),
//!             NotificationType::new("order_update")?,
//!             RawPhoneNumber::new("+15555550100")?,
//!             params.as_object().cloned().unwrap_or_default(),
//!             &[],
//!         )
//!         .await?;
//!     if let NotificationResult::Failure { reason } = result {
//!         eprintln!("rejected: {}", reason.description);
//!     }
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{
    BoxError, BoxFuture, DEFAULT_BASE_URL, DEFAULT_RATE_LIMIT_INTERVAL, HttpTransport, RawResponse,
    RequestContext, RetryPolicy, YaloClient, YaloClientBuilder, YaloError,
};
pub use domain::{
    AccountId, BearerToken, BotId, FailureDetail, FailureReason, NotificationOption,
    NotificationRequest, NotificationResult, NotificationType, Params, PhoneNumber, Priority,
    RawPhoneNumber, Recipient, ValidationError,
};
pub use tokio_util::sync::CancellationToken;
