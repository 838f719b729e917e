//! Client layer: rate limiting, retries and response classification around the
//! transport, plus the notification façade.

mod context;
mod http;
mod rate_limit;
mod retry;

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::{
    AccountId, BearerToken, BotId, NotificationOption, NotificationRequest, NotificationResult,
    NotificationType, Params, RawPhoneNumber, ValidationError,
};

pub use context::RequestContext;
pub use http::{BoxError, BoxFuture, HttpTransport, RawResponse};
pub use rate_limit::DEFAULT_RATE_LIMIT_INTERVAL;
pub use retry::RetryPolicy;

use http::ReqwestTransport;
use rate_limit::RateGate;
use retry::is_retryable_status;

/// Production Yalo API host.
pub const DEFAULT_BASE_URL: &str = "https://api-global.yalochat.com";

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`YaloClient`].
///
/// A notification that Yalo rejects (`"success": false`) is not an error; it is returned
/// as [`NotificationResult::Failure`].
pub enum YaloError {
    /// The client is missing settings required for the call (checked before any I/O).
    #[error("configuration error: {0}")]
    Configuration(&'static str),

    /// One of the domain constructors or builder settings rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The payload could not be encoded as JSON.
    #[error("serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// HTTP client / network failure (DNS, TLS, timeouts, etc) after all retries.
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    /// Yalo kept answering with a retryable status (429 or 5xx) until the retry
    /// policy gave up. The last response is attached.
    #[error("giving up after {attempts} attempts (status {})", .response.status)]
    RetriesExhausted { attempts: u32, response: RawResponse },

    /// Yalo answered with a body that is not JSON (e.g. an HTML gateway error page).
    #[error("API returned non-JSON response (status {})", .0.status)]
    NonJsonResponse(RawResponse),

    /// The body is JSON but does not have the expected shape.
    #[error("could not decode response (status {}): {source}", .response.status)]
    Decode {
        #[source]
        source: serde_json::Error,
        response: RawResponse,
    },

    /// The [`RequestContext`] cancellation token fired.
    #[error("request cancelled")]
    Cancelled,

    /// The [`RequestContext`] deadline passed.
    #[error("request deadline exceeded")]
    DeadlineExceeded,
}

impl YaloError {
    /// The raw response attached to this error, if one was received.
    pub fn raw_response(&self) -> Option<&RawResponse> {
        match self {
            Self::NonJsonResponse(response)
            | Self::Decode { response, .. }
            | Self::RetriesExhausted { response, .. } => Some(response),
            _ => None,
        }
    }
}

#[derive(Clone)]
/// Builder for [`YaloClient`].
///
/// Settings are applied in call order; a later call overrides an earlier one.
pub struct YaloClientBuilder {
    base_url: String,
    account_id: Option<AccountId>,
    bot_id: Option<BotId>,
    token: Option<BearerToken>,
    debug: bool,
    retry: RetryPolicy,
    rate_limit_interval: Duration,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    http: Option<Arc<dyn HttpTransport>>,
}

impl YaloClientBuilder {
    /// Create a builder with the production base URL, default retry policy and a
    /// 40 requests/second ceiling.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            account_id: None,
            bot_id: None,
            token: None,
            debug: false,
            retry: RetryPolicy::default(),
            rate_limit_interval: DEFAULT_RATE_LIMIT_INTERVAL,
            timeout: None,
            user_agent: None,
            http: None,
        }
    }

    /// Override the API base URL (scheme and host, optionally a path prefix).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set both the account and the bot the notifications are sent from.
    pub fn account(mut self, account_id: AccountId, bot_id: BotId) -> Self {
        self.account_id = Some(account_id);
        self.bot_id = Some(bot_id);
        self
    }

    pub fn account_id(mut self, account_id: AccountId) -> Self {
        self.account_id = Some(account_id);
        self
    }

    pub fn bot_id(mut self, bot_id: BotId) -> Self {
        self.bot_id = Some(bot_id);
        self
    }

    /// Send `Authorization: Bearer <token>` with every request.
    pub fn token(mut self, token: BearerToken) -> Self {
        self.token = Some(token);
        self
    }

    /// Log requests and responses at `DEBUG` level (the token is truncated).
    ///
    /// The events go through `tracing` under the `yalo` target, so they only show up
    /// when the installed subscriber enables it, e.g. `RUST_LOG=yalo=debug` with an
    /// `EnvFilter`. Retries are logged at `WARN` whether or not this flag is set.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Minimum spacing between requests of this client (and its clones).
    pub fn rate_limit_interval(mut self, interval: Duration) -> Self {
        self.rate_limit_interval = interval;
        self
    }

    /// Set an HTTP client timeout applied to each attempt.
    ///
    /// Ignored when a custom transport is injected with [`Self::http_transport`].
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    ///
    /// Ignored when a custom transport is injected with [`Self::http_transport`].
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Replace the reqwest-based transport, e.g. with a preconfigured client or a fake.
    pub fn http_transport(mut self, http: Arc<dyn HttpTransport>) -> Self {
        self.http = Some(http);
        self
    }

    /// Build a [`YaloClient`].
    pub fn build(self) -> Result<YaloClient, YaloError> {
        let base_url = normalize_base_url(&self.base_url)?;

        if self.rate_limit_interval.is_zero() {
            return Err(YaloError::Configuration(
                "rate limit interval must be non-zero",
            ));
        }

        let http = match self.http {
            Some(http) => http,
            None => {
                let mut builder = reqwest::Client::builder();
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                if let Some(user_agent) = self.user_agent {
                    builder = builder.user_agent(user_agent);
                }
                let client = builder
                    .build()
                    .map_err(|err| YaloError::Transport(Box::new(err)))?;
                Arc::new(ReqwestTransport { client })
            }
        };

        Ok(YaloClient {
            base_url,
            account_id: self.account_id,
            bot_id: self.bot_id,
            token: self.token,
            debug: self.debug,
            retry: self.retry,
            gate: Arc::new(RateGate::new(self.rate_limit_interval)),
            http,
        })
    }
}

impl Default for YaloClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_base_url(input: &str) -> Result<String, ValidationError> {
    let trimmed = input.trim().trim_end_matches('/');
    let invalid = || ValidationError::InvalidBaseUrl {
        input: input.to_owned(),
    };
    let parsed = url::Url::parse(trimmed).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host().is_none() {
        return Err(invalid());
    }
    Ok(trimmed.to_owned())
}

#[derive(Clone)]
/// Yalo notifications client.
///
/// Every call waits for a rate-limit ticket, then POSTs JSON with up to
/// [`RetryPolicy::max_retries`] retries on transient failures. Clones share the
/// rate-limit gate and the HTTP connection pool, so one client can be used from many
/// tasks at once.
pub struct YaloClient {
    base_url: String,
    account_id: Option<AccountId>,
    bot_id: Option<BotId>,
    token: Option<BearerToken>,
    debug: bool,
    retry: RetryPolicy,
    gate: Arc<RateGate>,
    http: Arc<dyn HttpTransport>,
}

impl YaloClient {
    /// Create a client for the production API with default settings.
    ///
    /// For more customization, use [`YaloClient::builder`].
    pub fn new(account_id: AccountId, bot_id: BotId, token: BearerToken) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            account_id: Some(account_id),
            bot_id: Some(bot_id),
            token: Some(token),
            debug: false,
            retry: RetryPolicy::default(),
            gate: Arc::new(RateGate::new(DEFAULT_RATE_LIMIT_INTERVAL)),
            http: Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
            }),
        }
    }

    /// Start building a client with custom settings.
    pub fn builder() -> YaloClientBuilder {
        YaloClientBuilder::new()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn account_id(&self) -> Option<&AccountId> {
        self.account_id.as_ref()
    }

    pub fn bot_id(&self) -> Option<&BotId> {
        self.bot_id.as_ref()
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    pub fn rate_limit_interval(&self) -> Duration {
        self.gate.period()
    }

    /// POST `json_body` to `{base_url}{endpoint}`.
    ///
    /// Errors:
    /// - [`YaloError::Transport`] when the last attempt failed at the network level,
    /// - [`YaloError::RetriesExhausted`] when the last attempt still got 429 or 5xx,
    /// - [`YaloError::NonJsonResponse`] when the body is not JSON (the response is attached),
    /// - [`YaloError::Cancelled`] / [`YaloError::DeadlineExceeded`] when `ctx` fires.
    ///
    /// Other non-2xx responses with a JSON body are returned as `Ok`; inspect
    /// [`RawResponse::status`].
    pub async fn send(
        &self,
        ctx: &RequestContext,
        endpoint: &str,
        json_body: &str,
    ) -> Result<RawResponse, YaloError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let headers = self.request_headers()?;

        ctx.run(async {
            self.gate.acquire().await;

            if self.debug {
                debug!(url = %url, body = %json_body, "sending request");
                if let Some(token) = self.token.as_ref() {
                    debug!(authorization = %format!("Bearer {}", token.redacted()), "using bearer token");
                }
            }

            let response = self.execute_with_retry(&url, &headers, json_body).await?;

            if self.debug {
                debug!(status = response.status, body = %response.body, "received response");
            }

            if !response.is_json() {
                return Err(YaloError::NonJsonResponse(response));
            }
            Ok(response)
        })
        .await
    }

    /// Serialize `payload` to JSON and [`send`](Self::send) it.
    pub async fn send_with_payload<T>(
        &self,
        ctx: &RequestContext,
        endpoint: &str,
        payload: &T,
    ) -> Result<RawResponse, YaloError>
    where
        T: Serialize + ?Sized,
    {
        let json = serde_json::to_string(payload).map_err(YaloError::Serialization)?;
        self.send(ctx, endpoint, &json).await
    }

    /// Send a templated WhatsApp notification to one recipient.
    ///
    /// `params` is passed through verbatim; `options` are applied in order to the
    /// recipient record (the last priority wins).
    ///
    /// Errors:
    /// - [`YaloError::Configuration`] when the account or bot id is not set (no request
    ///   is made),
    /// - any error of [`send`](Self::send), unchanged,
    /// - [`YaloError::Decode`] when the JSON body is not a notification response.
    pub async fn send_notification(
        &self,
        ctx: &RequestContext,
        notification_type: NotificationType,
        phone: RawPhoneNumber,
        params: Params,
        options: &[NotificationOption],
    ) -> Result<NotificationResult, YaloError> {
        let (Some(account_id), Some(bot_id)) = (self.account_id.as_ref(), self.bot_id.as_ref())
        else {
            return Err(YaloError::Configuration("account_id and bot_id are required"));
        };

        let endpoint = crate::transport::notifications_endpoint(account_id, bot_id);
        let request = NotificationRequest::single(notification_type, phone, params, options);

        let response = self
            .send_with_payload(
                ctx,
                &endpoint,
                &crate::transport::encode_notification_json(&request),
            )
            .await?;

        crate::transport::decode_notification_json_response(&response.body)
            .map_err(|source| YaloError::Decode { source, response })
    }

    fn request_headers(&self) -> Result<HeaderMap, YaloError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = self.token.as_ref() {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose()))
                .map_err(|_| ValidationError::InvalidToken)?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }

    async fn execute_with_retry(
        &self,
        url: &str,
        headers: &HeaderMap,
        body: &str,
    ) -> Result<RawResponse, YaloError> {
        let max_attempts = self.retry.max_retries.saturating_add(1);
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            let delay = match self.http.post_json(url, headers, body).await {
                Ok(response) if is_retryable_status(response.status) && attempt < max_attempts => {
                    let delay = self
                        .retry
                        .backoff_for_response(attempt - 1, &response.headers);
                    warn!(
                        status = response.status,
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        url,
                        "retryable status, retrying"
                    );
                    delay
                }
                Ok(response) if is_retryable_status(response.status) => {
                    warn!(
                        status = response.status,
                        attempts = attempt,
                        url,
                        "retryable status persisted, giving up"
                    );
                    return Err(YaloError::RetriesExhausted {
                        attempts: attempt,
                        response,
                    });
                }
                Ok(response) => return Ok(response),
                Err(err) if attempt < max_attempts => {
                    let delay = self.retry.backoff(attempt - 1);
                    warn!(
                        error = %err,
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        url,
                        "request failed, retrying"
                    );
                    delay
                }
                Err(err) => return Err(YaloError::Transport(err)),
            };
            tokio::time::sleep(delay).await;
        }
    }
}
