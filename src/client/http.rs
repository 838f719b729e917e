use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;

use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;

/// Future returned by [`HttpTransport::post_json`].
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Error type returned by an [`HttpTransport`] attempt.
pub type BoxError = Box<dyn StdError + Send + Sync>;

#[derive(Debug, Clone)]
/// Raw HTTP response as received from Yalo.
///
/// Returned by [`crate::YaloClient::send`] and attached to
/// [`crate::YaloError::NonJsonResponse`] so callers can inspect e.g. a gateway error page.
pub struct RawResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: String,
}

impl RawResponse {
    /// Decode the body into `T`.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }

    pub(crate) fn is_json(&self) -> bool {
        serde_json::from_str::<serde::de::IgnoredAny>(&self.body).is_ok()
    }
}

/// A single HTTP attempt. Retries, rate limiting and cancellation are layered on top
/// by [`crate::YaloClient`], so implementations should not retry on their own.
pub trait HttpTransport: Send + Sync {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        headers: &'a HeaderMap,
        body: &'a str,
    ) -> BoxFuture<'a, Result<RawResponse, BoxError>>;
}

#[derive(Debug, Clone)]
pub(crate) struct ReqwestTransport {
    pub(crate) client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        headers: &'a HeaderMap,
        body: &'a str,
    ) -> BoxFuture<'a, Result<RawResponse, BoxError>> {
        Box::pin(async move {
            let response = self
                .client
                .post(url)
                .headers(headers.clone())
                .body(body.to_owned())
                .send()
                .await?;
            let status = response.status().as_u16();
            let headers = response.headers().clone();
            let body = response.text().await?;
            Ok(RawResponse {
                status,
                headers,
                body,
            })
        })
    }
}
