//! HTTP retry helper for transient Open-Meteo failures.
//!
//! Every request goes through [`send_json`], which retries connection
//! errors, timeouts, HTTP 429 and HTTP 5xx with exponential backoff.
//! Other 4xx responses are permanent and returned immediately.
//!
//! ```ignore
//! let body: ForecastResponse =
//!     retry::send_json(|| client.get(&url).query(&params), &policy).await?;
//! ```

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::OpenMeteoError;

/// Maximum length of the response body preview included in error logs.
const BODY_PREVIEW_LEN: usize = 300;

/// How many times to retry and how long to wait between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retry attempts after the first failure.
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each further attempt.
    pub backoff_base: Duration,
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (1-based).
    #[must_use]
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
        self.backoff_base.saturating_mul(factor)
    }
}

/// Sends an HTTP request and deserializes the JSON body into `T`.
///
/// The `build_request` closure is called on each attempt to construct a
/// fresh [`reqwest::RequestBuilder`], since builders are consumed by
/// `.send()`.
///
/// # Errors
///
/// Returns [`OpenMeteoError`] if the request fails after all retries, the
/// server returns a non-retryable status, or the body does not match `T`.
pub async fn send_json<T, F>(build_request: F, policy: &RetryPolicy) -> Result<T, OpenMeteoError>
where
    T: DeserializeOwned,
    F: Fn() -> reqwest::RequestBuilder,
{
    let response = send_inner(&build_request, policy).await?;
    let url = response.url().to_string();
    let text = response.text().await?;

    serde_json::from_str(&text).map_err(|e| {
        let preview = if text.len() > BODY_PREVIEW_LEN {
            format!("{}...", text.chars().take(BODY_PREVIEW_LEN).collect::<String>())
        } else {
            text.clone()
        };
        log::warn!(
            "JSON decode failed.\n  \
             url: {url}\n  \
             received: {} bytes\n  \
             parse error: {e}\n  \
             body preview: {preview}",
            text.len(),
        );
        OpenMeteoError::Json(e)
    })
}

/// Core retry loop. Returns the first 2xx/3xx response.
async fn send_inner<F>(
    build_request: &F,
    policy: &RetryPolicy,
) -> Result<reqwest::Response, OpenMeteoError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let max_retries = policy.max_retries;
    let mut last_error: Option<OpenMeteoError> = None;

    for attempt in 0..=max_retries {
        if attempt > 0 {
            let delay = policy.delay(attempt);
            log::warn!("  retry {attempt}/{max_retries} in {delay:?}...");
            tokio::time::sleep(delay).await;
        }

        match build_request().send().await {
            Err(e) => {
                if is_transient(&e) && attempt < max_retries {
                    log::warn!("  transient error: {e}");
                    last_error = Some(OpenMeteoError::Http(e));
                    continue;
                }
                return Err(OpenMeteoError::Http(e));
            }
            Ok(response) => {
                let status = response.status();

                if is_retryable_status(status) {
                    if attempt < max_retries {
                        log::warn!("  HTTP {status}");
                        last_error = Some(OpenMeteoError::Upstream {
                            message: format!("HTTP {status}"),
                        });
                        continue;
                    }
                    return Err(OpenMeteoError::Upstream {
                        message: format!("HTTP {status} after {max_retries} retries"),
                    });
                }

                if status.is_client_error() {
                    return Err(OpenMeteoError::Upstream {
                        message: format!("HTTP {status}"),
                    });
                }

                return Ok(response);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| OpenMeteoError::Upstream {
        message: "request failed after all retries".to_string(),
    }))
}

/// 429 and 5xx are worth another attempt.
fn is_retryable_status(status: reqwest::StatusCode) -> bool {
    status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Returns `true` if the error is likely transient and worth retrying.
fn is_transient(e: &reqwest::Error) -> bool {
    e.is_timeout() || e.is_connect() || e.is_body() || e.is_request()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles() {
        let policy = RetryPolicy {
            max_retries: 3,
            backoff_base: Duration::from_millis(250),
        };
        assert_eq!(policy.delay(1), Duration::from_millis(250));
        assert_eq!(policy.delay(2), Duration::from_millis(500));
        assert_eq!(policy.delay(3), Duration::from_secs(1));
    }

    #[test]
    fn backoff_saturates() {
        let policy = RetryPolicy {
            max_retries: 100,
            backoff_base: Duration::from_secs(1),
        };
        assert_eq!(policy.delay(40), Duration::from_secs(u64::from(u32::MAX)));
    }

    #[test]
    fn retryable_statuses() {
        assert!(is_retryable_status(reqwest::StatusCode::TOO_MANY_REQUESTS));
        assert!(is_retryable_status(reqwest::StatusCode::BAD_GATEWAY));
        assert!(!is_retryable_status(reqwest::StatusCode::BAD_REQUEST));
        assert!(!is_retryable_status(reqwest::StatusCode::OK));
    }
}
