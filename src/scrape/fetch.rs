use std::time::Duration;

use rand::Rng;
use reqwest::blocking::Client as HttpClient;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION};
use tracing::warn;

use crate::error::PipelineError;

const SEARCH_URL: &str = "https://www.indiamart.com/search.mp";
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko)";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Bounded retry with exponential backoff. Backoff doubles per attempt,
/// plus 0-1s random jitter so parallel runs don't align.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        RetryPolicy {
            max_attempts,
            base_backoff: Duration::from_secs(2),
        }
    }
}

/// Run `op` until it succeeds or the policy is exhausted. Only retryable
/// (network) failures trigger another attempt.
pub fn fetch_with_retry<F>(mut op: F, policy: &RetryPolicy) -> Result<String, PipelineError>
where
    F: FnMut() -> Result<String, PipelineError>,
{
    let mut attempt = 0;
    loop {
        match op() {
            Ok(body) => return Ok(body),
            Err(e) if e.is_retryable() && attempt + 1 < policy.max_attempts => {
                let backoff = policy.base_backoff * 2u32.pow(attempt);
                warn!(
                    attempt = attempt + 1,
                    max = policy.max_attempts,
                    backoff_secs = backoff.as_secs_f64(),
                    "request failed, backing off: {e}"
                );
                if !backoff.is_zero() {
                    let jitter = Duration::from_millis(rand::rng().random_range(0..1000));
                    std::thread::sleep(backoff + jitter);
                }
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Blocking HTTP client for the marketplace search endpoint.
pub struct Client {
    http: HttpClient,
}

impl Client {
    pub fn new() -> Result<Self, PipelineError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

        let http = HttpClient::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Client { http })
    }

    /// Fetch one result page for a search query. Non-success status counts
    /// as a network failure so the retry policy applies.
    pub fn fetch_page(&self, query: &str, page: usize) -> Result<String, PipelineError> {
        let response = self
            .http
            .get(SEARCH_URL)
            .query(&[("ss", query), ("page", &page.to_string())])
            .send()?
            .error_for_status()?;
        Ok(response.text()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_backoff: Duration::ZERO,
        }
    }

    #[test]
    fn succeeds_on_third_attempt() {
        let mut calls = 0;
        let result = fetch_with_retry(
            || {
                calls += 1;
                if calls < 3 {
                    Err(PipelineError::Network("connection reset".into()))
                } else {
                    Ok("<html></html>".to_string())
                }
            },
            &instant_policy(),
        );
        assert_eq!(result.unwrap(), "<html></html>");
        assert_eq!(calls, 3);
    }

    #[test]
    fn gives_up_after_max_attempts() {
        let mut calls = 0;
        let result = fetch_with_retry(
            || {
                calls += 1;
                Err(PipelineError::Network("timeout".into()))
            },
            &instant_policy(),
        );
        assert!(result.is_err());
        assert_eq!(calls, 3);
    }

    #[test]
    fn non_retryable_fails_immediately() {
        let mut calls = 0;
        let result: Result<String, _> = fetch_with_retry(
            || {
                calls += 1;
                Err(PipelineError::Parse("bad html".into()))
            },
            &instant_policy(),
        );
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }
}
