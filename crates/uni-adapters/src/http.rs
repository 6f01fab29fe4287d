//! Response status handling shared by the CRM adapters.
//!
//! HubSpot and Pipedrive both answer failures with a JSON body that names
//! the problem; that text becomes [`ProviderError::Api`]'s message so the
//! engine's adapter diagnostics say more than a bare status code.

use serde_json::Value;

use crate::error::ProviderError;

/// Seconds to wait when a 429 carries no usable `Retry-After`.
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Pass successful responses through; map everything else to a
/// [`ProviderError`].
///
/// 429 becomes [`ProviderError::RateLimited`], 404 becomes
/// [`ProviderError::NotFound`] naming the request path, and any other
/// non-2xx becomes [`ProviderError::Api`] carrying the provider's own
/// error text.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(ProviderError::RateLimited {
            retry_after_secs: retry_after_secs(resp.headers()),
        });
    }
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(ProviderError::NotFound(resp.url().path().to_string()));
    }
    let body = resp.text().await.unwrap_or_default();
    let message = provider_message(&body)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
    tracing::debug!(status = status.as_u16(), %message, "provider request failed");
    Err(ProviderError::Api {
        status: status.as_u16(),
        message,
    })
}

fn retry_after_secs(headers: &reqwest::header::HeaderMap) -> u64 {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

/// Error text out of a provider error body.
///
/// Understands HubSpot's `{"message": ..}`, Pipedrive's `{"error": ..,
/// "error_info": ..}` and the `[{"message": ..}]` / `{"errors": [..]}`
/// list shapes. Non-JSON bodies are used verbatim when short enough to be
/// a message.
#[must_use]
pub fn provider_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    let Ok(json) = serde_json::from_str::<Value>(body) else {
        return (body.len() <= 200 && !body.starts_with('<')).then(|| body.to_string());
    };
    let text = |value: Option<&Value>| value.and_then(Value::as_str).filter(|s| !s.is_empty()).map(str::to_string);

    let first_listed = |value: &Value| value.as_array().and_then(|items| items.first()).and_then(|item| text(item.get("message")));
    match &json {
        Value::Array(_) => first_listed(&json),
        Value::Object(map) => text(map.get("message"))
            .or_else(|| {
                let error = text(map.get("error"))?;
                Some(match text(map.get("error_info")) {
                    Some(info) => format!("{error} ({info})"),
                    None => error,
                })
            })
            .or_else(|| map.get("errors").and_then(first_listed)),
        _ => None,
    }
}
