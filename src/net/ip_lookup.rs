//! Best-effort public IP capture for submission enrichment.
//!
//! The lookup is strictly advisory: one bounded request, no retries, and
//! every failure mode degrades to `None`. A submission must never wait on
//! or fail because of this call.

use reqwest::Client;
use tracing::debug;

use crate::config::GlobalConfig;

/// Fetch the caller's public IP from the configured echo endpoint.
///
/// Accepts either a plain-text body (`203.0.113.7`) or the minimal JSON
/// shape `{"ip": "203.0.113.7"}`. Returns `None` on timeout, transport
/// error, non-success status, or a body that yields no address.
pub async fn fetch_client_ip(http: &Client, config: &GlobalConfig) -> Option<String> {
    let response = match http
        .get(&config.ip_echo_url)
        .timeout(config.ip_lookup_timeout())
        .send()
        .await
    {
        Ok(response) => response,
        Err(err) => {
            debug!(%err, "ip lookup request failed");
            return None;
        }
    };

    if !response.status().is_success() {
        debug!(status = %response.status(), "ip echo endpoint returned non-success");
        return None;
    }

    let body = match response.text().await {
        Ok(body) => body,
        Err(err) => {
            debug!(%err, "ip echo body read failed");
            return None;
        }
    };

    let ip = parse_ip_body(&body);
    if ip.is_none() {
        debug!("ip echo body yielded no address");
    }
    ip
}

fn parse_ip_body(body: &str) -> Option<String> {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(ip) = value.get("ip").and_then(serde_json::Value::as_str) {
            let ip = ip.trim();
            if !ip.is_empty() {
                return Some(ip.to_owned());
            }
        }
        // JSON without an "ip" field is malformed for our purposes.
        return None;
    }

    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
        return None;
    }
    Some(trimmed.to_owned())
}
