//! PageSpeed Insights v5 client.
//!
//! One call per strategy. Failures are split into four kinds the caller can
//! tell apart: transport (network error or non-2xx), parse (body is not
//! JSON), rejected (Google's own error envelope), and timeout.

use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::{GatewayConfig, ERROR_BODY_SNIPPET_CHARS};
use crate::error::GatewayError;
use crate::report::UpstreamReport;

/// Simulated device class for an analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Mobile,
    Desktop,
}

impl Strategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Mobile => "mobile",
            Strategy::Desktop => "desktop",
        }
    }
}

pub async fn run_pagespeed(
    client: &reqwest::Client,
    config: &GatewayConfig,
    api_key: &str,
    target: &str,
    strategy: Strategy,
) -> Result<UpstreamReport, GatewayError> {
    let endpoint = format!(
        "{}/runPagespeed",
        config.upstream_base.trim_end_matches('/')
    );
    debug!("PageSpeed call: {} strategy={}", target, strategy.as_str());

    let response = client
        .get(&endpoint)
        .query(&[
            ("url", target),
            ("strategy", strategy.as_str()),
            ("key", api_key),
            ("category", "performance"),
            ("category", "seo"),
            ("screenshot", "true"),
        ])
        .timeout(Duration::from_secs(config.upstream_timeout_secs))
        .send()
        .await
        .map_err(classify_reqwest_error)?;

    let status = response.status();
    let body = response.text().await.map_err(classify_reqwest_error)?;

    decode_report(status.as_u16(), &body)
}

/// Decode an upstream body, keeping the three response-level failure kinds
/// distinct. Google wraps API errors (bad key, quota, unreachable target) in
/// a JSON envelope even on non-2xx statuses, so JSON is tried first.
fn decode_report(status: u16, body: &str) -> Result<UpstreamReport, GatewayError> {
    match serde_json::from_str::<UpstreamReport>(body) {
        Ok(report) => {
            if let Some(envelope) = &report.error {
                let message = envelope
                    .message
                    .clone()
                    .unwrap_or_else(|| "unknown upstream error".to_string());
                warn!("PageSpeed rejected the call: {}", message);
                return Err(GatewayError::UpstreamRejected(match envelope.code {
                    Some(code) => format!("{message} (code {code})"),
                    None => message,
                }));
            }
            if !(200..300).contains(&status) {
                warn!("PageSpeed returned status {}", status);
                return Err(GatewayError::UpstreamTransport(format!(
                    "status {}: {}",
                    status,
                    snippet(body)
                )));
            }
            Ok(report)
        }
        Err(parse_error) => {
            if !(200..300).contains(&status) {
                warn!("PageSpeed returned status {} with non-JSON body", status);
                Err(GatewayError::UpstreamTransport(format!(
                    "status {}: {}",
                    status,
                    snippet(body)
                )))
            } else {
                warn!("PageSpeed body is not valid JSON: {}", parse_error);
                Err(GatewayError::UpstreamParse(format!(
                    "{}: {}",
                    parse_error,
                    snippet(body)
                )))
            }
        }
    }
}

fn classify_reqwest_error(error: reqwest::Error) -> GatewayError {
    if error.is_timeout() {
        GatewayError::UpstreamTimeout(error.to_string())
    } else {
        GatewayError::UpstreamTransport(error.to_string())
    }
}

/// Truncate an upstream body for inclusion in an error response. Upstream
/// error pages can be arbitrarily large HTML.
fn snippet(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= ERROR_BODY_SNIPPET_CHARS {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(ERROR_BODY_SNIPPET_CHARS).collect();
        format!("{cut}...")
    }
}
