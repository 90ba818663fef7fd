use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;
use url::Url;

use crate::error::GatewayError;
use crate::metrics::{self, MetricSummary};
use crate::state::SharedState;
use crate::upstream::{self, Strategy};

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub url: Option<String>,
    #[serde(default)]
    pub strategy: Option<Strategy>,
}

/// Combined response for a dual-strategy run.
#[derive(Debug, Serialize)]
pub struct StrategyPair {
    pub mobile: MetricSummary,
    pub desktop: MetricSummary,
}

/// POST / — analyze a target URL.
///
/// With an explicit strategy the response is a single summary. Without one,
/// both strategies run concurrently and the response pairs them; if either
/// call fails the whole request fails rather than returning half a pair.
pub async fn analyze(
    State(state): State<SharedState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Response, GatewayError> {
    let Json(request) =
        payload.map_err(|rejection| GatewayError::InvalidRequest(rejection.body_text()))?;

    let target = request
        .url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or(GatewayError::MissingTargetUrl)?;
    Url::parse(target)
        .map_err(|e| GatewayError::InvalidRequest(format!("invalid target URL: {e}")))?;

    let api_key = state
        .config
        .api_key
        .as_deref()
        .ok_or(GatewayError::MissingApiKey)?;

    let fetch = |strategy| {
        upstream::run_pagespeed(&state.http_client, &state.config, api_key, target, strategy)
    };

    match request.strategy {
        Some(strategy) => {
            info!("analyzing {} ({})", target, strategy.as_str());
            let report = fetch(strategy).await?;
            Ok(Json(metrics::summarize(&report)).into_response())
        }
        None => {
            info!("analyzing {} (mobile + desktop)", target);
            // Both calls are in flight before either result is awaited.
            let (mobile, desktop) =
                tokio::try_join!(fetch(Strategy::Mobile), fetch(Strategy::Desktop))?;
            Ok(Json(StrategyPair {
                mobile: metrics::summarize(&mobile),
                desktop: metrics::summarize(&desktop),
            })
            .into_response())
        }
    }
}
