//! Pure extraction and unit conversion over a parsed Lighthouse report.
//!
//! Everything here is side-effect free so the conversion rules can be tested
//! without the HTTP layer. Rounding rules:
//! - scores: `round(score * 100)` to an integer 0-100
//! - page size: mebibyte-based megabytes, one decimal place
//! - load time: leading decimal of the LCP display value, re-rendered as
//!   "<n> segundos"; values without a leading number pass through unchanged

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use crate::config::{RATING_FAIR_MIN, RATING_GOOD_MIN};
use crate::report::{Audit, LighthouseResult, UpstreamReport};

static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([0-9][0-9,]*(?:\.[0-9]+)?)").unwrap());

const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;
const CAPTCHA_VENDOR: &str = "recaptcha";

/// The simplified per-strategy payload returned to callers.
#[derive(Debug, Serialize)]
pub struct MetricSummary {
    pub performance: Option<u32>,
    pub seo: Option<u32>,
    pub rating: &'static str,
    pub load_time: Option<String>,
    pub page_size: Option<String>,
    pub metrics: CoreMetrics,
    pub screenshot: Option<String>,
    pub has_recaptcha: bool,
    pub fetch_time: Option<String>,
}

/// Raw Lighthouse display values for the core timing metrics.
#[derive(Debug, Serialize)]
pub struct CoreMetrics {
    pub fcp: Option<String>,
    pub lcp: Option<String>,
    pub cls: Option<String>,
    pub tbt: Option<String>,
}

impl MetricSummary {
    fn unavailable() -> Self {
        MetricSummary {
            performance: None,
            seo: None,
            rating: classify(None),
            load_time: None,
            page_size: None,
            metrics: CoreMetrics {
                fcp: None,
                lcp: None,
                cls: None,
                tbt: None,
            },
            screenshot: None,
            has_recaptcha: false,
            fetch_time: None,
        }
    }
}

pub fn summarize(report: &UpstreamReport) -> MetricSummary {
    match report.lighthouse_result.as_ref() {
        Some(lighthouse) => summarize_lighthouse(lighthouse),
        None => MetricSummary::unavailable(),
    }
}

fn summarize_lighthouse(lighthouse: &LighthouseResult) -> MetricSummary {
    let audit = |key: &str| lighthouse.audits.get(key);
    let display = |key: &str| audit(key).and_then(|a| a.display_value.clone());

    let performance = lighthouse
        .categories
        .performance
        .as_ref()
        .and_then(|c| c.score)
        .map(score_percent);
    let seo = lighthouse
        .categories
        .seo
        .as_ref()
        .and_then(|c| c.score)
        .map(score_percent);

    // Prefer the full-page screenshot; older reports only carry the
    // final-screenshot audit.
    let screenshot = lighthouse
        .full_page_screenshot
        .as_ref()
        .and_then(|f| f.screenshot.as_ref())
        .and_then(|s| s.data.clone())
        .or_else(|| audit("final-screenshot").and_then(|a| a.details.data.clone()));

    MetricSummary {
        performance,
        seo,
        rating: classify(performance),
        load_time: display("largest-contentful-paint").map(|v| localize_seconds(&v)),
        page_size: audit("total-byte-weight").and_then(page_size_mb),
        metrics: CoreMetrics {
            fcp: display("first-contentful-paint"),
            lcp: display("largest-contentful-paint"),
            cls: display("cumulative-layout-shift"),
            tbt: display("total-blocking-time"),
        },
        screenshot,
        has_recaptcha: detect_captcha(lighthouse),
        fetch_time: lighthouse.fetch_time.clone(),
    }
}

/// Scale a fractional Lighthouse score (0.0..=1.0) to an integer percent.
pub fn score_percent(score: f64) -> u32 {
    (score * 100.0).round().clamp(0.0, 100.0) as u32
}

/// Three-tier qualitative rating of a performance score.
pub fn classify(score: Option<u32>) -> &'static str {
    match score {
        Some(s) if s >= RATING_GOOD_MIN => "good",
        Some(s) if s >= RATING_FAIR_MIN => "fair",
        Some(_) => "poor",
        None => "unavailable",
    }
}

/// "1.5 s" -> "1.5 segundos". A display value without a leading number is
/// passed through as-is rather than dropped.
pub fn localize_seconds(display: &str) -> String {
    match LEADING_NUMBER.captures(display).and_then(|c| c.get(1)) {
        Some(number) => format!("{} segundos", number.as_str()),
        None => display.to_string(),
    }
}

/// Page weight rendered as megabytes with one decimal place.
///
/// Prefers the audit's raw byte count; falls back to parsing the display
/// value ("2,150 KiB", "2.1 MB"). Returns None when the audit carries
/// neither.
pub fn page_size_mb(audit: &Audit) -> Option<String> {
    if let Some(bytes) = audit.numeric_value {
        return Some(format_mb(bytes / BYTES_PER_MIB));
    }

    let display = audit.display_value.as_deref()?;
    let number = leading_number(display)?;
    let mb = if display.contains("KiB") || display.contains("KB") {
        number / 1024.0
    } else if display.contains("MB") || display.contains("MiB") {
        number
    } else {
        number / BYTES_PER_MIB
    };
    Some(format_mb(mb))
}

/// Heuristic: a third-party CAPTCHA script is considered present when any
/// unused-script URL, unused-style URL, or third-party entity name contains
/// the vendor name, case-insensitively.
pub fn detect_captcha(lighthouse: &LighthouseResult) -> bool {
    let url_hit = |key: &str| {
        lighthouse.audits.get(key).is_some_and(|audit| {
            audit.details.items.iter().any(|item| {
                item.url
                    .as_deref()
                    .is_some_and(|url| url.to_ascii_lowercase().contains(CAPTCHA_VENDOR))
            })
        })
    };

    let entity_hit = lighthouse
        .audits
        .get("third-party-summary")
        .is_some_and(|audit| {
            audit.details.items.iter().any(|item| {
                item.entity
                    .as_ref()
                    .and_then(|entity| entity.label())
                    .is_some_and(|label| label.to_ascii_lowercase().contains(CAPTCHA_VENDOR))
            })
        });

    url_hit("unused-javascript") || url_hit("unused-css-rules") || entity_hit
}

fn leading_number(display: &str) -> Option<f64> {
    LEADING_NUMBER
        .captures(display)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().replace(',', "").parse().ok())
}

fn format_mb(mb: f64) -> String {
    format!("{mb:.1} MB")
}
