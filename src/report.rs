//! Typed model of the PageSpeed Insights response.
//!
//! The payload is third-party data: any part of it may be missing, so every
//! field is optional or defaulted. Deserialization only fails when the body
//! is not a JSON object at all; a report with holes still parses and the
//! holes surface as absent summary fields.

use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamReport {
    pub error: Option<ApiErrorEnvelope>,
    pub lighthouse_result: Option<LighthouseResult>,
}

/// Google's own error envelope, returned as the body of rejected calls
/// (bad API key, quota exhausted, unreachable target).
#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorEnvelope {
    pub code: Option<i64>,
    pub message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LighthouseResult {
    #[serde(default)]
    pub categories: Categories,
    #[serde(default)]
    pub audits: HashMap<String, Audit>,
    pub fetch_time: Option<String>,
    pub full_page_screenshot: Option<FullPageScreenshot>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Categories {
    pub performance: Option<Category>,
    pub seo: Option<Category>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Category {
    /// Fractional score in 0.0..=1.0, or null when the category failed.
    pub score: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Audit {
    pub score: Option<f64>,
    pub display_value: Option<String>,
    pub numeric_value: Option<f64>,
    #[serde(default)]
    pub details: AuditDetails,
}

#[derive(Debug, Default, Deserialize)]
pub struct AuditDetails {
    /// Base64 image payload (`final-screenshot` audit).
    pub data: Option<String>,
    #[serde(default)]
    pub items: Vec<DetailItem>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DetailItem {
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: Option<String>,
    pub entity: Option<Entity>,
}

/// `third-party-summary` entities are bare strings in recent Lighthouse
/// versions and `{name}` / `{text}` objects in older ones.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Entity {
    Label(String),
    Named {
        name: Option<String>,
        text: Option<String>,
    },
    Other(serde_json::Value),
}

impl Entity {
    pub fn label(&self) -> Option<&str> {
        match self {
            Entity::Label(label) => Some(label),
            Entity::Named { name, text } => name.as_deref().or(text.as_deref()),
            Entity::Other(_) => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct FullPageScreenshot {
    pub screenshot: Option<Screenshot>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Screenshot {
    pub data: Option<String>,
}

/// Accept any JSON value, keeping it only when it is a string. Some audits
/// reuse the `url` column for non-string cell types.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_str().map(str::to_owned))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_parses() {
        let report: UpstreamReport = serde_json::from_str("{}").expect("should parse");
        assert!(report.error.is_none());
        assert!(report.lighthouse_result.is_none());
    }

    #[test]
    fn test_full_report_parses() {
        let report: UpstreamReport = serde_json::from_value(serde_json::json!({
            "lighthouseResult": {
                "fetchTime": "2024-05-01T10:00:00.000Z",
                "categories": {
                    "performance": {"score": 0.95},
                    "seo": {"score": 0.70}
                },
                "audits": {
                    "largest-contentful-paint": {
                        "displayValue": "1.5 s",
                        "numericValue": 1500.0
                    },
                    "total-byte-weight": {
                        "displayValue": "Total size was 2,150 KiB",
                        "numericValue": 2202009.6
                    }
                },
                "fullPageScreenshot": {
                    "screenshot": {"data": "data:image/webp;base64,AAAA"}
                }
            }
        }))
        .expect("should parse");

        let lh = report.lighthouse_result.unwrap();
        assert_eq!(lh.fetch_time.as_deref(), Some("2024-05-01T10:00:00.000Z"));
        assert_eq!(lh.categories.performance.unwrap().score, Some(0.95));
        let lcp = &lh.audits["largest-contentful-paint"];
        assert_eq!(lcp.display_value.as_deref(), Some("1.5 s"));
        assert_eq!(
            lh.full_page_screenshot.unwrap().screenshot.unwrap().data,
            Some("data:image/webp;base64,AAAA".to_string())
        );
    }

    #[test]
    fn test_error_envelope_parses() {
        let report: UpstreamReport = serde_json::from_value(serde_json::json!({
            "error": {"code": 400, "message": "API key not valid"}
        }))
        .expect("should parse");

        let envelope = report.error.unwrap();
        assert_eq!(envelope.code, Some(400));
        assert_eq!(envelope.message.as_deref(), Some("API key not valid"));
    }

    #[test]
    fn test_null_category_score_parses() {
        let category: Category =
            serde_json::from_value(serde_json::json!({"score": null})).expect("should parse");
        assert!(category.score.is_none());
    }

    #[test]
    fn test_entity_label_from_string() {
        let entity: Entity = serde_json::from_value(serde_json::json!("reCAPTCHA")).unwrap();
        assert_eq!(entity.label(), Some("reCAPTCHA"));
    }

    #[test]
    fn test_entity_label_from_object() {
        let entity: Entity =
            serde_json::from_value(serde_json::json!({"name": "Google reCAPTCHA"})).unwrap();
        assert_eq!(entity.label(), Some("Google reCAPTCHA"));

        let entity: Entity =
            serde_json::from_value(serde_json::json!({"text": "Google reCAPTCHA"})).unwrap();
        assert_eq!(entity.label(), Some("Google reCAPTCHA"));
    }

    #[test]
    fn test_entity_tolerates_unexpected_shapes() {
        let entity: Entity = serde_json::from_value(serde_json::json!(42)).unwrap();
        assert!(entity.label().is_none());
    }

    #[test]
    fn test_non_string_url_cell_does_not_fail_the_parse() {
        let item: DetailItem =
            serde_json::from_value(serde_json::json!({"url": {"type": "code"}})).unwrap();
        assert!(item.url.is_none());
    }
}
