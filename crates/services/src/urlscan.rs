use ioclens_engine::{SummarizeError, Summarizer};
use ioclens_protocol::{IocType, ServiceSummary, Severity};
use serde_json::Value;

/// urlscan.io result payloads: the overall verdict score, with the explicit
/// `malicious` flag taking precedence over the numeric band.
pub struct UrlScan;

impl Summarizer for UrlScan {
    fn service_id(&self) -> &str {
        "urlscan"
    }

    fn summarize(&self, data: &Value, _ioc_type: IocType) -> Result<ServiceSummary, SummarizeError> {
        if data.is_null() {
            return Ok(ServiceSummary::new("No scan recorded", Severity::White));
        }
        if !data.is_object() {
            return Err(SummarizeError::UnexpectedPayload(
                "expected a result object".to_string(),
            ));
        }
        let overall = data.pointer("/verdicts/overall");
        let malicious = overall
            .and_then(|v| v.get("malicious"))
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let score = overall
            .and_then(|v| v.get("score"))
            .and_then(Value::as_i64)
            .unwrap_or(0);

        let tlp = if malicious {
            Severity::Red
        } else if score >= 50 {
            Severity::Amber
        } else if score > 0 {
            Severity::Green
        } else {
            Severity::White
        };

        let summary = match data.pointer("/page/domain").and_then(Value::as_str) {
            Some(domain) => format!("Verdict score {score} for {domain}"),
            None => format!("Verdict score {score}"),
        };
        Ok(ServiceSummary::new(summary, tlp).with_metric(score))
    }
}
