use ioclens_engine::{SummarizeError, Summarizer};
use ioclens_protocol::{IocType, ServiceSummary, Severity};
use serde_json::Value;

/// VirusTotal v3 object payloads: severity tracks how many engines flagged
/// the indicator in `last_analysis_stats`.
pub struct VirusTotal;

impl Summarizer for VirusTotal {
    fn service_id(&self) -> &str {
        "virustotal"
    }

    fn summarize(&self, data: &Value, ioc_type: IocType) -> Result<ServiceSummary, SummarizeError> {
        if data.is_null() {
            return Ok(ServiceSummary::new("No analysis available", Severity::White));
        }
        let stats = data
            .pointer("/data/attributes/last_analysis_stats")
            .ok_or_else(|| {
                SummarizeError::UnexpectedPayload("missing last_analysis_stats".to_string())
            })?;
        let count = |key: &str| stats.get(key).and_then(Value::as_u64).unwrap_or(0);
        let malicious = count("malicious");
        let suspicious = count("suspicious");
        let total = malicious + suspicious + count("harmless") + count("undetected");

        let noun = match ioc_type {
            IocType::Md5 | IocType::Sha1 | IocType::Sha256 => "file",
            IocType::Url => "URL",
            _ => "indicator",
        };

        let tlp = if malicious >= 5 {
            Severity::Red
        } else if malicious >= 1 {
            Severity::Amber
        } else if suspicious >= 1 {
            Severity::Green
        } else if total > 0 {
            Severity::Blue
        } else {
            Severity::White
        };

        let summary = if total == 0 {
            format!("No engine has analyzed this {noun}")
        } else {
            format!("{malicious}/{total} engines flagged this {noun}")
        };
        Ok(ServiceSummary::new(summary, tlp).with_metric(malicious))
    }
}
