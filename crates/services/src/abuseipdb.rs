use ioclens_engine::{SummarizeError, Summarizer};
use ioclens_protocol::{IocType, ServiceSummary, Severity};
use serde_json::Value;

/// AbuseIPDB check payloads: the abuse confidence score (0-100) drives the
/// severity bands.
pub struct AbuseIpdb;

impl Summarizer for AbuseIpdb {
    fn service_id(&self) -> &str {
        "abuseipdb"
    }

    fn summarize(&self, data: &Value, _ioc_type: IocType) -> Result<ServiceSummary, SummarizeError> {
        if data.is_null() {
            return Ok(ServiceSummary::new("No abuse reports", Severity::White));
        }
        let body = data.get("data").ok_or_else(|| {
            SummarizeError::UnexpectedPayload("missing data envelope".to_string())
        })?;
        let score = body
            .get("abuseConfidenceScore")
            .and_then(Value::as_u64)
            .unwrap_or(0);
        let reports = body.get("totalReports").and_then(Value::as_u64).unwrap_or(0);
        let country = body.get("countryCode").and_then(Value::as_str);

        let tlp = match score {
            80.. => Severity::Red,
            40..=79 => Severity::Amber,
            10..=39 => Severity::Green,
            1..=9 => Severity::Blue,
            0 => Severity::White,
        };

        let mut summary = format!("Abuse confidence {score}% ({reports} reports");
        if let Some(country) = country {
            summary.push_str(&format!(", {country}"));
        }
        summary.push(')');
        Ok(ServiceSummary::new(summary, tlp).with_metric(score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn payload(score: u64, reports: u64) -> Value {
        json!({"data": {
            "abuseConfidenceScore": score,
            "totalReports": reports,
            "countryCode": "RU",
        }})
    }

    #[test]
    fn high_confidence_is_red() {
        let summary = AbuseIpdb.summarize(&payload(97, 412), IocType::Ipv4).unwrap();
        assert_eq!(summary.tlp, Severity::Red);
        assert_eq!(summary.summary, "Abuse confidence 97% (412 reports, RU)");
        assert_eq!(summary.key_metric, Some(json!(97)));
    }

    #[test]
    fn severity_bands_cover_the_score_range() {
        for (score, expected) in [
            (0, Severity::White),
            (5, Severity::Blue),
            (25, Severity::Green),
            (60, Severity::Amber),
            (80, Severity::Red),
        ] {
            let summary = AbuseIpdb.summarize(&payload(score, 1), IocType::Ipv4).unwrap();
            assert_eq!(summary.tlp, expected, "score {score}");
        }
    }

    #[test]
    fn missing_envelope_is_a_summarize_error() {
        let err = AbuseIpdb
            .summarize(&json!({"abuseConfidenceScore": 10}), IocType::Ipv4)
            .unwrap_err();
        assert!(matches!(err, SummarizeError::UnexpectedPayload(_)));
    }
}
