use ioclens_engine::{SummarizeError, Summarizer};
use ioclens_protocol::{IocType, ServiceSummary, Severity};
use serde_json::Value;

/// GreyNoise community payloads: the classification string maps directly to
/// a severity, with `benign` rendered as informational blue rather than
/// clean white, since a benign scanner is still a known actor.
pub struct GreyNoise;

impl Summarizer for GreyNoise {
    fn service_id(&self) -> &str {
        "greynoise"
    }

    fn summarize(&self, data: &Value, _ioc_type: IocType) -> Result<ServiceSummary, SummarizeError> {
        if data.is_null() {
            return Ok(ServiceSummary::new("Not observed scanning", Severity::White));
        }
        if !data.is_object() {
            return Err(SummarizeError::UnexpectedPayload(
                "expected a noise object".to_string(),
            ));
        }
        let classification = data
            .get("classification")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        let tlp = match classification {
            "malicious" => Severity::Red,
            "suspicious" => Severity::Amber,
            "benign" => Severity::Blue,
            _ => Severity::White,
        };
        let summary = match data.get("name").and_then(Value::as_str) {
            Some(name) if name != "unknown" => {
                format!("Classified {classification} ({name})")
            }
            _ => format!("Classified {classification}"),
        };
        Ok(ServiceSummary::new(summary, tlp).with_metric(classification))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn malicious_classification_is_red() {
        let payload = json!({"classification": "malicious", "name": "Mirai"});
        let summary = GreyNoise.summarize(&payload, IocType::Ipv4).unwrap();
        assert_eq!(summary.tlp, Severity::Red);
        assert_eq!(summary.summary, "Classified malicious (Mirai)");
    }

    #[test]
    fn benign_scanner_is_informational_blue() {
        let payload = json!({"classification": "benign", "name": "GoogleBot"});
        let summary = GreyNoise.summarize(&payload, IocType::Ipv4).unwrap();
        assert_eq!(summary.tlp, Severity::Blue);
    }

    #[test]
    fn unknown_classification_is_white() {
        let summary = GreyNoise.summarize(&json!({}), IocType::Ipv4).unwrap();
        assert_eq!(summary.tlp, Severity::White);
        assert_eq!(summary.summary, "Classified unknown");
    }
}
