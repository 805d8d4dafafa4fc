use ioclens_engine::{SummarizeError, Summarizer};
use ioclens_protocol::{IocType, ServiceSummary, Severity};
use serde_json::Value;

/// Shodan host payloads: open ports and known vulnerabilities.
pub struct Shodan;

impl Summarizer for Shodan {
    fn service_id(&self) -> &str {
        "shodan"
    }

    fn summarize(&self, data: &Value, ioc_type: IocType) -> Result<ServiceSummary, SummarizeError> {
        if data.is_null() {
            return Ok(ServiceSummary::new("No host information", Severity::White));
        }
        if !data.is_object() {
            return Err(SummarizeError::UnexpectedPayload(
                "expected a host object".to_string(),
            ));
        }
        if !matches!(ioc_type, IocType::Ipv4 | IocType::Ipv6) {
            // Shodan only answers for hosts; anything else means the
            // transport asked for something this service cannot say much
            // about.
            return Ok(ServiceSummary::new("Not a host indicator", Severity::White));
        }

        let ports = data
            .get("ports")
            .and_then(Value::as_array)
            .map(Vec::len)
            .unwrap_or(0);
        let vulns = data
            .get("vulns")
            .and_then(Value::as_array)
            .map(Vec::len)
            .unwrap_or(0);

        let tlp = if vulns > 0 {
            Severity::Red
        } else if ports > 10 {
            Severity::Amber
        } else if ports > 0 {
            Severity::Green
        } else {
            Severity::White
        };

        let summary = match (ports, vulns) {
            (0, _) => "No open services observed".to_string(),
            (p, 0) => format!("{p} open ports"),
            (p, v) => format!("{p} open ports, {v} known vulns"),
        };
        Ok(ServiceSummary::new(summary, tlp).with_metric(ports as u64))
    }
}
