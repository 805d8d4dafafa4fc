use ioclens_engine::{AggregationView, CellStatus};

/// Renders the aggregation view as a plain-text report: an optional stream
/// error banner, then one section per non-empty type group in presentation
/// order.
pub fn render(view: &AggregationView<'_>) -> String {
    let mut out = String::new();
    if let Some(error) = view.aggregation_error {
        out.push_str(&format!("STREAM ERROR: {error}\n\n"));
    }
    out.push_str(&format!("Progress: {}%\n", view.progress_percent));

    for ioc_type in view.ordered_types {
        let records = &view.groups[ioc_type];
        out.push_str(&format!("\n== {} ({}) ==\n", ioc_type.label(), records.len()));
        for record in records {
            out.push_str(&format!(
                "{}  [{}]\n",
                record.value,
                record.overall_severity.as_str().to_uppercase()
            ));
            for (service, cell) in &record.services {
                match cell.status {
                    CellStatus::Error => out.push_str(&format!(
                        "  {service}: {} ({})\n",
                        cell.summary,
                        cell.error_message.as_deref().unwrap_or("unknown error")
                    )),
                    _ => out.push_str(&format!(
                        "  {service}: {} [{}]\n",
                        cell.summary, cell.severity
                    )),
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::render;
    use ioclens_engine::{build_request, MergeEngine, SummarizerRegistry};
    use ioclens_protocol::StreamEvent;
    use std::sync::Arc;

    fn engine() -> MergeEngine {
        let services = vec!["virustotal".to_string()];
        let (state, _) = build_request("8.8.8.8", &services).unwrap();
        let mut registry = SummarizerRegistry::new();
        registry.register(Arc::new(ioclens_services::VirusTotal));
        MergeEngine::new(state, registry)
    }

    #[test]
    fn renders_sections_and_severity() {
        let mut engine = engine();
        engine.apply_event(StreamEvent {
            ioc: "8.8.8.8".to_string(),
            service: "virustotal".to_string(),
            data: Some(serde_json::json!({"data": {"attributes": {"last_analysis_stats": {
                "malicious": 12, "suspicious": 0, "harmless": 50, "undetected": 8,
            }}}})),
            error: None,
        });
        engine.finish();

        let text = render(&engine.view());
        assert!(text.contains("Progress: 100%"));
        assert!(text.contains("== IPv4 (1) =="));
        assert!(text.contains("8.8.8.8  [RED]"));
        assert!(text.contains("virustotal: 12/70 engines flagged this indicator [red]"));
    }

    #[test]
    fn stream_error_renders_as_a_banner() {
        let mut engine = engine();
        engine.fail("connection reset");
        let text = render(&engine.view());
        assert!(text.starts_with("STREAM ERROR: connection reset"));
    }
}
