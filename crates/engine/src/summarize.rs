use std::collections::HashMap;
use std::sync::Arc;

use ioclens_protocol::{IocType, ServiceSummary};
use serde_json::Value;

use crate::error::SummarizeError;

/// Per-service capability: distill a raw backend payload into a rendered
/// summary line and a TLP severity.
///
/// Implementations must be pure and total: same payload, same answer, no
/// panics. The engine does not trust that. A summarizer returning `Err`
/// turns its cell into an error; it never takes the stream down.
pub trait Summarizer: Send + Sync {
    /// The service identifier this summarizer answers for ("virustotal", ...).
    fn service_id(&self) -> &str;

    fn summarize(&self, data: &Value, ioc_type: IocType) -> Result<ServiceSummary, SummarizeError>;
}

/// Registry of summarizers keyed by service id, injected into the merge
/// engine. Replaces the source's duck-typed service-definition object with an
/// explicit capability lookup.
#[derive(Clone, Default)]
pub struct SummarizerRegistry {
    summarizers: HashMap<String, Arc<dyn Summarizer>>,
}

impl SummarizerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a summarizer under its own service id. A later registration
    /// for the same id replaces the earlier one.
    pub fn register(&mut self, summarizer: Arc<dyn Summarizer>) {
        self.summarizers
            .insert(summarizer.service_id().to_string(), summarizer);
    }

    pub fn get(&self, service_id: &str) -> Option<&Arc<dyn Summarizer>> {
        self.summarizers.get(service_id)
    }

    pub fn contains(&self, service_id: &str) -> bool {
        self.summarizers.contains_key(service_id)
    }

    /// Registered service ids, sorted for stable presentation.
    pub fn service_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.summarizers.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.summarizers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summarizers.is_empty()
    }
}

impl std::fmt::Debug for SummarizerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SummarizerRegistry")
            .field("services", &self.service_ids())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ioclens_protocol::Severity;
    use pretty_assertions::assert_eq;

    struct Fixed(&'static str);

    impl Summarizer for Fixed {
        fn service_id(&self) -> &str {
            self.0
        }

        fn summarize(
            &self,
            _data: &Value,
            _ioc_type: IocType,
        ) -> Result<ServiceSummary, SummarizeError> {
            Ok(ServiceSummary::new("ok", Severity::Green))
        }
    }

    #[test]
    fn registers_under_own_service_id() {
        let mut registry = SummarizerRegistry::new();
        registry.register(Arc::new(Fixed("svcA")));
        registry.register(Arc::new(Fixed("svcB")));
        assert!(registry.contains("svcA"));
        assert!(!registry.contains("svcC"));
        assert_eq!(registry.service_ids(), vec!["svcA", "svcB"]);
    }

    #[test]
    fn later_registration_replaces_earlier() {
        let mut registry = SummarizerRegistry::new();
        registry.register(Arc::new(Fixed("svcA")));
        registry.register(Arc::new(Fixed("svcA")));
        assert_eq!(registry.len(), 1);
    }
}
