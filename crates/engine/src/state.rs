use std::collections::{BTreeMap, HashMap};

use ioclens_protocol::{IocType, ServiceId, ServiceSummary, Severity};
use serde::Serialize;
use serde_json::Value;

/// Lifecycle of one (ioc, service) cell. `Completed` and `Error` are
/// terminal: once observed, later events for the pair are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CellStatus {
    Idle,
    Loading,
    Completed,
    Error,
}

/// The unit of mutation: one lookup service's answer for one indicator.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceCell {
    pub status: CellStatus,
    pub summary: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl ServiceCell {
    /// Fresh cell at request-build time.
    pub fn queued() -> Self {
        Self {
            status: CellStatus::Idle,
            summary: "Queued".to_string(),
            severity: Severity::White,
            data: None,
            error_message: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.status, CellStatus::Completed | CellStatus::Error)
    }

    pub(crate) fn mark_loading(&mut self) {
        if self.status == CellStatus::Idle {
            self.status = CellStatus::Loading;
            self.summary = "Awaiting response".to_string();
        }
    }

    pub(crate) fn complete(&mut self, data: Value, summary: ServiceSummary) {
        self.status = CellStatus::Completed;
        self.severity = summary.tlp;
        self.summary = summary.summary;
        self.data = Some(data);
        self.error_message = None;
    }

    /// Error terminal state. Severity is forced to `White`; a failed lookup
    /// never contributes risk signal, and is never reinterpreted as partial
    /// success.
    pub(crate) fn fail(&mut self, message: String) {
        self.status = CellStatus::Error;
        self.severity = Severity::White;
        self.summary = "Lookup failed".to_string();
        self.data = None;
        self.error_message = Some(message);
    }
}

/// One deduplicated, classified indicator and all of its service cells.
#[derive(Debug, Clone, Serialize)]
pub struct IocRecord {
    /// Stable within a run. Derived from type + value + submission ordinal,
    /// not from the value alone, so two classifications colliding on the same
    /// literal value within one submission cannot share an id.
    pub id: String,
    pub value: String,
    pub ioc_type: IocType,
    /// Key set fixed at creation; never grown or shrunk afterwards.
    pub services: BTreeMap<ServiceId, ServiceCell>,
    /// Derived: the reduction over all non-idle cells' severities. Recomputed
    /// after every cell mutation on this record, never set directly.
    pub overall_severity: Severity,
}

impl IocRecord {
    pub fn new(value: impl Into<String>, ioc_type: IocType, ordinal: usize, services: &[ServiceId]) -> Self {
        let value = value.into();
        let cells = services
            .iter()
            .map(|service| (service.clone(), ServiceCell::queued()))
            .collect();
        Self {
            id: format!("{}-{}-{}", ioc_type.as_str(), value, ordinal),
            value,
            ioc_type,
            services: cells,
            overall_severity: Severity::White,
        }
    }

    pub(crate) fn recompute_severity(&mut self) {
        self.overall_severity = Severity::reduce(
            self.services
                .values()
                .filter(|cell| cell.status != CellStatus::Idle)
                .map(|cell| cell.severity),
        );
    }
}

/// Routing entry: which bucket a value lives in and where. Buckets are
/// append-only for the life of a run, so positions never go stale.
#[derive(Debug, Clone, Copy)]
struct RecordHandle {
    ioc_type: IocType,
    position: usize,
}

/// Top-level owned aggregation structure for one run.
///
/// `groups` is the render-facing structure: one bucket per [`IocType`]
/// variant (all present from initialization, even when empty),
/// insertion-ordered within a bucket. `index` exists only for O(1) event
/// routing and is never exposed to renderers.
#[derive(Debug, Serialize)]
pub struct AggregationState {
    groups: BTreeMap<IocType, Vec<IocRecord>>,
    #[serde(skip)]
    index: HashMap<String, RecordHandle>,
}

impl AggregationState {
    pub fn new() -> Self {
        let groups = IocType::ALL
            .iter()
            .map(|ioc_type| (*ioc_type, Vec::new()))
            .collect();
        Self {
            groups,
            index: HashMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, record: IocRecord) {
        let bucket = self
            .groups
            .get_mut(&record.ioc_type)
            .expect("buckets are seeded for every IocType variant");
        let handle = RecordHandle {
            ioc_type: record.ioc_type,
            position: bucket.len(),
        };
        self.index.insert(record.value.clone(), handle);
        bucket.push(record);
    }

    pub fn groups(&self) -> &BTreeMap<IocType, Vec<IocRecord>> {
        &self.groups
    }

    pub fn get(&self, value: &str) -> Option<&IocRecord> {
        let handle = self.index.get(value)?;
        self.groups.get(&handle.ioc_type)?.get(handle.position)
    }

    pub(crate) fn get_mut(&mut self, value: &str) -> Option<&mut IocRecord> {
        let handle = *self.index.get(value)?;
        self.groups
            .get_mut(&handle.ioc_type)?
            .get_mut(handle.position)
    }

    pub fn record_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Total events the stream is expected to deliver: one per
    /// (ioc, service) pair.
    pub fn expected_events(&self) -> usize {
        self.groups
            .values()
            .flatten()
            .map(|record| record.services.len())
            .sum()
    }

    pub(crate) fn records_mut(&mut self) -> impl Iterator<Item = &mut IocRecord> {
        self.groups.values_mut().flatten()
    }
}

impl Default for AggregationState {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only snapshot handed to renderers. The routing index never appears
/// here.
#[derive(Debug, Serialize)]
pub struct AggregationView<'a> {
    pub groups: &'a BTreeMap<IocType, Vec<IocRecord>>,
    pub ordered_types: &'a [IocType],
    pub progress_percent: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregation_error: Option<&'a str>,
}
