use ioclens_protocol::{IocType, StreamEvent};
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::decode::RecordDecoder;
use crate::order::ordered_types;
use crate::state::{AggregationState, AggregationView};
use crate::summarize::SummarizerRegistry;

/// Owns the mutable aggregation for one run.
///
/// Driven entirely by chunk delivery: there is exactly one logical writer, so
/// no locking. Events are applied in arrival order; cells are independent, so
/// no cross-cell ordering is required of the backend beyond "deliver each
/// (ioc, service) pair at most meaningfully once". Duplicates and late
/// events for terminal cells are no-ops.
pub struct MergeEngine {
    state: AggregationState,
    decoder: RecordDecoder,
    registry: SummarizerRegistry,
    ordered: Vec<IocType>,
    completed: usize,
    total_expected: usize,
    finished: bool,
    aggregation_error: Option<String>,
}

impl MergeEngine {
    /// Takes ownership of a freshly built [`AggregationState`]; the run is in
    /// flight from here, so idle cells move to `Loading`.
    pub fn new(mut state: AggregationState, registry: SummarizerRegistry) -> Self {
        let total_expected = state.expected_events();
        for record in state.records_mut() {
            for cell in record.services.values_mut() {
                cell.mark_loading();
            }
        }
        let ordered = ordered_types(state.groups());
        Self {
            state,
            decoder: RecordDecoder::new(),
            registry,
            ordered,
            completed: 0,
            total_expected,
            finished: false,
            aggregation_error: None,
        }
    }

    /// Feeds one transport chunk. Complete records are decoded and applied in
    /// arrival order; a record that fails to decode is dropped with a
    /// diagnostic rather than crashing the stream.
    pub fn on_chunk(&mut self, bytes: &[u8]) {
        if self.finished {
            return;
        }
        match self.decoder.push(bytes) {
            Ok(records) => {
                for raw in records {
                    self.apply_raw(&raw);
                }
            }
            Err(err) => self.fail(err.to_string()),
        }
    }

    fn apply_raw(&mut self, raw: &str) {
        match serde_json::from_str::<StreamEvent>(raw) {
            Ok(event) => self.apply_event(event),
            Err(err) => log::warn!("dropping undecodable stream record: {err}"),
        }
    }

    /// Applies one decoded event to exactly one (ioc, service) cell.
    pub fn apply_event(&mut self, event: StreamEvent) {
        let Some(record) = self.state.get_mut(&event.ioc) else {
            log::warn!(
                "dropping event for unknown ioc {:?} (service {:?})",
                event.ioc,
                event.service
            );
            return;
        };
        let Some(cell) = record.services.get_mut(&event.service) else {
            log::warn!(
                "dropping event for unselected service {:?} (ioc {:?})",
                event.service,
                event.ioc
            );
            return;
        };
        if cell.is_terminal() {
            log::debug!(
                "ignoring late event for terminal cell ({}, {})",
                event.ioc,
                event.service
            );
            return;
        }

        if let Some(message) = event.error {
            cell.fail(message);
        } else {
            let Some(summarizer) = self.registry.get(&event.service) else {
                log::warn!(
                    "no summarizer registered for service {:?}; dropping event for ioc {:?}",
                    event.service,
                    event.ioc
                );
                return;
            };
            let data = event.data.unwrap_or(Value::Null);
            match summarizer.summarize(&data, record.ioc_type) {
                Ok(summary) => cell.complete(data, summary),
                Err(err) => cell.fail(err.to_string()),
            }
        }

        record.recompute_severity();
        self.completed += 1;
    }

    /// Graceful end of stream. A final unterminated record is still applied;
    /// progress pins to 100 so the consumer never hangs mid-percentage.
    pub fn finish(&mut self) {
        if self.finished {
            return;
        }
        if let Some(raw) = self.decoder.finish() {
            self.apply_raw(&raw);
        }
        self.finished = true;
    }

    /// Stream-level failure before natural completion. Surfaced once as an
    /// aggregation-wide error, distinct from per-cell errors; everything
    /// merged so far stays renderable, and cells still in flight remain
    /// visibly incomplete rather than being silently marked failed.
    pub fn fail(&mut self, message: impl Into<String>) {
        if self.finished {
            return;
        }
        self.finished = true;
        self.aggregation_error = Some(message.into());
    }

    /// Caller-initiated stop. Terminal like [`finish`](Self::finish), so
    /// later chunks and terminal signals are no-ops, but records no error.
    pub fn cancel(&mut self) {
        self.finished = true;
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Monotonic count of applied (terminal) cell transitions.
    pub fn completed_count(&self) -> usize {
        self.completed
    }

    pub fn total_expected(&self) -> usize {
        self.total_expected
    }

    /// Percentage in [0, 100]. Forced to 100 once the stream has terminated,
    /// regardless of how many events were observed.
    pub fn progress_percent(&self) -> u8 {
        if self.finished || self.total_expected == 0 {
            return 100;
        }
        ((self.completed * 100 / self.total_expected).min(100)) as u8
    }

    pub fn aggregation_error(&self) -> Option<&str> {
        self.aggregation_error.as_deref()
    }

    pub fn state(&self) -> &AggregationState {
        &self.state
    }

    /// Read-only snapshot for renderers. Taken between event applications,
    /// so a reader never observes a half-applied event.
    pub fn view(&self) -> AggregationView<'_> {
        AggregationView {
            groups: self.state.groups(),
            ordered_types: &self.ordered,
            progress_percent: self.progress_percent(),
            aggregation_error: self.aggregation_error.as_deref(),
        }
    }

    /// Drives the engine from an async byte source: the transport read loop.
    /// EOF is a graceful finish; a read error is a stream-level failure.
    pub async fn run_stream<R>(&mut self, mut reader: R)
    where
        R: AsyncRead + Unpin,
    {
        let mut chunk = [0u8; 8192];
        while !self.finished {
            match reader.read(&mut chunk).await {
                Ok(0) => {
                    self.finish();
                    break;
                }
                Ok(n) => self.on_chunk(&chunk[..n]),
                Err(err) => {
                    self.fail(format!("transport read failed: {err}"));
                    break;
                }
            }
        }
    }
}
