//! Bundled per-service summarizers.
//!
//! Each module maps one backend's (already fetched) JSON payload to a
//! one-line summary and a TLP severity. The HTTP lookups themselves live in
//! the transport layer; nothing here performs I/O. Summarizers are pure and
//! total over well-formed payloads: missing optional fields degrade to
//! benign wording, while a payload of the wrong overall shape is reported as
//! a `SummarizeError` (which the engine turns into a cell error).

mod abuseipdb;
mod greynoise;
mod shodan;
mod urlscan;
mod virustotal;

pub use abuseipdb::AbuseIpdb;
pub use greynoise::GreyNoise;
pub use shodan::Shodan;
pub use urlscan::UrlScan;
pub use virustotal::VirusTotal;

use std::sync::Arc;

use ioclens_engine::SummarizerRegistry;

/// Registry with every bundled summarizer registered.
pub fn default_registry() -> SummarizerRegistry {
    let mut registry = SummarizerRegistry::new();
    registry.register(Arc::new(VirusTotal));
    registry.register(Arc::new(Shodan));
    registry.register(Arc::new(AbuseIpdb));
    registry.register(Arc::new(UrlScan));
    registry.register(Arc::new(GreyNoise));
    registry
}
