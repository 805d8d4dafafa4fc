use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier of a lookup backend ("virustotal", "shodan", ...).
///
/// Kept as a plain string on the wire; the summarizer registry is the only
/// place that interprets it.
pub type ServiceId = String;

/// Indicator categories a free-text token can classify into.
///
/// Exactly one value per indicator; assignment is immutable once computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IocType {
    Ipv4,
    Ipv6,
    Md5,
    Sha1,
    Sha256,
    Url,
    Domain,
    Email,
    Cve,
    Unknown,
}

impl IocType {
    /// Every variant, in declaration order. Group buckets are seeded from
    /// this so that empty buckets exist from initialization.
    pub const ALL: [IocType; 10] = [
        IocType::Ipv4,
        IocType::Ipv6,
        IocType::Md5,
        IocType::Sha1,
        IocType::Sha256,
        IocType::Url,
        IocType::Domain,
        IocType::Email,
        IocType::Cve,
        IocType::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IocType::Ipv4 => "ipv4",
            IocType::Ipv6 => "ipv6",
            IocType::Md5 => "md5",
            IocType::Sha1 => "sha1",
            IocType::Sha256 => "sha256",
            IocType::Url => "url",
            IocType::Domain => "domain",
            IocType::Email => "email",
            IocType::Cve => "cve",
            IocType::Unknown => "unknown",
        }
    }

    /// Human-facing label for tab headers and table output.
    pub fn label(&self) -> &'static str {
        match self {
            IocType::Ipv4 => "IPv4",
            IocType::Ipv6 => "IPv6",
            IocType::Md5 => "MD5",
            IocType::Sha1 => "SHA1",
            IocType::Sha256 => "SHA256",
            IocType::Url => "URL",
            IocType::Domain => "Domain",
            IocType::Email => "Email",
            IocType::Cve => "CVE",
            IocType::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for IocType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// TLP-style severity attached to a lookup result.
///
/// Variants are declared in ascending precedence so the derived `Ord` is the
/// reduction order: `Red > Amber > Green > Blue > White`. `White` is the
/// default and an explicit value in its own right; it is never shorthand for
/// "absent".
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    White,
    Blue,
    Green,
    Amber,
    Red,
}

impl Severity {
    /// Reduces a set of per-service severities to one overall severity.
    ///
    /// Empty input yields `White`. Otherwise the highest-precedence value
    /// present wins; the reduction is a set operation, invariant under input
    /// permutation.
    pub fn reduce<I>(severities: I) -> Severity
    where
        I: IntoIterator<Item = Severity>,
    {
        severities.into_iter().max().unwrap_or(Severity::White)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::White => "white",
            Severity::Blue => "blue",
            Severity::Green => "green",
            Severity::Amber => "amber",
            Severity::Red => "red",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The deduplicated request handed to the transport layer for fan-out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundRequest {
    pub iocs: Vec<String>,
    pub services: Vec<ServiceId>,
}

/// One decoded record from the inbound event stream.
///
/// Each record resolves exactly one (ioc, service) pair. `data` and `error`
/// are mutually exclusive in a well-behaved stream; if both arrive, `error`
/// wins and the pair is terminal as an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamEvent {
    pub ioc: String,
    pub service: ServiceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// What a per-service summarizer distills a raw backend payload into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceSummary {
    pub summary: String,
    pub tlp: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_metric: Option<Value>,
}

impl ServiceSummary {
    pub fn new(summary: impl Into<String>, tlp: Severity) -> Self {
        Self {
            summary: summary.into(),
            tlp,
            key_metric: None,
        }
    }

    pub fn with_metric(mut self, metric: impl Into<Value>) -> Self {
        self.key_metric = Some(metric.into());
        self
    }
}
