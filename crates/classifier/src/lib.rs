use ioclens_protocol::IocType;
use once_cell::sync::Lazy;
use regex::Regex;

/// Ordered pattern table. Order is load-bearing and fixed:
///
/// - hash lengths come before IP/domain forms, so a 32/40/64-hex-char string
///   is never misread as a hostname;
/// - `Url` comes before `Domain`, because a URL's host portion would satisfy
///   the domain pattern on its own.
///
/// First match wins; no pattern here may be reordered without revisiting the
/// overlap between them.
static PATTERNS: Lazy<Vec<(IocType, Regex)>> = Lazy::new(|| {
    [
        (IocType::Md5, r"^[0-9a-fA-F]{32}$"),
        (IocType::Sha1, r"^[0-9a-fA-F]{40}$"),
        (IocType::Sha256, r"^[0-9a-fA-F]{64}$"),
        (
            IocType::Ipv4,
            r"^(?:(?:25[0-5]|2[0-4][0-9]|1[0-9]{2}|[1-9]?[0-9])\.){3}(?:25[0-5]|2[0-4][0-9]|1[0-9]{2}|[1-9]?[0-9])$",
        ),
        // Tolerant form: full, compressed (::) and loopback addresses. At
        // least two colon-terminated groups, so "ab:cd" port-ish tokens and
        // bare hex do not qualify.
        (
            IocType::Ipv6,
            r"^(?:[0-9a-fA-F]{0,4}:){2,7}[0-9a-fA-F]{0,4}$",
        ),
        (IocType::Cve, r"(?i)^CVE-[0-9]{4}-[0-9]{4,7}$"),
        (IocType::Url, r"(?i)^https?://[^\s]+$"),
        (
            IocType::Domain,
            r"(?i)^(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,63}$",
        ),
        (IocType::Email, r"^[^\s@]+@[^\s@]+\.[^\s@]+$"),
    ]
    .into_iter()
    .map(|(ioc_type, pattern)| {
        let regex = Regex::new(pattern).expect("classifier pattern must compile");
        (ioc_type, regex)
    })
    .collect()
});

/// Classifies a free-text token into exactly one [`IocType`].
///
/// Pure and total: the input is trimmed, tested against the ordered pattern
/// table, and the first match is returned. An empty or unrecognized token
/// classifies as `Unknown` rather than failing.
pub fn classify(raw: &str) -> IocType {
    let token = raw.trim();
    if token.is_empty() {
        return IocType::Unknown;
    }
    for (ioc_type, pattern) in PATTERNS.iter() {
        if pattern.is_match(token) {
            return *ioc_type;
        }
    }
    IocType::Unknown
}
