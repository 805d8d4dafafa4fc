use ioclens_classifier::classify;
use ioclens_protocol::{OutboundRequest, ServiceId};

use crate::error::BuildError;
use crate::state::{AggregationState, IocRecord};

/// Builds a fresh aggregation run from raw indicator text.
///
/// Tokens are split on runs of whitespace and commas, trimmed, and
/// deduplicated by exact (case-sensitive) string equality, preserving
/// first-seen order. Each surviving token is classified and seeded with one
/// `Idle` cell per selected service.
///
/// The returned state fully replaces any prior run's state (the caller drops
/// the old one); there is no partial carry-over between runs.
pub fn build_request(
    raw_text: &str,
    services: &[ServiceId],
) -> Result<(AggregationState, OutboundRequest), BuildError> {
    let tokens = tokenize(raw_text);
    if tokens.is_empty() {
        return Err(BuildError::EmptyInput);
    }
    if services.is_empty() {
        return Err(BuildError::NoServices);
    }

    let mut state = AggregationState::new();
    for (ordinal, token) in tokens.iter().enumerate() {
        let ioc_type = classify(token);
        state.insert(IocRecord::new(token.clone(), ioc_type, ordinal, services));
    }

    let request = OutboundRequest {
        iocs: tokens,
        services: services.to_vec(),
    };
    Ok((state, request))
}

fn tokenize(raw_text: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut tokens = Vec::new();
    for token in raw_text.split(|c: char| c.is_whitespace() || c == ',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        if seen.insert(token.to_string()) {
            tokens.push(token.to_string());
        }
    }
    tokens
}
