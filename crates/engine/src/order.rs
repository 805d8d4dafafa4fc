use std::collections::BTreeMap;

use ioclens_protocol::IocType;

use crate::state::IocRecord;

/// Tab-display preference. Types not listed here (i.e. `Unknown`, and any
/// future variant) go after the listed ones, in bucket order.
const PREFERRED_ORDER: [IocType; 9] = [
    IocType::Ipv4,
    IocType::Ipv6,
    IocType::Domain,
    IocType::Url,
    IocType::Md5,
    IocType::Sha1,
    IocType::Sha256,
    IocType::Email,
    IocType::Cve,
];

/// Stable, preference-weighted ordering of the type groups that have at
/// least one member. Recomputed when group membership changes, not on every
/// cell update; with membership fixed at request-build time, that is once
/// per run.
pub fn ordered_types(groups: &BTreeMap<IocType, Vec<IocRecord>>) -> Vec<IocType> {
    let non_empty = |ioc_type: &IocType| {
        groups
            .get(ioc_type)
            .map(|bucket| !bucket.is_empty())
            .unwrap_or(false)
    };

    let mut ordered: Vec<IocType> = PREFERRED_ORDER
        .iter()
        .copied()
        .filter(non_empty)
        .collect();
    for (ioc_type, bucket) in groups {
        if !bucket.is_empty() && !PREFERRED_ORDER.contains(ioc_type) {
            ordered.push(*ioc_type);
        }
    }
    ordered
}
