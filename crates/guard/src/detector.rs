//! Threat detection over the signature table.

use crate::signatures::{signatures, Severity, ThreatCategory};

/// Outcome of a signature scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreatMatch {
    pub category: ThreatCategory,
    pub severity: Severity,
}

/// Scan `text` against the full signature table.
///
/// Every signature is evaluated; composite payloads that straddle two
/// classic patterns (`') OR ('1'='1'--`) are caught because no
/// category group short-circuits the rest. Returns the
/// highest-severity match, first-listed on ties.
pub fn detect(text: &str) -> Option<ThreatMatch> {
    let mut best: Option<ThreatMatch> = None;
    for signature in signatures() {
        if !signature.is_match(text) {
            continue;
        }
        let hit = ThreatMatch {
            category: signature.category,
            severity: signature.severity,
        };
        match best {
            Some(current) if current.severity >= hit.severity => {}
            _ => best = Some(hit),
        }
    }
    best
}
