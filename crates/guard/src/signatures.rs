//! Data-driven threat signature table.
//!
//! One flat rule list shared read-only across all requests; adding a
//! signature is a new `RULES` row, never a new code path. Compiled
//! once at first use and held for the process lifetime.

use regex::Regex;
use std::sync::LazyLock;

/// Threat category a signature belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThreatCategory {
    Sql,
    Xss,
    Traversal,
}

impl ThreatCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sql => "sql",
            Self::Xss => "xss",
            Self::Traversal => "traversal",
        }
    }
}

/// Signature severity, ordered weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

/// A compiled threat signature.
pub struct Signature {
    pub category: ThreatCategory,
    pub severity: Severity,
    regex: Regex,
}

impl Signature {
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// Raw rule rows: (category, severity, pattern). All patterns match
/// case-insensitively via inline `(?i)`.
const RULES: &[(ThreatCategory, Severity, &str)] = &[
    // SQL keyword verbs
    (ThreatCategory::Sql, Severity::High, r"(?i)\bunion\s+(?:all\s+)?select\b"),
    (ThreatCategory::Sql, Severity::High, r"(?i)\bselect\b.+\bfrom\b"),
    (ThreatCategory::Sql, Severity::High, r"(?i)\binsert\s+into\b"),
    (ThreatCategory::Sql, Severity::High, r"(?i)\bupdate\s+\w+\s+set\b"),
    (ThreatCategory::Sql, Severity::High, r"(?i)\bdelete\s+from\b"),
    (ThreatCategory::Sql, Severity::Critical, r"(?i)\bdrop\s+(?:table|database|index)\b"),
    (ThreatCategory::Sql, Severity::Critical, r"(?i)\btruncate\s+table\b"),
    (ThreatCategory::Sql, Severity::High, r"(?i)\bexec(?:ute)?\s*\("),
    (ThreatCategory::Sql, Severity::Critical, r"(?i)\bxp_cmdshell\b"),
    // Boolean tautologies, quoted and bare
    (
        ThreatCategory::Sql,
        Severity::High,
        r#"(?i)'\s*\)?\s*or\s*\(?\s*'?\w+'?\s*=\s*'?\w+"#,
    ),
    (ThreatCategory::Sql, Severity::Medium, r"(?i)\b(?:or|and)\s+\d+\s*=\s*\d+"),
    // Comment and terminator sequences
    (ThreatCategory::Sql, Severity::Medium, r"['\)\d;]\s*--"),
    (ThreatCategory::Sql, Severity::Medium, r"'\s*;"),
    (ThreatCategory::Sql, Severity::Medium, r"(?s)/\*.*?\*/"),
    // Timing primitives
    (
        ThreatCategory::Sql,
        Severity::High,
        r"(?i)\b(?:sleep|pg_sleep|benchmark)\s*\(",
    ),
    (ThreatCategory::Sql, Severity::High, r"(?i)\bwaitfor\s+delay\b"),
    // Hex-literal obfuscation
    (ThreatCategory::Sql, Severity::Medium, r"(?i)\b0x[0-9a-f]+\b"),
    // Script injection
    (ThreatCategory::Xss, Severity::Critical, r"(?i)<script[^>]*>"),
    (ThreatCategory::Xss, Severity::High, r"(?i)javascript\s*:"),
    (
        ThreatCategory::Xss,
        Severity::High,
        r"(?i)\bon(?:load|error|click|mouseover|focus|blur|submit|change|input)\s*=",
    ),
    (ThreatCategory::Xss, Severity::High, r"(?i)<iframe[^>]*>"),
    (ThreatCategory::Xss, Severity::Medium, r"(?i)<(?:embed|object|applet)[^>]*>"),
    (ThreatCategory::Xss, Severity::Medium, r"(?i)\bexpression\s*\("),
    (ThreatCategory::Xss, Severity::Medium, r#"(?i)url\s*\(\s*['"]?\s*javascript"#),
    (ThreatCategory::Xss, Severity::Medium, r"(?i)data:text/html"),
    (
        ThreatCategory::Xss,
        Severity::Medium,
        r"(?i)\b(?:document\.cookie|document\.write|window\.location)\b",
    ),
    // Path traversal
    (ThreatCategory::Traversal, Severity::High, r"\.\.[/\\]"),
    (ThreatCategory::Traversal, Severity::High, r"(?i)%2e%2e[/\\%]"),
    (ThreatCategory::Traversal, Severity::High, r"(?i)%252e%252e[/\\%]"),
    (
        ThreatCategory::Traversal,
        Severity::High,
        r"(?i)/etc/(?:passwd|shadow|hosts)",
    ),
    (ThreatCategory::Traversal, Severity::Medium, r"(?i)c:\\windows\\"),
];

/// Compiled signature table (lazy initialization).
static SIGNATURES: LazyLock<Vec<Signature>> = LazyLock::new(|| {
    RULES
        .iter()
        .map(|&(category, severity, pattern)| Signature {
            category,
            severity,
            regex: Regex::new(pattern)
                .unwrap_or_else(|e| panic!("invalid threat signature `{pattern}`: {e}")),
        })
        .collect()
});

/// The full signature table.
pub fn signatures() -> &'static [Signature] {
    &SIGNATURES
}
