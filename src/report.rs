use serde::{Deserialize, Serialize};
use serde_json::Value;
use indexmap::IndexMap;
use chrono::{DateTime, Utc};

use crate::nodes::NodeKind;
use crate::spread::{ErrorSpan, SpreadResult};
use crate::token::Token;

/// Metadata for a check report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Version of the report format
    pub version: String,

    /// Timestamp when the report was generated
    pub generated_at: DateTime<Utc>,

    /// Number of files checked
    pub files_checked: usize,

    /// Total number of findings over all files
    pub findings: usize,

    /// Variant separator the files were parsed with
    pub separator: String,

    /// Checker version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checker_version: Option<String>,
}

/// Which bucket a finding came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FindingKind {
    NotClosed,
    EmptyGroup,
    EmptyVariants,
    Unknown,
}

impl FindingKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FindingKind::NotClosed => "notClosed",
            FindingKind::EmptyGroup => "emptyGroup",
            FindingKind::EmptyVariants => "emptyVariants",
            FindingKind::Unknown => "unknown",
        }
    }
}

/// One structural problem in a checked file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub kind: FindingKind,

    /// Kind of the offending node, e.g. `Group` or `ArbitraryVariant`
    pub node: String,

    /// Source text of the offending region
    pub text: String,

    /// 1-based line and column of the region start
    pub line: usize,
    pub column: usize,

    /// Enclosing variants, outermost first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<String>,

    #[serde(default)]
    pub important: bool,
}

impl Finding {
    fn new(kind: FindingKind, source: &str, node: NodeKind, target: Token<'_>, variants: &[Token<'_>], important: bool) -> Self {
        let (line, column) = line_column(source, target.start);
        Self {
            kind,
            node: node.to_string(),
            text: target.text.to_string(),
            line,
            column,
            variants: variants.iter().map(|v| v.text.to_string()).collect(),
            important,
        }
    }

    fn from_span(kind: FindingKind, source: &str, span: &ErrorSpan<'_>) -> Self {
        Self::new(kind, source, span.kind, span.target, &span.variants, span.important)
    }

    /// `line:column` as used in editor links
    pub fn location(&self) -> String {
        format!("{}:{}", self.line, self.column)
    }
}

/// Findings and item count for one file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileReport {
    /// Number of well-formed items
    pub items: usize,

    pub findings: Vec<Finding>,
}

impl FileReport {
    /// Collect every error bucket plus unrecognised items, ordered by offset.
    pub fn from_spread(source: &str, result: &SpreadResult<'_>) -> Self {
        let mut ordered: Vec<(usize, Finding)> = Vec::new();
        let buckets = [
            (FindingKind::NotClosed, &result.not_closed),
            (FindingKind::EmptyGroup, &result.empty_group),
            (FindingKind::EmptyVariants, &result.empty_variants),
        ];
        for (kind, spans) in buckets {
            for span in spans.iter() {
                ordered.push((span.target.start, Finding::from_span(kind, source, span)));
            }
        }
        for item in result.unknown() {
            let finding = Finding::new(
                FindingKind::Unknown,
                source,
                item.kind,
                item.target,
                &item.variants,
                item.important,
            );
            ordered.push((item.target.start, finding));
        }
        ordered.sort_by_key(|(offset, _)| *offset);

        Self {
            items: result.items.len() - result.unknown().count(),
            findings: ordered.into_iter().map(|(_, finding)| finding).collect(),
        }
    }
}

/// Complete check report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    /// Metadata about the run
    pub metadata: ReportMetadata,

    /// Per-file results in the order files were matched
    pub files: IndexMap<String, FileReport>,

    /// Statistics about the run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<ReportStatistics>,
}

/// Statistics about the check run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportStatistics {
    /// Number of files with at least one finding
    pub files_with_findings: usize,

    /// Total well-formed items over all files
    pub items: usize,

    /// Finding counts per kind
    pub by_kind: IndexMap<String, usize>,

    /// Processing time in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<u64>,
}

impl CheckReport {
    /// Create an empty report for `separator`
    pub fn new(separator: &str) -> Self {
        Self {
            metadata: ReportMetadata {
                version: "1.0.0".to_string(),
                generated_at: Utc::now(),
                files_checked: 0,
                findings: 0,
                separator: separator.to_string(),
                checker_version: Some(env!("CARGO_PKG_VERSION").to_string()),
            },
            files: IndexMap::new(),
            statistics: None,
        }
    }

    /// Add or replace the results for one file
    pub fn add_file(&mut self, path: String, file: FileReport) {
        self.files.insert(path, file);
        self.metadata.files_checked = self.files.len();
        self.metadata.findings = self.files.values().map(|f| f.findings.len()).sum();
    }

    pub fn has_findings(&self) -> bool {
        self.metadata.findings > 0
    }

    /// Calculate and set statistics
    pub fn calculate_statistics(&mut self, processing_time_ms: Option<u64>) {
        let mut by_kind = IndexMap::new();
        for kind in [
            FindingKind::NotClosed,
            FindingKind::EmptyGroup,
            FindingKind::EmptyVariants,
            FindingKind::Unknown,
        ] {
            by_kind.insert(kind.as_str().to_string(), 0);
        }
        for finding in self.files.values().flat_map(|f| f.findings.iter()) {
            *by_kind.entry(finding.kind.as_str().to_string()).or_insert(0) += 1;
        }

        self.statistics = Some(ReportStatistics {
            files_with_findings: self.files.values().filter(|f| !f.findings.is_empty()).count(),
            items: self.files.values().map(|f| f.items).sum(),
            by_kind,
            processing_time_ms,
        });
    }

    /// Convert report to JSON value
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({}))
    }

    /// Convert report to pretty JSON string
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Builder pattern for creating reports
pub struct CheckReportBuilder {
    report: CheckReport,
    start_time: Option<std::time::Instant>,
}

impl CheckReportBuilder {
    /// Create a new report builder
    pub fn new(separator: &str) -> Self {
        Self {
            report: CheckReport::new(separator),
            start_time: Some(std::time::Instant::now()),
        }
    }

    /// Add the results for one file
    pub fn with_file(mut self, path: String, file: FileReport) -> Self {
        self.report.add_file(path, file);
        self
    }

    /// Build the final report with statistics
    pub fn build(mut self) -> CheckReport {
        let processing_time = self.start_time.map(|t| t.elapsed().as_millis() as u64);
        self.report.calculate_statistics(processing_time);
        self.report
    }
}

/// 1-based line and character column of a byte offset.
pub fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let before = source.get(..offset).unwrap_or(source);
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}
