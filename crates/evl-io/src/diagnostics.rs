use serde::Serialize;

/// Severity level for import issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning, // Imported with a missing value (e.g., non-numeric demand)
    Error,   // Row dropped (e.g., empty geography label, duplicate key)
}

/// A single issue encountered during import
#[derive(Debug, Clone, Serialize)]
pub struct ImportIssue {
    pub severity: Severity,
    pub category: String, // "coerce", "duplicate", "label"
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u64>,
}

/// Statistics about the import
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportStats {
    pub sources: usize,
    pub rows: usize,
    pub records: usize,
    pub missing_values: usize,
    pub skipped_rows: usize,
    pub states: usize,
    pub counties: usize,
}

/// Complete diagnostics for a load
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportDiagnostics {
    pub stats: ImportStats,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<ImportIssue>,
}

impl ImportDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// A value was coerced to missing; the row is kept.
    pub fn add_missing_value(&mut self, origin: &str, line: Option<u64>, message: String) {
        self.issues.push(ImportIssue {
            severity: Severity::Warning,
            category: "coerce".to_string(),
            message,
            origin: Some(origin.to_string()),
            line,
        });
        self.stats.missing_values += 1;
    }

    /// A row was dropped.
    pub fn add_skipped_row(
        &mut self,
        category: &str,
        origin: &str,
        line: Option<u64>,
        message: String,
    ) {
        self.issues.push(ImportIssue {
            severity: Severity::Error,
            category: category.to_string(),
            message,
            origin: Some(origin.to_string()),
            line,
        });
        self.stats.skipped_rows += 1;
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }

    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Merge diagnostics of another source, summing row statistics.
    pub fn merge(&mut self, other: ImportDiagnostics) {
        self.issues.extend(other.issues);
        self.stats.sources += other.stats.sources;
        self.stats.rows += other.stats.rows;
        self.stats.records += other.stats.records;
        self.stats.missing_values += other.stats.missing_values;
        self.stats.skipped_rows += other.stats.skipped_rows;
    }

    /// Emit one summary line plus the first few issues.
    pub fn log_summary(&self) {
        tracing::info!(
            sources = self.stats.sources,
            records = self.stats.records,
            missing_values = self.stats.missing_values,
            skipped_rows = self.stats.skipped_rows,
            "demand data loaded"
        );
        for issue in self.issues.iter().take(20) {
            tracing::warn!(
                category = %issue.category,
                origin = issue.origin.as_deref().unwrap_or("-"),
                line = issue.line.unwrap_or(0),
                "{}",
                issue.message
            );
        }
        if self.issues.len() > 20 {
            tracing::warn!(suppressed = self.issues.len() - 20, "further import issues suppressed");
        }
    }
}
