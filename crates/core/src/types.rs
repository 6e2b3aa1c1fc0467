//! Shared data model for the library audit.

/// The mutable tag state of one audio file.
///
/// Zero means "unset" for the numeric fields, mirroring how the tag formats
/// report absent frames. Rules mutate the snapshot in place; the tag store
/// persists the whole snapshot in one write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackMetadata {
    pub title: String,
    pub performers: Vec<String>,
    pub genres: Vec<String>,
    pub comment: String,
    pub year: u32,
    pub album_artists: Vec<String>,
    pub composers: Vec<String>,
    pub disc: u32,
    pub album: String,
    pub track: u32,
    /// Raw embedded picture payloads. Only emptiness matters to the rules.
    pub pictures: Vec<Vec<u8>>,
}

/// Facts derived from a terminal folder before its files are checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderContext {
    pub artist_name: String,
    /// Present in album folders, absent in artist-only folders.
    pub album_name: Option<String>,
}

/// Severity of one reported finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Silent repair: the corrected value is unambiguous and already applied.
    Info,
    /// Advisory violation.
    Warning,
    /// Convention-breaking violation that needs human resolution.
    Error,
}

/// One detected problem or applied repair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub severity: Severity,
    pub message: String,
}

/// Ordered findings for one checked file.
///
/// Rules accumulate here instead of short-circuiting, so a file with five
/// problems gets all five reported. The walker forwards every entry to the
/// log stream at the matching level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViolationReport {
    entries: Vec<Violation>,
}

impl ViolationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Severity::Error, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(Severity::Warning, message);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Severity::Info, message);
    }

    fn push(&mut self, severity: Severity, message: impl Into<String>) {
        self.entries.push(Violation {
            severity,
            message: message.into(),
        });
    }

    pub fn entries(&self) -> &[Violation] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries at the given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.entries
            .iter()
            .filter(|v| v.severity == severity)
            .count()
    }
}

impl<'a> IntoIterator for &'a ViolationReport {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Aggregate counters for one full tree walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub folders_visited: usize,
    pub files_checked: usize,
    pub files_updated: usize,
    pub errors: usize,
    pub warnings: usize,
    pub repairs: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_preserves_order_and_counts() {
        let mut report = ViolationReport::new();
        report.error("title missing");
        report.info("trimmed album");
        report.warning("track not set");
        report.error("bad genre");

        let severities: Vec<Severity> =
            report.entries().iter().map(|v| v.severity).collect();
        assert_eq!(
            severities,
            vec![
                Severity::Error,
                Severity::Info,
                Severity::Warning,
                Severity::Error
            ]
        );
        assert_eq!(report.count(Severity::Error), 2);
        assert_eq!(report.count(Severity::Warning), 1);
        assert_eq!(report.count(Severity::Info), 1);
        assert!(!report.is_empty());
    }
}
