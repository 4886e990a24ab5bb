use edifact_types::SegmentPosition;

/// Severity level of a parse or validation diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    /// Non-fatal: the interchange still parses, but something looks off.
    Warning,
    /// Fatal to the operation that produced it.
    Error,
}

/// A single diagnostic raised while parsing, generating, or validating an
/// interchange.
///
/// Mirrors the shape of a validation issue report, trimmed to the fields
/// an envelope-level check actually needs (no AHB rule/condition fields,
/// since this crate has no directory-condition engine).
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Machine-readable, stable code (e.g. "MISSING_UNZ").
    pub code: &'static str,
    /// Human-readable message.
    pub message: String,
    /// Position of the segment that triggered this diagnostic, if known.
    pub position: Option<SegmentPosition>,
    /// Segment identifier involved, if any.
    pub segment_id: Option<String>,
    /// Severity of the diagnostic.
    pub severity: Severity,
}

impl Diagnostic {
    pub fn error(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            position: None,
            segment_id: None,
            severity: Severity::Error,
        }
    }

    pub fn warning(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            position: None,
            segment_id: None,
            severity: Severity::Warning,
        }
    }

    pub fn with_position(mut self, position: SegmentPosition) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_segment_id(mut self, segment_id: impl Into<String>) -> Self {
        self.segment_id = Some(segment_id.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARN",
        };
        write!(f, "[{level}] {}: {}", self.code, self.message)?;
        if let Some(ref id) = self.segment_id {
            write!(f, " (segment {id})")?;
        }
        if let Some(pos) = self.position {
            write!(f, " at {pos}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_has_error_severity() {
        let d = Diagnostic::error("MISSING_UNZ", "no UNZ segment found");
        assert!(d.is_error());
    }

    #[test]
    fn warning_is_not_error() {
        let d = Diagnostic::warning("COUNT_MISMATCH", "counts disagree");
        assert!(!d.is_error());
    }

    #[test]
    fn display_includes_code_and_message() {
        let d = Diagnostic::error("MISSING_UNT", "no matching UNT")
            .with_segment_id("UNH")
            .with_position(SegmentPosition::new(3, 42, 1));
        let text = d.to_string();
        assert!(text.contains("MISSING_UNT"));
        assert!(text.contains("no matching UNT"));
        assert!(text.contains("UNH"));
    }
}
