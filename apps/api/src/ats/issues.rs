use serde::{Deserialize, Serialize};

/// Kinds of ATS compliance problems. Serialized as snake_case for downstream reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    Color,
    Font,
    GarbledText,
    MissingContent,
    EncodingError,
    StructureError,
}

/// Only `Error` flips `success` / `is_compliant` to false.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub severity: Severity,
    pub message: String,
    pub suggestion: String,
}

impl ValidationIssue {
    pub fn error(
        issue_type: IssueType,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self {
            issue_type,
            severity: Severity::Error,
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    pub fn warning(
        issue_type: IssueType,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self {
            issue_type,
            severity: Severity::Warning,
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    pub fn is_blocking(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// True when no issue is error-severity.
pub fn passes(issues: &[ValidationIssue]) -> bool {
    !issues.iter().any(ValidationIssue::is_blocking)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_serializes_type_and_severity_as_strings() {
        let issue = ValidationIssue::error(IssueType::GarbledText, "bad", "fix it");
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["type"], "garbled_text");
        assert_eq!(json["severity"], "error");
        assert_eq!(json["suggestion"], "fix it");
    }

    #[test]
    fn test_warnings_do_not_block() {
        let issues = vec![ValidationIssue::warning(IssueType::Font, "small", "bigger")];
        assert!(passes(&issues));
    }

    #[test]
    fn test_single_error_blocks() {
        let issues = vec![
            ValidationIssue::warning(IssueType::Font, "small", "bigger"),
            ValidationIssue::error(IssueType::Color, "grey", "black"),
        ];
        assert!(!passes(&issues));
    }
}
