//! Service response payloads.

use serde::{Deserialize, Serialize};

/// Outcome of a completed analysis submission.
///
/// Every field defaults, so an empty JSON object decodes to
/// `AnalyzeResponse::default()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AnalyzeResponse {
    /// Identifier the service assigned to this submission
    pub submission_id: String,
    /// Where the report can be fetched
    pub result_url: String,
    /// Bearer token required to fetch the report, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_auth_token: Option<String>,
}

impl AnalyzeResponse {
    /// Create response pointing at a result location
    pub fn new(result_url: impl Into<String>) -> Self {
        Self {
            result_url: result_url.into(),
            ..Default::default()
        }
    }

    /// Attach an auth token
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.result_auth_token = Some(token.into());
        self
    }

    /// Token to send as a bearer credential; empty tokens count as absent
    pub fn auth_token(&self) -> Option<&str> {
        self.result_auth_token.as_deref().filter(|t| !t.is_empty())
    }
}

/// A report representation the service can produce.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ResultFormat {
    /// Human-readable name (e.g. "Excel")
    pub display_name: String,
    /// MIME type sent as `Accept` when fetching the report
    pub mime_type: String,
    /// Suggested file extension, including the dot
    pub file_extension: String,
}

impl ResultFormat {
    /// Format identified only by MIME type
    pub fn from_mime(mime_type: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            ..Default::default()
        }
    }
}

impl std::fmt::Display for ResultFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.display_name.is_empty() {
            write!(f, "{}", self.mime_type)
        } else {
            write!(f, "{} ({})", self.display_name, self.mime_type)
        }
    }
}

/// Target platform entry as listed by the service.
///
/// Older deployments list bare identifiers, newer ones list objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TargetEntry {
    /// Plain identifier
    Name(String),
    /// Structured target information
    Info(TargetInfo),
}

/// Structured target information
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct TargetInfo {
    /// Platform name
    pub name: String,
    /// Platform version, may be empty
    pub version: String,
    /// Whether the service selects this target when none are given
    pub is_default: bool,
}

impl TargetEntry {
    /// Identifier usable in [`AnalyzeRequest`](super::AnalyzeRequest) targets
    pub fn identifier(&self) -> String {
        match self {
            TargetEntry::Name(name) => name.clone(),
            TargetEntry::Info(info) if info.version.is_empty() => info.name.clone(),
            TargetEntry::Info(info) => format!("{},Version={}", info.name, info.version),
        }
    }
}

/// Finished report as returned by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Raw report bytes
    pub data: bytes::Bytes,
    /// Declared MIME type of `data`
    pub mime_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        let response: AnalyzeResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response, AnalyzeResponse::default());
        assert!(response.auth_token().is_none());
    }

    #[test]
    fn test_response_wire_names() {
        let json = r#"{
            "SubmissionId": "42",
            "ResultUrl": "https://svc/r/42",
            "ResultAuthToken": "tok"
        }"#;
        let response: AnalyzeResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.submission_id, "42");
        assert_eq!(response.result_url, "https://svc/r/42");
        assert_eq!(response.auth_token(), Some("tok"));
    }

    #[test]
    fn test_empty_token_counts_as_absent() {
        let response = AnalyzeResponse::new("https://svc/r").with_auth_token("");
        assert!(response.auth_token().is_none());
    }

    #[test]
    fn test_target_entries() {
        let json = r#"["Plain", {"Name":".NET Core","Version":"2.0"}, {"Name":"Mono"}]"#;
        let entries: Vec<TargetEntry> = serde_json::from_str(json).unwrap();
        let ids: Vec<String> = entries.iter().map(TargetEntry::identifier).collect();
        assert_eq!(ids, vec!["Plain", ".NET Core,Version=2.0", "Mono"]);
    }

    #[test]
    fn test_result_format_display() {
        let format = ResultFormat {
            display_name: "HTML".to_string(),
            mime_type: "text/html".to_string(),
            file_extension: ".html".to_string(),
        };
        assert_eq!(format.to_string(), "HTML (text/html)");
        assert_eq!(ResultFormat::from_mime("text/csv").to_string(), "text/csv");
    }
}
