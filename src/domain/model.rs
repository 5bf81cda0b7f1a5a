use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which webhook a submission goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Production,
    Test,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Production => "production",
            Environment::Test => "test",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "test" => Ok(Environment::Test),
            other => Err(format!(
                "unknown environment '{}', expected production or test",
                other
            )),
        }
    }
}

/// How the file and its metadata are laid out in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Encoding {
    /// Metadata as form fields, file as a `script_file` part.
    #[default]
    Multipart,
    /// One JSON object, file embedded as base64 text.
    JsonBase64,
    /// File bytes as the body, metadata in `X-*` headers.
    RawBinary,
}

impl Encoding {
    /// Name shown in the upload form.
    pub fn label(&self) -> &'static str {
        match self {
            Encoding::Multipart => "Standard",
            Encoding::JsonBase64 => "Base64",
            Encoding::RawBinary => "Binary",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Encoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" | "multipart" => Ok(Encoding::Multipart),
            "base64" | "json" | "json-base64" => Ok(Encoding::JsonBase64),
            "binary" | "raw" | "raw-binary" => Ok(Encoding::RawBinary),
            other => Err(format!(
                "unknown upload method '{}', expected standard, base64 or binary",
                other
            )),
        }
    }
}

/// Per-session state, owned by the caller and handed to each handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub authenticated_email: Option<String>,
    pub debug_enabled: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated_email.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRequest {
    pub project_title: String,
    pub environment: Environment,
    pub encoding: Encoding,
    pub file_name: String,
    pub file_bytes: Vec<u8>,
    pub mime_type: String,
    pub user_email: String,
}

/// Fields pulled out of a 200 JSON response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionResult {
    pub status: String,
    pub message: Option<String>,
    pub document_url: Option<String>,
    pub document_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchFailure {
    /// The webhook answered with something other than 200.
    Rejected { status: u16, body: String },
    Timeout,
    Connection { detail: String },
    Other { detail: String },
}

impl DispatchFailure {
    pub fn user_message(&self) -> &'static str {
        match self {
            DispatchFailure::Rejected { .. } => {
                "❌ Submission failed. Please try again or contact support."
            }
            DispatchFailure::Timeout => {
                "❌ Request timed out. The file might be too large or the server is slow."
            }
            DispatchFailure::Connection { .. } => {
                "❌ Connection error. Please check your internet connection."
            }
            DispatchFailure::Other { .. } => "❌ Failed to submit the script. Please try again.",
        }
    }

    /// Detail only revealed when debug mode is on.
    pub fn debug_detail(&self) -> Option<String> {
        match self {
            DispatchFailure::Rejected { status, body } => {
                Some(format!("Status: {}\nResponse: {}...", status, body))
            }
            DispatchFailure::Timeout => None,
            DispatchFailure::Connection { detail } | DispatchFailure::Other { detail } => {
                Some(detail.clone())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Delivered(SubmissionResult),
    /// 200 with a body that is not a JSON object.
    Accepted,
    Failed(DispatchFailure),
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, SubmissionOutcome::Failed(_))
    }

    pub fn document_url(&self) -> Option<&str> {
        match self {
            SubmissionOutcome::Delivered(result) => result.document_url.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingReport {
    pub status: u16,
    pub body_preview: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_accepts_form_labels() {
        assert_eq!("Standard".parse::<Encoding>().unwrap(), Encoding::Multipart);
        assert_eq!("base64".parse::<Encoding>().unwrap(), Encoding::JsonBase64);
        assert_eq!("BINARY".parse::<Encoding>().unwrap(), Encoding::RawBinary);
        assert!("ftp".parse::<Encoding>().is_err());
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!("production".parse::<Environment>().unwrap(), Environment::Production);
        assert_eq!(" Test ".parse::<Environment>().unwrap(), Environment::Test);
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn test_timeout_failure_has_no_debug_detail() {
        assert!(DispatchFailure::Timeout.debug_detail().is_none());
        let rejected = DispatchFailure::Rejected {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(
            rejected.debug_detail().unwrap(),
            "Status: 500\nResponse: boom..."
        );
    }
}
