use crate::domain::model::{DispatchFailure, SubmissionOutcome, SubmissionResult};

pub const BODY_PREVIEW_CHARS: usize = 200;

pub fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}

/// Maps a completed HTTP exchange to an outcome. Only an exact 200 counts as
/// delivered; the `status` field in the body is reported but never judged.
pub fn interpret(status: u16, body: &str) -> SubmissionOutcome {
    if status != 200 {
        return SubmissionOutcome::Failed(DispatchFailure::Rejected {
            status,
            body: preview(body),
        });
    }

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(fields)) => {
            let field = |name: &str| -> Option<String> {
                match fields.get(name)? {
                    serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
                    serde_json::Value::Number(n) => Some(n.to_string()),
                    _ => None,
                }
            };

            SubmissionOutcome::Delivered(SubmissionResult {
                status: field("status").unwrap_or_else(|| "Unknown".to_string()),
                message: field("message"),
                document_url: field("document_url"),
                document_id: field("document_id"),
            })
        }
        Ok(_) | Err(_) => {
            tracing::debug!("200 response without a JSON object body, assuming background processing");
            SubmissionOutcome::Accepted
        }
    }
}

pub fn classify_error(error: &reqwest::Error) -> DispatchFailure {
    if error.is_timeout() {
        DispatchFailure::Timeout
    } else if error.is_connect() {
        DispatchFailure::Connection {
            detail: error.to_string(),
        }
    } else {
        DispatchFailure::Other {
            detail: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_200_is_delivered_with_document_url() {
        let outcome = interpret(200, r#"{"status":"ok","document_url":"https://doc"}"#);
        assert!(outcome.is_success());
        assert_eq!(outcome.document_url(), Some("https://doc"));
        let SubmissionOutcome::Delivered(result) = outcome else {
            panic!("expected a delivered outcome");
        };
        assert_eq!(result.status, "ok");
        assert_eq!(result.message, None);
        assert_eq!(result.document_id, None);
    }

    #[test]
    fn test_failed_status_field_is_still_delivered() {
        let outcome = interpret(200, r#"{"status":"error","message":"bad script"}"#);
        let SubmissionOutcome::Delivered(result) = outcome else {
            panic!("expected a delivered outcome");
        };
        assert_eq!(result.status, "error");
        assert_eq!(result.message.as_deref(), Some("bad script"));
    }

    #[test]
    fn test_missing_status_defaults_to_unknown() {
        let SubmissionOutcome::Delivered(result) = interpret(200, r#"{"document_id": 42, "document_url": ""}"#)
        else {
            panic!("expected a delivered outcome");
        };
        assert_eq!(result.status, "Unknown");
        assert_eq!(result.document_id.as_deref(), Some("42"));
        assert_eq!(result.document_url, None);
    }

    #[test]
    fn test_non_json_200_is_accepted() {
        assert_eq!(interpret(200, "Workflow was started"), SubmissionOutcome::Accepted);
        assert_eq!(interpret(200, ""), SubmissionOutcome::Accepted);
        assert_eq!(interpret(200, "[1, 2]"), SubmissionOutcome::Accepted);
    }

    #[test]
    fn test_non_200_is_rejected_with_truncated_body() {
        let body = "x".repeat(500);
        let SubmissionOutcome::Failed(DispatchFailure::Rejected { status, body }) = interpret(500, &body)
        else {
            panic!("expected a rejected outcome");
        };
        assert_eq!(status, 500);
        assert_eq!(body.len(), BODY_PREVIEW_CHARS);
    }

    #[test]
    fn test_other_2xx_is_not_success() {
        assert!(!interpret(201, "{}").is_success());
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        let body = "স্ক্রিপ্ট".repeat(100);
        assert_eq!(preview(&body).chars().count(), BODY_PREVIEW_CHARS);
    }
}
