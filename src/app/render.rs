use crate::core::{PingReport, SubmissionOutcome};

/// Lines shown after a submit. Failure detail only appears with `debug`.
pub fn submission_lines(outcome: &SubmissionOutcome, title: &str, debug: bool) -> Vec<String> {
    let mut lines = Vec::new();

    match outcome {
        SubmissionOutcome::Delivered(result) => {
            lines.push("✅ Script submitted successfully!".to_string());
            if let Some(url) = &result.document_url {
                lines.push("---".to_string());
                lines.push("📄 Your Script Review Document".to_string());
                lines.push(format!("🚀 Open Google Doc → {}", url));
                lines.push("---".to_string());
            }
            lines.push(format!("Script: {}", title));
            lines.push(format!("Status: {}", result.status));
            if let Some(id) = &result.document_id {
                lines.push(format!("Document ID: {}", id));
            }
            if let Some(message) = &result.message {
                lines.push(format!("📝 {}", message));
            }
        }
        SubmissionOutcome::Accepted => {
            lines.push("✅ Script submitted successfully!".to_string());
            lines.push("Processing in background...".to_string());
        }
        SubmissionOutcome::Failed(failure) => {
            lines.push(failure.user_message().to_string());
            if debug {
                if let Some(detail) = failure.debug_detail() {
                    lines.push("Debug Info:".to_string());
                    lines.extend(detail.lines().map(str::to_string));
                }
            }
        }
    }

    lines
}

pub fn history_lines(emails: &[String]) -> Vec<String> {
    if emails.is_empty() {
        return vec!["No logins recorded yet.".to_string()];
    }

    let mut lines = vec!["Users who have logged in:".to_string()];
    lines.extend(
        emails
            .iter()
            .enumerate()
            .map(|(i, email)| format!("{:>3}  {}", i, email)),
    );
    lines
}

pub fn ping_lines(report: &PingReport) -> Vec<String> {
    vec![
        "Test Results:".to_string(),
        format!("- Status: {}", report.status),
        format!("- Response: {}...", report.body_preview),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DispatchFailure, SubmissionResult};

    #[test]
    fn test_delivered_shows_document_link() {
        let outcome = SubmissionOutcome::Delivered(SubmissionResult {
            status: "ok".to_string(),
            message: Some("Review queued".to_string()),
            document_url: Some("https://doc".to_string()),
            document_id: None,
        });

        let lines = submission_lines(&outcome, "Pilot", false);
        assert_eq!(lines[0], "✅ Script submitted successfully!");
        assert!(lines.contains(&"🚀 Open Google Doc → https://doc".to_string()));
        assert!(lines.contains(&"Script: Pilot".to_string()));
        assert!(lines.contains(&"Status: ok".to_string()));
        assert_eq!(lines.last().unwrap(), "📝 Review queued");
    }

    #[test]
    fn test_rejected_hides_detail_without_debug() {
        let outcome = SubmissionOutcome::Failed(DispatchFailure::Rejected {
            status: 500,
            body: "internal".to_string(),
        });

        let quiet = submission_lines(&outcome, "Pilot", false);
        assert_eq!(
            quiet,
            vec!["❌ Submission failed. Please try again or contact support."]
        );

        let verbose = submission_lines(&outcome, "Pilot", true);
        assert!(verbose.contains(&"Status: 500".to_string()));
        assert!(verbose.contains(&"Response: internal...".to_string()));
    }

    #[test]
    fn test_accepted_mentions_background_processing() {
        let lines = submission_lines(&SubmissionOutcome::Accepted, "Pilot", false);
        assert_eq!(lines[1], "Processing in background...");
    }

    #[test]
    fn test_history_lines() {
        assert_eq!(history_lines(&[]), vec!["No logins recorded yet."]);
        let lines = history_lines(&["a@hoichoi.tv".to_string()]);
        assert_eq!(lines, vec!["Users who have logged in:", "  0  a@hoichoi.tv"]);
    }
}
