use crate::core::encoding::{self, mime_type_for_extension, ALLOWED_EXTENSIONS};
use crate::core::endpoint::Endpoints;
use crate::core::gate::CredentialGate;
use crate::core::ledger::LoginLedger;
use crate::core::{
    ConfigProvider, Dispatcher, Encoding, Environment, PingReport, Session, Storage,
    SubmissionOutcome, SubmissionRequest,
};
use crate::utils::error::{CheckerError, Result};
use crate::utils::validation::validate_file_extension;
use std::path::PathBuf;

const MISSING_FIELDS_MESSAGE: &str =
    "⚠️ Please provide a script title and upload your script file.";

/// What the upload form holds when the user presses submit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadForm {
    pub title: String,
    pub file: Option<PathBuf>,
    pub environment: Environment,
    pub encoding: Encoding,
}

/// Ties the gate, the ledger and the dispatcher to a caller-owned `Session`.
pub struct ScriptChecker<S: Storage, D: Dispatcher> {
    gate: CredentialGate,
    ledger: LoginLedger<S>,
    endpoints: Endpoints,
    dispatcher: D,
}

impl<S: Storage, D: Dispatcher> ScriptChecker<S, D> {
    pub fn new<C: ConfigProvider>(config: &C, storage: S, dispatcher: D) -> Self {
        Self {
            gate: CredentialGate::new(config.allowed_domain(), config.admin_email()),
            ledger: LoginLedger::new(storage, config.ledger_path()),
            endpoints: config.endpoints(),
            dispatcher,
        }
    }

    pub fn gate(&self) -> &CredentialGate {
        &self.gate
    }

    /// A ledger failure is logged but does not block the login.
    pub async fn login(&self, session: &mut Session, email: &str) -> Result<()> {
        if !self.gate.is_allowed(email) {
            tracing::info!("🔐 Rejected login outside {}", self.gate.allowed_domain());
            tracing::debug!("Rejected email: {}", email);
            return Err(CheckerError::Unauthorized {
                email: email.to_string(),
                domain: self.gate.allowed_domain().to_string(),
            });
        }

        match self.ledger.record(email).await {
            Ok(true) => tracing::debug!("First login recorded for {}", email),
            Ok(false) => {}
            Err(e) => tracing::warn!(
                "⚠️ Could not record login in {}: {}",
                self.ledger.path(),
                e
            ),
        }

        session.authenticated_email = Some(email.to_string());
        tracing::info!("🔐 Login accepted");
        Ok(())
    }

    pub fn logout(&self, session: &mut Session) {
        if session.authenticated_email.take().is_some() {
            tracing::info!("👋 Logged out");
        }
    }

    pub fn is_admin(&self, session: &Session) -> bool {
        session
            .authenticated_email
            .as_deref()
            .is_some_and(|email| self.gate.is_admin(email))
    }

    pub async fn login_history(&self, session: &Session) -> Result<Vec<String>> {
        let email = session
            .authenticated_email
            .as_deref()
            .ok_or(CheckerError::NotLoggedIn)?;

        if !self.gate.is_admin(email) {
            return Err(CheckerError::Forbidden {
                email: email.to_string(),
            });
        }

        self.ledger.entries().await
    }

    /// Validates the form and reads the file into a request.
    pub async fn prepare(&self, session: &Session, form: &UploadForm) -> Result<SubmissionRequest> {
        let user_email = session
            .authenticated_email
            .clone()
            .ok_or(CheckerError::NotLoggedIn)?;

        let path = match &form.file {
            Some(path) if !form.title.trim().is_empty() => path,
            _ => {
                return Err(CheckerError::ValidationError {
                    message: MISSING_FIELDS_MESSAGE.to_string(),
                })
            }
        };

        let extension = validate_file_extension("file", path, ALLOWED_EXTENSIONS).map_err(|e| {
            CheckerError::ValidationError {
                message: format!("⚠️ {}", e),
            }
        })?;

        let file_bytes = tokio::fs::read(path).await.map_err(|e| CheckerError::ValidationError {
            message: format!("⚠️ Couldn't read {}: {}", path.display(), e),
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(SubmissionRequest {
            project_title: form.title.clone(),
            environment: form.environment,
            encoding: form.encoding,
            file_name,
            file_bytes,
            mime_type: mime_type_for_extension(&extension).to_string(),
            user_email,
        })
    }

    pub async fn submit(&self, session: &Session, form: &UploadForm) -> Result<SubmissionOutcome> {
        let request = self.prepare(session, form).await?;
        let endpoint = self.endpoints.resolve(request.environment);
        Ok(self.dispatcher.submit(endpoint, &request).await)
    }

    pub async fn payload_preview(&self, session: &Session, form: &UploadForm) -> Result<String> {
        let request = self.prepare(session, form).await?;
        Ok(encoding::describe(&request))
    }

    pub async fn ping(&self, environment: Environment) -> Result<PingReport> {
        self.dispatcher
            .ping(self.endpoints.resolve(environment))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::endpoint::Endpoints;
    use crate::core::{DispatchFailure, SubmissionResult};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex as StdMutex};
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
        fail_writes: bool,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
                fail_writes: false,
            }
        }

        fn failing() -> Self {
            Self {
                fail_writes: true,
                ..Self::new()
            }
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                CheckerError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            if self.fail_writes {
                return Err(CheckerError::IoError(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "read-only",
                )));
            }
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    /// Records what it was asked to send and answers with a fixed outcome.
    #[derive(Clone)]
    struct MockDispatcher {
        sent: Arc<StdMutex<Vec<(String, SubmissionRequest)>>>,
        outcome: SubmissionOutcome,
    }

    impl MockDispatcher {
        fn new(outcome: SubmissionOutcome) -> Self {
            Self {
                sent: Arc::new(StdMutex::new(Vec::new())),
                outcome,
            }
        }
    }

    #[async_trait]
    impl Dispatcher for MockDispatcher {
        async fn submit(&self, endpoint: &str, request: &SubmissionRequest) -> SubmissionOutcome {
            self.sent
                .lock()
                .unwrap()
                .push((endpoint.to_string(), request.clone()));
            self.outcome.clone()
        }

        async fn ping(&self, _endpoint: &str) -> Result<PingReport> {
            Ok(PingReport {
                status: 200,
                body_preview: "pong".to_string(),
            })
        }
    }

    struct MockConfig;

    impl ConfigProvider for MockConfig {
        fn allowed_domain(&self) -> &str {
            "@hoichoi.tv"
        }

        fn admin_email(&self) -> &str {
            "admin@hoichoi.tv"
        }

        fn endpoints(&self) -> Endpoints {
            Endpoints::new("http://prod.test/hook", "http://test.test/hook")
        }

        fn request_timeout(&self) -> Duration {
            Duration::from_secs(1)
        }

        fn ping_timeout(&self) -> Duration {
            Duration::from_secs(1)
        }

        fn ledger_path(&self) -> &str {
            "storage.json"
        }
    }

    fn delivered() -> SubmissionOutcome {
        SubmissionOutcome::Delivered(SubmissionResult {
            status: "ok".to_string(),
            message: None,
            document_url: Some("https://doc".to_string()),
            document_id: None,
        })
    }

    fn checker(storage: MockStorage, dispatcher: MockDispatcher) -> ScriptChecker<MockStorage, MockDispatcher> {
        ScriptChecker::new(&MockConfig, storage, dispatcher)
    }

    fn script_file(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, b"%PDF-1.4 tiny").unwrap();
        path
    }

    #[tokio::test]
    async fn test_login_rejects_outside_domain() {
        let checker = checker(MockStorage::new(), MockDispatcher::new(delivered()));
        let mut session = Session::new();

        let err = checker.login(&mut session, "writer@gmail.com").await.unwrap_err();
        assert!(matches!(err, CheckerError::Unauthorized { .. }));
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_records_and_authenticates() {
        let checker = checker(MockStorage::new(), MockDispatcher::new(delivered()));
        let mut session = Session::new();

        checker.login(&mut session, "Writer@Hoichoi.tv").await.unwrap();
        assert_eq!(session.authenticated_email.as_deref(), Some("Writer@Hoichoi.tv"));

        let mut admin = Session::new();
        checker.login(&mut admin, "admin@hoichoi.tv").await.unwrap();
        assert_eq!(
            checker.login_history(&admin).await.unwrap(),
            vec!["writer@hoichoi.tv", "admin@hoichoi.tv"]
        );
    }

    #[tokio::test]
    async fn test_login_survives_ledger_failure() {
        let checker = checker(MockStorage::failing(), MockDispatcher::new(delivered()));
        let mut session = Session::new();

        checker.login(&mut session, "writer@hoichoi.tv").await.unwrap();
        assert!(session.is_authenticated());
    }

    #[tokio::test]
    async fn test_history_is_admin_only() {
        let checker = checker(MockStorage::new(), MockDispatcher::new(delivered()));
        let mut session = Session::new();

        assert!(matches!(
            checker.login_history(&session).await,
            Err(CheckerError::NotLoggedIn)
        ));

        checker.login(&mut session, "writer@hoichoi.tv").await.unwrap();
        assert!(!checker.is_admin(&session));
        assert!(matches!(
            checker.login_history(&session).await,
            Err(CheckerError::Forbidden { .. })
        ));

        checker.logout(&mut session);
        checker.login(&mut session, "ADMIN@hoichoi.tv").await.unwrap();
        assert!(checker.is_admin(&session));
    }

    #[tokio::test]
    async fn test_submit_requires_login() {
        let checker = checker(MockStorage::new(), MockDispatcher::new(delivered()));
        let err = checker
            .submit(&Session::new(), &UploadForm::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CheckerError::NotLoggedIn));
    }

    #[tokio::test]
    async fn test_submit_requires_title_and_file() {
        let dir = TempDir::new().unwrap();
        let checker = checker(MockStorage::new(), MockDispatcher::new(delivered()));
        let mut session = Session::new();
        checker.login(&mut session, "writer@hoichoi.tv").await.unwrap();

        let no_file = UploadForm {
            title: "Pilot".to_string(),
            ..UploadForm::default()
        };
        let blank_title = UploadForm {
            title: "   ".to_string(),
            file: Some(script_file(&dir, "pilot.pdf")),
            ..UploadForm::default()
        };

        for form in [no_file, blank_title] {
            match checker.submit(&session, &form).await {
                Err(CheckerError::ValidationError { message }) => {
                    assert_eq!(message, MISSING_FIELDS_MESSAGE)
                }
                other => panic!("expected a validation error, got {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_submit_rejects_unsupported_file_type() {
        let dir = TempDir::new().unwrap();
        let checker = checker(MockStorage::new(), MockDispatcher::new(delivered()));
        let mut session = Session::new();
        checker.login(&mut session, "writer@hoichoi.tv").await.unwrap();

        let form = UploadForm {
            title: "Pilot".to_string(),
            file: Some(script_file(&dir, "pilot.txt")),
            ..UploadForm::default()
        };
        assert!(matches!(
            checker.submit(&session, &form).await,
            Err(CheckerError::ValidationError { .. })
        ));
    }

    #[tokio::test]
    async fn test_submit_routes_by_environment() {
        let dir = TempDir::new().unwrap();
        let dispatcher = MockDispatcher::new(delivered());
        let checker = checker(MockStorage::new(), dispatcher.clone());
        let mut session = Session::new();
        checker.login(&mut session, "writer@hoichoi.tv").await.unwrap();

        let form = UploadForm {
            title: "Pilot".to_string(),
            file: Some(script_file(&dir, "pilot.PDF")),
            environment: Environment::Test,
            encoding: Encoding::RawBinary,
        };
        let outcome = checker.submit(&session, &form).await.unwrap();
        assert_eq!(outcome.document_url(), Some("https://doc"));

        let sent = dispatcher.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let (endpoint, request) = &sent[0];
        assert_eq!(endpoint, "http://test.test/hook");
        assert_eq!(request.file_name, "pilot.PDF");
        assert_eq!(request.mime_type, "application/pdf");
        assert_eq!(request.user_email, "writer@hoichoi.tv");
        assert_eq!(request.encoding, Encoding::RawBinary);
        assert_eq!(request.file_bytes, b"%PDF-1.4 tiny");
    }

    #[tokio::test]
    async fn test_failed_outcome_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let failure = SubmissionOutcome::Failed(DispatchFailure::Timeout);
        let checker = checker(MockStorage::new(), MockDispatcher::new(failure.clone()));
        let mut session = Session::new();
        checker.login(&mut session, "writer@hoichoi.tv").await.unwrap();

        let form = UploadForm {
            title: "Pilot".to_string(),
            file: Some(script_file(&dir, "pilot.docx")),
            ..UploadForm::default()
        };
        assert_eq!(checker.submit(&session, &form).await.unwrap(), failure);
    }

    #[tokio::test]
    async fn test_payload_preview_uses_selected_encoding() {
        let dir = TempDir::new().unwrap();
        let checker = checker(MockStorage::new(), MockDispatcher::new(delivered()));
        let mut session = Session::new();
        checker.login(&mut session, "writer@hoichoi.tv").await.unwrap();

        let form = UploadForm {
            title: "Pilot".to_string(),
            file: Some(script_file(&dir, "pilot.pdf")),
            encoding: Encoding::JsonBase64,
            ..UploadForm::default()
        };
        let preview = checker.payload_preview(&session, &form).await.unwrap();
        assert!(preview.starts_with("# JSON body"));
    }
}
