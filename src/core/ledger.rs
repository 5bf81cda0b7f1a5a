use crate::core::Storage;
use crate::utils::error::{CheckerError, Result};
use tokio::sync::Mutex;

/// Deduplicated, first-seen-ordered list of emails that have logged in.
///
/// The whole list lives in one JSON file that is read and rewritten on every
/// new login. Writers inside this process are serialized; separate processes
/// sharing the file can still lose each other's updates.
pub struct LoginLedger<S: Storage> {
    storage: S,
    path: String,
    write_lock: Mutex<()>,
}

impl<S: Storage> LoginLedger<S> {
    pub fn new(storage: S, path: impl Into<String>) -> Self {
        Self {
            storage,
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Adds `email` (lowercased) unless already present. Returns true when
    /// the file was changed.
    ///
    /// A file that doesn't decode as a list of strings is discarded and
    /// replaced.
    pub async fn record(&self, email: &str) -> Result<bool> {
        let email = email.to_lowercase();
        let _guard = self.write_lock.lock().await;

        let mut emails = match self.load().await? {
            Some(bytes) => match serde_json::from_slice::<Vec<String>>(&bytes) {
                Ok(emails) => emails,
                Err(e) => {
                    tracing::warn!(
                        "⚠️ Login ledger {} is malformed, starting a new one: {}",
                        self.path,
                        e
                    );
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        if emails.contains(&email) {
            tracing::debug!("{} already in login ledger", email);
            return Ok(false);
        }

        emails.push(email);
        let json = serde_json::to_string_pretty(&emails)?;
        self.storage.write_file(&self.path, json.as_bytes()).await?;
        tracing::debug!("Login ledger now holds {} emails", emails.len());
        Ok(true)
    }

    /// Stored emails in first-seen order. Unlike `record`, a malformed file
    /// is reported instead of being treated as empty.
    pub async fn entries(&self) -> Result<Vec<String>> {
        match self.load().await? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(Vec::new()),
        }
    }

    async fn load(&self) -> Result<Option<Vec<u8>>> {
        match self.storage.read_file(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(CheckerError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}
