use crate::core::endpoint::Endpoints;
use crate::domain::model::{PingReport, SubmissionOutcome, SubmissionRequest};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn allowed_domain(&self) -> &str;
    fn admin_email(&self) -> &str;
    fn endpoints(&self) -> Endpoints;
    fn request_timeout(&self) -> Duration;
    fn ping_timeout(&self) -> Duration;
    fn ledger_path(&self) -> &str;
}

/// Sends one request per call and never retries.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn submit(&self, endpoint: &str, request: &SubmissionRequest) -> SubmissionOutcome;
    async fn ping(&self, endpoint: &str) -> Result<PingReport>;
}
