use crate::adapters::http::{DEFAULT_PING_TIMEOUT, DEFAULT_REQUEST_TIMEOUT};
use crate::core::endpoint::{Endpoints, DEFAULT_PRODUCTION_URL, DEFAULT_TEST_URL};
use crate::core::ConfigProvider;
use crate::utils::error::{CheckerError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

pub const DEFAULT_ALLOWED_DOMAIN: &str = "@hoichoi.tv";
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@hoichoi.tv";
pub const DEFAULT_LEDGER_PATH: &str = "storage.json";

const MAX_TIMEOUT_SECONDS: u64 = 600;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    pub auth: AuthConfig,
    pub webhook: WebhookConfig,
    pub ledger: LedgerConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub allowed_domain: String,
    pub admin_email: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            allowed_domain: DEFAULT_ALLOWED_DOMAIN.to_string(),
            admin_email: DEFAULT_ADMIN_EMAIL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    pub production_url: String,
    pub test_url: String,
    pub timeout_seconds: u64,
    pub ping_timeout_seconds: u64,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            production_url: DEFAULT_PRODUCTION_URL.to_string(),
            test_url: DEFAULT_TEST_URL.to_string(),
            timeout_seconds: DEFAULT_REQUEST_TIMEOUT.as_secs(),
            ping_timeout_seconds: DEFAULT_PING_TIMEOUT.as_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub path: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_LEDGER_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

impl CheckerConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CheckerError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| CheckerError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the variable's value; unknown variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        let re = PATTERN.get_or_init(|| {
            Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid env var pattern")
        });

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }
}

impl Validate for CheckerConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("auth.allowed_domain", &self.auth.allowed_domain)?;
        validation::validate_non_empty_string("auth.admin_email", &self.auth.admin_email)?;
        validation::validate_url("webhook.production_url", &self.webhook.production_url)?;
        validation::validate_url("webhook.test_url", &self.webhook.test_url)?;
        validation::validate_range(
            "webhook.timeout_seconds",
            self.webhook.timeout_seconds,
            1,
            MAX_TIMEOUT_SECONDS,
        )?;
        validation::validate_range(
            "webhook.ping_timeout_seconds",
            self.webhook.ping_timeout_seconds,
            1,
            MAX_TIMEOUT_SECONDS,
        )?;
        validation::validate_path("ledger.path", &self.ledger.path)?;
        Ok(())
    }
}

impl ConfigProvider for CheckerConfig {
    fn allowed_domain(&self) -> &str {
        &self.auth.allowed_domain
    }

    fn admin_email(&self) -> &str {
        &self.auth.admin_email
    }

    fn endpoints(&self) -> Endpoints {
        Endpoints::new(&self.webhook.production_url, &self.webhook.test_url)
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.webhook.timeout_seconds)
    }

    fn ping_timeout(&self) -> Duration {
        Duration::from_secs(self.webhook.ping_timeout_seconds)
    }

    fn ledger_path(&self) -> &str {
        &self.ledger.path
    }
}
