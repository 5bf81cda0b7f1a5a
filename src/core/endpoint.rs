use crate::domain::model::Environment;

pub const DEFAULT_PRODUCTION_URL: &str = "https://hoichoi.app.n8n.cloud/webhook/scriptchecker";
pub const DEFAULT_TEST_URL: &str = "https://hoichoi.app.n8n.cloud/webhook-test/scriptchecker";

/// The two webhook URLs a submission can go to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub production: String,
    pub test: String,
}

impl Endpoints {
    pub fn new(production: impl Into<String>, test: impl Into<String>) -> Self {
        Self {
            production: production.into(),
            test: test.into(),
        }
    }

    pub fn resolve(&self, environment: Environment) -> &str {
        match environment {
            Environment::Production => &self.production,
            Environment::Test => &self.test,
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(DEFAULT_PRODUCTION_URL, DEFAULT_TEST_URL)
    }
}
