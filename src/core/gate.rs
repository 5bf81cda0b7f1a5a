/// Email allow-list check plus the single admin identity.
#[derive(Debug, Clone)]
pub struct CredentialGate {
    allowed_domain: String,
    admin_email: String,
}

impl CredentialGate {
    pub fn new(allowed_domain: impl Into<String>, admin_email: impl Into<String>) -> Self {
        Self {
            allowed_domain: allowed_domain.into().to_lowercase(),
            admin_email: admin_email.into().to_lowercase(),
        }
    }

    pub fn allowed_domain(&self) -> &str {
        &self.allowed_domain
    }

    /// Suffix match only, no address syntax check.
    pub fn is_allowed(&self, email: &str) -> bool {
        email.to_lowercase().ends_with(&self.allowed_domain)
    }

    pub fn is_admin(&self, email: &str) -> bool {
        email.to_lowercase() == self.admin_email
    }
}
