//! Organization profile interpolated into letters and email footers.

use serde::{Deserialize, Serialize};

/// Contact details for the organization running the suite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrgProfile {
    /// Display name used in letters and email subjects.
    pub name: String,
    /// Public phone number.
    pub phone: String,
    /// Public contact email, also the default admin notification target.
    pub email: String,
    /// Street address printed on tax receipts.
    pub address: String,
    /// Public website, without scheme.
    pub website: String,
    /// Tax identification number printed on receipts.
    pub tax_id: String,
}

impl Default for OrgProfile {
    fn default() -> Self {
        Self {
            name: "Haven House Transitional Housing".to_string(),
            phone: "(310) 555-0180".to_string(),
            email: "info@havenhousing.org".to_string(),
            address: "742 Harbor Way, San Pedro, CA 90731".to_string(),
            website: "havenhousing.org".to_string(),
            tax_id: "XX-XXXXXXX".to_string(),
        }
    }
}

impl OrgProfile {
    /// Returns the admin notification address, preferring `ADMIN_EMAIL`.
    #[must_use]
    pub fn admin_email(&self) -> String {
        std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| self.email.clone())
    }

    /// One-line footer appended to plain-text emails.
    #[must_use]
    pub fn footer(&self) -> String {
        format!("{}\n{} | {}", self.name, self.phone, self.email)
    }
}
