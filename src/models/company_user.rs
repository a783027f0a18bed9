use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct CompanyUser {
    pub id: Uuid,
    pub user_id: Uuid,
    pub department: String,
    pub phone: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Company profiles carry an address on the organizational domain, distinct
/// from the account login email.
pub fn validate_company_email(email: &str, domain: &str) -> Result<(), String> {
    let suffix = format!("@{domain}");
    if email.len() > suffix.len() && email.ends_with(&suffix) {
        Ok(())
    } else {
        Err(format!("Only {suffix} email addresses are allowed"))
    }
}

/// Directory entry: profile joined with the account name, for assignment
/// pickers and report breakdowns.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct CompanyUserWithName {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub department: String,
    pub phone: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::validate_company_email;

    #[test]
    fn accepts_domain_addresses() {
        assert!(validate_company_email("ana@example.com", "example.com").is_ok());
    }

    #[test]
    fn rejects_foreign_domains() {
        assert!(validate_company_email("ana@gmail.com", "example.com").is_err());
        assert!(validate_company_email("ana@example.com.evil.io", "example.com").is_err());
    }

    #[test]
    fn rejects_bare_domain() {
        assert!(validate_company_email("@example.com", "example.com").is_err());
    }
}
