use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{CompanyUser, CompanyUserWithName};

pub async fn create<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    user_id: Uuid,
    department: &str,
    phone: &str,
    email: &str,
) -> Result<CompanyUser, sqlx::Error> {
    sqlx::query_as::<_, CompanyUser>(
        "INSERT INTO company_users (user_id, department, phone, email)
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(user_id)
    .bind(department)
    .bind(phone)
    .bind(email)
    .fetch_one(executor)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<CompanyUser>, sqlx::Error> {
    sqlx::query_as::<_, CompanyUser>("SELECT * FROM company_users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_user_id(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<CompanyUser>, sqlx::Error> {
    sqlx::query_as::<_, CompanyUser>("SELECT * FROM company_users WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Fetch the profile for an account, provisioning a default one if the
/// account has none yet. Mirrors the profile auto-creation the web layer
/// relies on: every authenticated account must have a company profile.
pub async fn get_or_create(
    pool: &PgPool,
    user_id: Uuid,
    account_email: &str,
    company_domain: &str,
) -> Result<CompanyUser, sqlx::Error> {
    if let Some(profile) = find_by_user_id(pool, user_id).await? {
        return Ok(profile);
    }

    let local_part = account_email.split('@').next().unwrap_or("user");
    let company_email = format!("{local_part}@{company_domain}");

    // Another request may have provisioned concurrently; fall back to the
    // existing row on conflict.
    let inserted = sqlx::query_as::<_, CompanyUser>(
        "INSERT INTO company_users (user_id, department, phone, email)
         VALUES ($1, 'IT', '000-000-0000', $2)
         ON CONFLICT (user_id) DO NOTHING
         RETURNING *",
    )
    .bind(user_id)
    .bind(&company_email)
    .fetch_optional(pool)
    .await?;

    match inserted {
        Some(profile) => Ok(profile),
        None => find_by_user_id(pool, user_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound),
    }
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    department: &str,
    phone: &str,
    email: &str,
) -> Result<CompanyUser, sqlx::Error> {
    sqlx::query_as::<_, CompanyUser>(
        "UPDATE company_users SET department = $2, phone = $3, email = $4
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(department)
    .bind(phone)
    .bind(email)
    .fetch_one(pool)
    .await
}

/// Directory listing with account names, for assignment pickers.
pub async fn list_with_names(pool: &PgPool) -> Result<Vec<CompanyUserWithName>, sqlx::Error> {
    sqlx::query_as::<_, CompanyUserWithName>(
        "SELECT c.id, c.user_id, u.name, c.department, c.phone, c.email
         FROM company_users c
         JOIN users u ON u.id = c.user_id
         ORDER BY u.name",
    )
    .fetch_all(pool)
    .await
}

pub async fn display_name(pool: &PgPool, id: Uuid) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        "SELECT u.name FROM company_users c JOIN users u ON u.id = c.user_id WHERE c.id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}
