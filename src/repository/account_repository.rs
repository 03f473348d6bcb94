use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{Account, AccountStatus, RegisterAccountRequest, Role},
    error::{AppError, Result},
    repository::AccountRepository,
};

#[derive(FromRow)]
pub(crate) struct AccountRow {
    pub(crate) id: String,
    pub(crate) email: String,
    pub(crate) display_name: String,
    pub(crate) role: String,
    pub(crate) status: String,
    pub(crate) person_id: String,
    pub(crate) created_at: NaiveDateTime,
    pub(crate) updated_at: NaiveDateTime,
}

pub(crate) fn row_to_account(row: AccountRow) -> Result<Account> {
    Ok(Account {
        id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
        email: row.email,
        display_name: row.display_name,
        role: parse_role(&row.role)?,
        status: parse_status(&row.status)?,
        person_id: Uuid::parse_str(&row.person_id).map_err(|e| AppError::Database(e.to_string()))?,
        created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
        updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
    })
}

pub(crate) fn parse_role(s: &str) -> Result<Role> {
    match s {
        "admin" => Ok(Role::Admin),
        "dean" => Ok(Role::Dean),
        "professor" => Ok(Role::Professor),
        "student" => Ok(Role::Student),
        "administration" => Ok(Role::Administration),
        _ => Err(AppError::Database(format!("Invalid role: {}", s))),
    }
}

pub(crate) fn role_to_str(role: &Role) -> &'static str {
    match role {
        Role::Admin => "admin",
        Role::Dean => "dean",
        Role::Professor => "professor",
        Role::Student => "student",
        Role::Administration => "administration",
    }
}

pub(crate) fn parse_status(s: &str) -> Result<AccountStatus> {
    match s {
        "active" => Ok(AccountStatus::Active),
        "pending" => Ok(AccountStatus::Pending),
        "suspended" => Ok(AccountStatus::Suspended),
        _ => Err(AppError::Database(format!("Invalid account status: {}", s))),
    }
}

fn status_to_str(status: &AccountStatus) -> &'static str {
    match status {
        AccountStatus::Active => "active",
        AccountStatus::Pending => "pending",
        AccountStatus::Suspended => "suspended",
    }
}

const ACCOUNT_COLUMNS: &str =
    "id, email, display_name, role, status, person_id, created_at, updated_at";

pub struct SqliteAccountRepository {
    pool: SqlitePool,
}

impl SqliteAccountRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for SqliteAccountRepository {
    async fn register(&self, request: RegisterAccountRequest) -> Result<Account> {
        if self.find_by_email(&request.email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        // Hash the password with argon2
        use argon2::password_hash::{rand_core::OsRng, SaltString};
        use argon2::{Argon2, PasswordHasher};

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let password_hash = argon2
            .hash_password(request.password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?
            .to_string();

        let person_id = Uuid::new_v4();
        let account_id = Uuid::new_v4();
        let now = Utc::now();
        let now_naive = now.naive_utc();
        let display_name = format!("{} {}", request.first_name, request.last_name);

        // Person and account land together or not at all.
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO persons (id, last_name, first_name, email, phone, city, address, birth_date, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, NULL, ?)
            "#
        )
        .bind(person_id.to_string())
        .bind(&request.last_name)
        .bind(&request.first_name)
        .bind(&request.email)
        .bind(&request.phone)
        .bind(&request.city)
        .bind(&request.address)
        .bind(now_naive)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO accounts (id, email, password_hash, display_name, role, status, person_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(account_id.to_string())
        .bind(&request.email)
        .bind(&password_hash)
        .bind(&display_name)
        .bind(role_to_str(&request.role))
        .bind(status_to_str(&AccountStatus::Pending))
        .bind(person_id.to_string())
        .bind(now_naive)
        .bind(now_naive)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        tx.commit().await?;

        self.find_by_id(account_id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created account".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>> {
        let id_str = id.to_string();
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {} FROM accounts WHERE id = ?",
            ACCOUNT_COLUMNS
        ))
        .bind(id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(row_to_account(r)?)),
            None => Ok(None),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {} FROM accounts WHERE email = ?",
            ACCOUNT_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(row_to_account(r)?)),
            None => Ok(None),
        }
    }

    async fn list_pending(&self) -> Result<Vec<Account>> {
        let rows = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {} FROM accounts WHERE status = 'pending' ORDER BY created_at",
            ACCOUNT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(row_to_account).collect()
    }

    async fn update_status(&self, id: Uuid, status: AccountStatus) -> Result<Account> {
        let id_str = id.to_string();
        let now_naive = Utc::now().naive_utc();

        let result = sqlx::query(
            "UPDATE accounts SET status = ?, updated_at = ? WHERE id = ?"
        )
        .bind(status_to_str(&status))
        .bind(now_naive)
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Account not found".to_string()));
        }

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated account".to_string())
        })
    }
}

/// Credential lookup for the login handler. Kept off the Account struct so
/// the hash never travels with ordinary reads.
pub async fn get_password_hash(pool: &SqlitePool, email: &str) -> Result<Option<String>> {
    let result = sqlx::query_scalar::<_, String>(
        "SELECT password_hash FROM accounts WHERE email = ?"
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(result)
}
