//! PostgreSQL Repository Implementations
//!
//! Customer reads select profile columns only; OTP state belongs to the
//! OTP crate.

use kernel::id::AdminId;
use kernel::role::Role;
use platform::secret::SecretHash;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{admin::Admin, principal::Principal};
use crate::domain::repository::{AdminRepository, PrincipalRepository};
use crate::domain::value_object::login_id::LoginId;
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Admin Repository Implementation
// ============================================================================

impl AdminRepository for PgAuthRepository {
    async fn find_by_login_id(&self, login_id: &LoginId) -> AuthResult<Option<Admin>> {
        let row = sqlx::query_as::<_, AdminRow>(
            r#"
            SELECT
                admin_id,
                login_id,
                display_name,
                phone_number,
                admin_role,
                password_hash
            FROM admins
            WHERE login_id = $1
            "#,
        )
        .bind(login_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(AdminRow::into_admin).transpose()
    }

    async fn find_by_phone_number(&self, phone_number: &str) -> AuthResult<Option<Admin>> {
        let row = sqlx::query_as::<_, AdminRow>(
            r#"
            SELECT
                admin_id,
                login_id,
                display_name,
                phone_number,
                admin_role,
                password_hash
            FROM admins
            WHERE phone_number = $1
            "#,
        )
        .bind(phone_number)
        .fetch_optional(&self.pool)
        .await?;

        row.map(AdminRow::into_admin).transpose()
    }

    async fn update_password(&self, admin_id: &AdminId, hash: &SecretHash) -> AuthResult<bool> {
        let updated = sqlx::query(
            r#"
            UPDATE admins
            SET password_hash = $2,
                updated_at = now()
            WHERE admin_id = $1
            "#,
        )
        .bind(admin_id.as_uuid())
        .bind(hash.as_phc_string())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(updated == 1)
    }
}

// ============================================================================
// Principal Repository Implementation
// ============================================================================

impl PrincipalRepository for PgAuthRepository {
    async fn find_principal(&self, subject: Uuid, role: Role) -> AuthResult<Option<Principal>> {
        if role.is_staff() {
            let row = sqlx::query_as::<_, StaffPrincipalRow>(
                r#"
                SELECT admin_id, display_name, phone_number, admin_role
                FROM admins
                WHERE admin_id = $1
                "#,
            )
            .bind(subject)
            .fetch_optional(&self.pool)
            .await?;

            return row.map(StaffPrincipalRow::into_principal).transpose();
        }

        let row = sqlx::query_as::<_, CustomerPrincipalRow>(
            r#"
            SELECT customer_id, display_name, phone_number
            FROM customers
            WHERE customer_id = $1
            "#,
        )
        .bind(subject)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| Principal {
            id: r.customer_id,
            role: Role::Customer,
            display_name: r.display_name,
            phone_number: r.phone_number,
        }))
    }
}

// ============================================================================
// Internal row types for sqlx mapping
// ============================================================================

fn parse_staff_role(code: &str) -> AuthResult<Role> {
    Role::from_code(code)
        .filter(Role::is_staff)
        .ok_or_else(|| AuthError::Internal(format!("Invalid admin role: {code}")))
}

#[derive(sqlx::FromRow)]
struct AdminRow {
    admin_id: Uuid,
    login_id: String,
    display_name: String,
    phone_number: String,
    admin_role: String,
    password_hash: String,
}

impl AdminRow {
    fn into_admin(self) -> AuthResult<Admin> {
        Ok(Admin {
            admin_id: AdminId::from_uuid(self.admin_id),
            login_id: LoginId::from_db(self.login_id),
            display_name: self.display_name,
            phone_number: self.phone_number,
            role: parse_staff_role(&self.admin_role)?,
            password_hash: SecretHash::from_phc_string(self.password_hash)
                .map_err(|e| AuthError::Internal(e.to_string()))?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct StaffPrincipalRow {
    admin_id: Uuid,
    display_name: String,
    phone_number: String,
    admin_role: String,
}

impl StaffPrincipalRow {
    fn into_principal(self) -> AuthResult<Principal> {
        Ok(Principal {
            id: self.admin_id,
            role: parse_staff_role(&self.admin_role)?,
            display_name: Some(self.display_name),
            phone_number: self.phone_number,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CustomerPrincipalRow {
    customer_id: Uuid,
    display_name: Option<String>,
    phone_number: String,
}
