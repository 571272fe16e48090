use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::modules::schools::service::SchoolService;
use crate::modules::users::model::{
    CreateUserDto, SchoolInfo, UpdateUserDto, User, UserRole, UserWithSchool,
};
use crate::utils::errors::AppError;
use crate::utils::password::{hash_password, verify_password};

/// User read queries always join the referenced school's display fields
/// and never select the password column.
const USER_WITH_SCHOOL_SELECT: &str = "SELECT u.id, u.eiin, u.role, u.name, u.email, u.number, u.photo, u.is_active, u.created_at, u.updated_at, \
            s.name AS school_name, s.email AS school_email, s.number AS school_number, s.address AS school_address \
     FROM users u \
     LEFT JOIN schools s ON s.eiin = u.eiin";

#[derive(sqlx::FromRow)]
struct UserWithSchoolRow {
    id: Uuid,
    eiin: String,
    role: UserRole,
    name: String,
    email: String,
    number: Option<String>,
    photo: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    school_name: Option<String>,
    school_email: Option<String>,
    school_number: Option<String>,
    school_address: Option<String>,
}

impl From<UserWithSchoolRow> for UserWithSchool {
    fn from(row: UserWithSchoolRow) -> Self {
        let school = row.school_name.map(|name| SchoolInfo {
            name,
            email: row.school_email,
            number: row.school_number,
            address: row.school_address,
        });

        UserWithSchool {
            user: User {
                id: row.id,
                eiin: row.eiin,
                role: row.role,
                name: row.name,
                email: row.email,
                number: row.number,
                photo: row.photo,
                is_active: row.is_active,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            school,
        }
    }
}

/// Current stored state of a user, including the password digest. Private
/// to the update path; the digest never leaves this module.
#[derive(sqlx::FromRow)]
struct UserRecord {
    eiin: String,
    role: UserRole,
    name: String,
    email: String,
    number: Option<String>,
    password: String,
    photo: Option<String>,
    is_active: bool,
}

pub struct UserService;

impl UserService {
    #[instrument(skip(db, dto), fields(user.email = %dto.email, user.eiin = %dto.eiin, db.operation = "INSERT", db.table = "users"))]
    pub async fn create_user(db: &PgPool, dto: CreateUserDto) -> Result<UserWithSchool, AppError> {
        debug!(user.role = %dto.role, "Creating new user");

        // Check-then-act: the school could be deleted between this check and
        // the insert. The reference stays weak; see migrations/0002.
        if !SchoolService::exists_by_eiin(db, &dto.eiin).await? {
            warn!(user.eiin = %dto.eiin, "User references a nonexistent school");
            return Err(AppError::ReferenceNotFound(format!(
                "School with EIIN {} does not exist",
                dto.eiin
            )));
        }

        let email = dto.email.to_lowercase();

        if Self::exists_by_email(db, &email).await? {
            warn!("Attempted to create user with existing email");
            return Err(AppError::DuplicateKey(
                "User with this email already exists".to_string(),
            ));
        }

        let password_hash = hash_password(&dto.password)?;

        let user_id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO users (eiin, role, name, email, number, password, photo, is_active)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING id",
        )
        .bind(&dto.eiin)
        .bind(dto.role)
        .bind(&dto.name)
        .bind(&email)
        .bind(&dto.number)
        .bind(&password_hash)
        .bind(&dto.photo)
        .bind(dto.is_active)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                warn!("Email uniqueness violation reported by the store");
                return AppError::DuplicateKey(
                    "User with this email already exists".to_string(),
                );
            }
            error!(error = %e, "Database error creating user");
            AppError::from(e)
        })?;

        info!(user.id = %user_id, "User created successfully");

        Self::find_user_by_id(db, user_id).await?.ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!(
                "Created user {} missing on readback",
                user_id
            ))
        })
    }

    #[instrument(skip(db), fields(user.id = %user_id, db.operation = "SELECT", db.table = "users"))]
    pub async fn find_user_by_id(
        db: &PgPool,
        user_id: Uuid,
    ) -> Result<Option<UserWithSchool>, AppError> {
        let row = sqlx::query_as::<_, UserWithSchoolRow>(&format!(
            "{USER_WITH_SCHOOL_SELECT} WHERE u.id = $1"
        ))
        .bind(user_id)
        .fetch_optional(db)
        .await?;

        Ok(row.map(Into::into))
    }

    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "users"))]
    pub async fn find_user_by_email(
        db: &PgPool,
        email: &str,
    ) -> Result<Option<UserWithSchool>, AppError> {
        let row = sqlx::query_as::<_, UserWithSchoolRow>(&format!(
            "{USER_WITH_SCHOOL_SELECT} WHERE u.email = $1"
        ))
        .bind(email.to_lowercase())
        .fetch_optional(db)
        .await?;

        Ok(row.map(Into::into))
    }

    #[instrument(skip(db), fields(user.eiin = %eiin, db.operation = "SELECT", db.table = "users"))]
    pub async fn find_users_by_eiin(
        db: &PgPool,
        eiin: &str,
    ) -> Result<Vec<UserWithSchool>, AppError> {
        let rows = sqlx::query_as::<_, UserWithSchoolRow>(&format!(
            "{USER_WITH_SCHOOL_SELECT} WHERE u.eiin = $1 ORDER BY u.created_at DESC"
        ))
        .bind(eiin)
        .fetch_all(db)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(db), fields(user.role = %role, db.operation = "SELECT", db.table = "users"))]
    pub async fn find_users_by_role(
        db: &PgPool,
        role: UserRole,
    ) -> Result<Vec<UserWithSchool>, AppError> {
        let rows = sqlx::query_as::<_, UserWithSchoolRow>(&format!(
            "{USER_WITH_SCHOOL_SELECT} WHERE u.role = $1 ORDER BY u.created_at DESC"
        ))
        .bind(role)
        .fetch_all(db)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "users"))]
    pub async fn get_all_users(db: &PgPool) -> Result<Vec<UserWithSchool>, AppError> {
        let rows = sqlx::query_as::<_, UserWithSchoolRow>(&format!(
            "{USER_WITH_SCHOOL_SELECT} ORDER BY u.created_at DESC"
        ))
        .fetch_all(db)
        .await?;

        debug!(returned = %rows.len(), "Users fetched");

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(db, dto), fields(user.id = %user_id, db.operation = "UPDATE", db.table = "users"))]
    pub async fn update_user(
        db: &PgPool,
        user_id: Uuid,
        dto: UpdateUserDto,
    ) -> Result<UserWithSchool, AppError> {
        debug!("Updating user");

        let current = sqlx::query_as::<_, UserRecord>(
            "SELECT eiin, role, name, email, number, password, photo, is_active
             FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if let Some(eiin) = &dto.eiin
            && *eiin != current.eiin
            && !SchoolService::exists_by_eiin(db, eiin).await?
        {
            warn!(user.eiin = %eiin, "Update references a nonexistent school");
            return Err(AppError::ReferenceNotFound(format!(
                "School with EIIN {} does not exist",
                eiin
            )));
        }

        // Hash only when the supplied value differs from the stored digest,
        // so an unchanged password is never re-hashed.
        let password = match &dto.password {
            Some(plain) if !verify_password(plain, &current.password) => hash_password(plain)?,
            _ => current.password,
        };

        let email = match dto.email {
            Some(e) => e.to_lowercase(),
            None => current.email,
        };

        sqlx::query(
            "UPDATE users
             SET eiin = $1, role = $2, name = $3, email = $4, number = $5,
                 password = $6, photo = $7, is_active = $8, updated_at = NOW()
             WHERE id = $9",
        )
        .bind(dto.eiin.unwrap_or(current.eiin))
        .bind(dto.role.unwrap_or(current.role))
        .bind(dto.name.unwrap_or(current.name))
        .bind(&email)
        .bind(dto.number.or(current.number))
        .bind(&password)
        .bind(dto.photo.or(current.photo))
        .bind(dto.is_active.unwrap_or(current.is_active))
        .bind(user_id)
        .execute(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                warn!("Email uniqueness violation reported by the store");
                return AppError::DuplicateKey(
                    "User with this email already exists".to_string(),
                );
            }
            error!(error = %e, "Database error updating user");
            AppError::from(e)
        })?;

        info!(user.id = %user_id, "User updated successfully");

        Self::find_user_by_id(db, user_id).await?.ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!(
                "Updated user {} missing on readback",
                user_id
            ))
        })
    }

    /// Soft delete: flips `is_active` to false. Idempotent — a second call
    /// succeeds and leaves the user inactive.
    #[instrument(skip(db), fields(user.id = %user_id, db.operation = "UPDATE", db.table = "users"))]
    pub async fn deactivate_user(db: &PgPool, user_id: Uuid) -> Result<UserWithSchool, AppError> {
        let affected =
            sqlx::query("UPDATE users SET is_active = FALSE, updated_at = NOW() WHERE id = $1")
                .bind(user_id)
                .execute(db)
                .await?
                .rows_affected();

        if affected == 0 {
            debug!(user.id = %user_id, "User not found for deactivation");
            return Err(AppError::NotFound("User not found".to_string()));
        }

        info!(user.id = %user_id, "User deactivated");

        Self::find_user_by_id(db, user_id).await?.ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!(
                "Deactivated user {} missing on readback",
                user_id
            ))
        })
    }

    /// Hard delete: removes the record entirely. Terminal from either the
    /// active or inactive state.
    #[instrument(skip(db), fields(user.id = %user_id, db.operation = "DELETE", db.table = "users"))]
    pub async fn purge_user(db: &PgPool, user_id: Uuid) -> Result<(), AppError> {
        let affected = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(db)
            .await?
            .rows_affected();

        if affected == 0 {
            debug!(user.id = %user_id, "User not found for purge");
            return Err(AppError::NotFound("User not found".to_string()));
        }

        info!(user.id = %user_id, "User purged");

        Ok(())
    }

    /// Credential check against active users only.
    ///
    /// Returns `None` for an unknown email, an inactive account, or a wrong
    /// password — callers cannot distinguish the three.
    #[instrument(skip(db, password), fields(db.operation = "SELECT", db.table = "users"))]
    pub async fn authenticate(
        db: &PgPool,
        email: &str,
        password: &str,
    ) -> Result<Option<UserWithSchool>, AppError> {
        #[derive(sqlx::FromRow)]
        struct AuthRow {
            id: Uuid,
            password: String,
        }

        let row = sqlx::query_as::<_, AuthRow>(
            "SELECT id, password FROM users WHERE email = $1 AND is_active = TRUE",
        )
        .bind(email.to_lowercase())
        .fetch_optional(db)
        .await?;

        let Some(row) = row else {
            debug!("No active user for credentials");
            return Ok(None);
        };

        if !verify_password(password, &row.password) {
            debug!(user.id = %row.id, "Password mismatch");
            return Ok(None);
        }

        Self::find_user_by_id(db, row.id).await
    }

    pub async fn exists_by_email(db: &PgPool, email: &str) -> Result<bool, AppError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email)
                .fetch_one(db)
                .await?;

        Ok(exists)
    }
}
