use sqlx::PgPool;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::modules::schools::model::{CreateSchoolDto, School, UpdateSchoolDto};
use crate::utils::errors::AppError;

const SCHOOL_COLUMNS: &str =
    "id, eiin, name, logo, email, number, address, package_validity, created_at, updated_at";

pub struct SchoolService;

impl SchoolService {
    #[instrument(skip(db, dto), fields(school.eiin = %dto.eiin, db.operation = "INSERT", db.table = "schools"))]
    pub async fn create_school(db: &PgPool, dto: CreateSchoolDto) -> Result<School, AppError> {
        debug!(school.name = %dto.name, "Creating new school");

        if Self::exists_by_eiin(db, &dto.eiin).await? {
            warn!(school.eiin = %dto.eiin, "Attempted to create school with existing EIIN");
            return Err(AppError::DuplicateKey(format!(
                "School with EIIN {} already exists",
                dto.eiin
            )));
        }

        let school = sqlx::query_as::<_, School>(&format!(
            "INSERT INTO schools (eiin, name, logo, email, number, address, package_validity)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {SCHOOL_COLUMNS}"
        ))
        .bind(&dto.eiin)
        .bind(&dto.name)
        .bind(&dto.logo)
        .bind(dto.email.as_deref().map(str::to_lowercase))
        .bind(&dto.number)
        .bind(&dto.address)
        .bind(dto.package_validity)
        .fetch_one(db)
        .await
        .map_err(|e| {
            // The existence pre-check can lose a race; the store reports the
            // violation late and it maps to the same error kind.
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                warn!(school.eiin = %dto.eiin, "EIIN uniqueness violation reported by the store");
                return AppError::DuplicateKey(format!(
                    "School with EIIN {} already exists",
                    dto.eiin
                ));
            }
            error!(error = %e, "Database error creating school");
            AppError::from(e)
        })?;

        info!(
            school.id = %school.id,
            school.eiin = %school.eiin,
            "School created successfully"
        );

        Ok(school)
    }

    #[instrument(skip(db), fields(school.id = %school_id, db.operation = "SELECT", db.table = "schools"))]
    pub async fn get_school_by_id(
        db: &PgPool,
        school_id: Uuid,
    ) -> Result<Option<School>, AppError> {
        let school = sqlx::query_as::<_, School>(&format!(
            "SELECT {SCHOOL_COLUMNS} FROM schools WHERE id = $1"
        ))
        .bind(school_id)
        .fetch_optional(db)
        .await?;

        Ok(school)
    }

    #[instrument(skip(db), fields(school.eiin = %eiin, db.operation = "SELECT", db.table = "schools"))]
    pub async fn find_school_by_eiin(db: &PgPool, eiin: &str) -> Result<Option<School>, AppError> {
        let school = sqlx::query_as::<_, School>(&format!(
            "SELECT {SCHOOL_COLUMNS} FROM schools WHERE eiin = $1"
        ))
        .bind(eiin)
        .fetch_optional(db)
        .await?;

        Ok(school)
    }

    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "schools"))]
    pub async fn get_all_schools(db: &PgPool) -> Result<Vec<School>, AppError> {
        let schools = sqlx::query_as::<_, School>(&format!(
            "SELECT {SCHOOL_COLUMNS} FROM schools ORDER BY created_at DESC"
        ))
        .fetch_all(db)
        .await?;

        debug!(returned = %schools.len(), "Schools fetched");

        Ok(schools)
    }

    #[instrument(skip(db, dto), fields(school.id = %school_id, db.operation = "UPDATE", db.table = "schools"))]
    pub async fn update_school(
        db: &PgPool,
        school_id: Uuid,
        dto: UpdateSchoolDto,
    ) -> Result<School, AppError> {
        debug!("Updating school");

        let current = Self::get_school_by_id(db, school_id)
            .await?
            .ok_or_else(|| AppError::NotFound("School not found".to_string()))?;

        let email = match dto.email {
            Some(e) => Some(e.to_lowercase()),
            None => current.email,
        };

        let school = sqlx::query_as::<_, School>(&format!(
            "UPDATE schools
             SET name = $1, logo = $2, email = $3, number = $4, address = $5,
                 package_validity = $6, updated_at = NOW()
             WHERE id = $7
             RETURNING {SCHOOL_COLUMNS}"
        ))
        .bind(dto.name.unwrap_or(current.name))
        .bind(dto.logo.or(current.logo))
        .bind(email)
        .bind(dto.number.or(current.number))
        .bind(dto.address.or(current.address))
        .bind(dto.package_validity.unwrap_or(current.package_validity))
        .bind(school_id)
        .fetch_one(db)
        .await?;

        info!(school.id = %school.id, "School updated successfully");

        Ok(school)
    }

    #[instrument(skip(db), fields(school.id = %school_id, db.operation = "DELETE", db.table = "schools"))]
    pub async fn delete_school(db: &PgPool, school_id: Uuid) -> Result<(), AppError> {
        debug!("Deleting school");

        let school = Self::get_school_by_id(db, school_id)
            .await?
            .ok_or_else(|| AppError::NotFound("School not found".to_string()))?;

        // Users referencing the school are deactivated rather than orphaned.
        let deactivated =
            sqlx::query("UPDATE users SET is_active = FALSE, updated_at = NOW() WHERE eiin = $1")
                .bind(&school.eiin)
                .execute(db)
                .await?
                .rows_affected();

        sqlx::query("DELETE FROM schools WHERE id = $1")
            .bind(school_id)
            .execute(db)
            .await?;

        info!(
            school.id = %school_id,
            school.eiin = %school.eiin,
            users_deactivated = %deactivated,
            "School deleted"
        );

        Ok(())
    }

    pub async fn exists_by_eiin(db: &PgPool, eiin: &str) -> Result<bool, AppError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM schools WHERE eiin = $1)")
                .bind(eiin)
                .fetch_one(db)
                .await?;

        Ok(exists)
    }
}
