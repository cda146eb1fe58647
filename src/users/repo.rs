use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;
use crate::users::password::hash_password;
use crate::users::repo_types::User;

impl User {
    /// Find a user by email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, photo, phone, bio, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Find a user by id.
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, photo, phone, bio, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a new user. The plain password is hashed here, at the store
    /// boundary, so no caller can persist one unhashed. Returns `None` when
    /// the insert reports no row without erroring.
    pub async fn create(
        db: &PgPool,
        name: &str,
        email: &str,
        password: &str,
        photo: Option<&str>,
    ) -> Result<Option<User>, ApiError> {
        let password_hash = hash_password(password)?;
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, photo)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_hash, photo, phone, bio, created_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(&password_hash)
        .bind(photo)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Partial profile update; `None` fields keep their current value.
    pub async fn update_profile(
        db: &PgPool,
        id: Uuid,
        name: Option<&str>,
        photo: Option<&str>,
        phone: Option<&str>,
        bio: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                photo = COALESCE($3, photo),
                phone = COALESCE($4, phone),
                bio = COALESCE($5, bio)
            WHERE id = $1
            RETURNING id, name, email, password_hash, photo, phone, bio, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(photo)
        .bind(phone)
        .bind(bio)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }
}
