use crate::models::DbExperience;
use bookit_core::models::experience::ExperienceUpdate;
use chrono::Utc;
use eyre::Result;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

/// Escapes LIKE metacharacters so user input only ever matches literally.
fn like_pattern(search: &str) -> String {
    let escaped = search
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

pub async fn list_experiences<'e, E>(executor: E, search: Option<&str>) -> Result<Vec<DbExperience>>
where
    E: Executor<'e, Database = Postgres>,
{
    let pattern = search.map(like_pattern);

    let experiences = sqlx::query_as::<_, DbExperience>(
        r#"
        SELECT id, title, tags, location, description, price, image_url, created_at
        FROM experiences
        WHERE $1::TEXT IS NULL
           OR title ILIKE $1
           OR location ILIKE $1
           OR EXISTS (SELECT 1 FROM unnest(tags) AS tag WHERE tag ILIKE $1)
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(pattern)
    .fetch_all(executor)
    .await?;

    Ok(experiences)
}

pub async fn get_experience_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<DbExperience>>
where
    E: Executor<'e, Database = Postgres>,
{
    tracing::debug!("Getting experience by id: {}", id);

    let experience = sqlx::query_as::<_, DbExperience>(
        r#"
        SELECT id, title, tags, location, description, price, image_url, created_at
        FROM experiences
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(experience)
}

#[allow(clippy::too_many_arguments)]
pub async fn create_experience<'e, E>(
    executor: E,
    title: &str,
    tags: &[String],
    location: &str,
    description: &str,
    price: i64,
    image_url: &str,
) -> Result<DbExperience>
where
    E: Executor<'e, Database = Postgres>,
{
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!("Creating experience: id={}, title={}", id, title);

    let experience = sqlx::query_as::<_, DbExperience>(
        r#"
        INSERT INTO experiences (id, title, tags, location, description, price, image_url, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, title, tags, location, description, price, image_url, created_at
        "#,
    )
    .bind(id)
    .bind(title)
    .bind(tags)
    .bind(location)
    .bind(description)
    .bind(price)
    .bind(image_url)
    .bind(now)
    .fetch_one(executor)
    .await?;

    Ok(experience)
}

pub async fn update_experience<'e, E>(
    executor: E,
    id: Uuid,
    update: &ExperienceUpdate,
) -> Result<Option<DbExperience>>
where
    E: Executor<'e, Database = Postgres>,
{
    let experience = sqlx::query_as::<_, DbExperience>(
        r#"
        UPDATE experiences
        SET title = COALESCE($2, title),
            tags = COALESCE($3::TEXT[], tags),
            location = COALESCE($4, location),
            description = COALESCE($5, description),
            price = COALESCE($6, price),
            image_url = COALESCE($7, image_url)
        WHERE id = $1
        RETURNING id, title, tags, location, description, price, image_url, created_at
        "#,
    )
    .bind(id)
    .bind(update.title.as_deref())
    .bind(update.tags.as_deref())
    .bind(update.location.as_deref())
    .bind(update.description.as_deref())
    .bind(update.price)
    .bind(update.image_url.as_deref())
    .fetch_optional(executor)
    .await?;

    Ok(experience)
}

pub async fn delete_experience<'e, E>(executor: E, id: Uuid) -> Result<bool>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        r#"
        DELETE FROM experiences
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn count_experiences<'e, E>(executor: E) -> Result<i64>
where
    E: Executor<'e, Database = Postgres>,
{
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM experiences")
        .fetch_one(executor)
        .await?;

    Ok(count)
}
