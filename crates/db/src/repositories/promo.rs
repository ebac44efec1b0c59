use crate::models::DbPromo;
use bookit_core::models::promo::{NewPromo, normalize_code};
use chrono::Utc;
use eyre::Result;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

pub async fn list_promos<'e, E>(executor: E) -> Result<Vec<DbPromo>>
where
    E: Executor<'e, Database = Postgres>,
{
    let promos = sqlx::query_as::<_, DbPromo>(
        r#"
        SELECT id, code, discount_type, discount_value, is_active, created_at
        FROM promos
        ORDER BY code ASC
        "#,
    )
    .fetch_all(executor)
    .await?;

    Ok(promos)
}

/// Looks up an active promo; `code` is normalized before matching.
pub async fn find_active_promo<'e, E>(executor: E, code: &str) -> Result<Option<DbPromo>>
where
    E: Executor<'e, Database = Postgres>,
{
    let code = normalize_code(code);

    let promo = sqlx::query_as::<_, DbPromo>(
        r#"
        SELECT id, code, discount_type, discount_value, is_active, created_at
        FROM promos
        WHERE code = $1 AND is_active = TRUE
        "#,
    )
    .bind(&code)
    .fetch_optional(executor)
    .await?;

    Ok(promo)
}

pub async fn create_promo<'e, E>(executor: E, promo: &NewPromo) -> Result<DbPromo>
where
    E: Executor<'e, Database = Postgres>,
{
    let id = Uuid::new_v4();
    let now = Utc::now();

    let created = sqlx::query_as::<_, DbPromo>(
        r#"
        INSERT INTO promos (id, code, discount_type, discount_value, is_active, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, code, discount_type, discount_value, is_active, created_at
        "#,
    )
    .bind(id)
    .bind(&promo.code)
    .bind(promo.discount_type.as_str())
    .bind(promo.discount_value)
    .bind(promo.is_active)
    .bind(now)
    .fetch_one(executor)
    .await?;

    Ok(created)
}
