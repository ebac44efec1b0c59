use crate::models::DbSlot;
use eyre::Result;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

pub async fn get_slots_by_experience_id<'e, E>(executor: E, experience_id: Uuid) -> Result<Vec<DbSlot>>
where
    E: Executor<'e, Database = Postgres>,
{
    let slots = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, experience_id, slot_date, slot_time, available, max_participants
        FROM slots
        WHERE experience_id = $1
        ORDER BY slot_date ASC, slot_time ASC
        "#,
    )
    .bind(experience_id)
    .fetch_all(executor)
    .await?;

    Ok(slots)
}

pub async fn create_slot<'e, E>(
    executor: E,
    experience_id: Uuid,
    date: &str,
    time: &str,
    max_participants: i32,
) -> Result<DbSlot>
where
    E: Executor<'e, Database = Postgres>,
{
    let id = Uuid::new_v4();

    let slot = sqlx::query_as::<_, DbSlot>(
        r#"
        INSERT INTO slots (id, experience_id, slot_date, slot_time, available, max_participants)
        VALUES ($1, $2, $3, $4, TRUE, $5)
        RETURNING id, experience_id, slot_date, slot_time, available, max_participants
        "#,
    )
    .bind(id)
    .bind(experience_id)
    .bind(date)
    .bind(time)
    .bind(max_participants)
    .fetch_one(executor)
    .await?;

    Ok(slot)
}

pub async fn find_slot<'e, E>(
    executor: E,
    experience_id: Uuid,
    date: &str,
    time: &str,
) -> Result<Option<DbSlot>>
where
    E: Executor<'e, Database = Postgres>,
{
    let slot = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, experience_id, slot_date, slot_time, available, max_participants
        FROM slots
        WHERE experience_id = $1 AND slot_date = $2 AND slot_time = $3
        "#,
    )
    .bind(experience_id)
    .bind(date)
    .bind(time)
    .fetch_optional(executor)
    .await?;

    Ok(slot)
}

/// Flips a slot to unavailable only if it is currently available and can
/// seat `guests`. Returns `None` when nothing was claimed.
pub async fn claim_slot<'e, E>(
    executor: E,
    experience_id: Uuid,
    date: &str,
    time: &str,
    guests: i32,
) -> Result<Option<DbSlot>>
where
    E: Executor<'e, Database = Postgres>,
{
    let slot = sqlx::query_as::<_, DbSlot>(
        r#"
        UPDATE slots
        SET available = FALSE
        WHERE experience_id = $1
          AND slot_date = $2
          AND slot_time = $3
          AND available = TRUE
          AND max_participants >= $4
        RETURNING id, experience_id, slot_date, slot_time, available, max_participants
        "#,
    )
    .bind(experience_id)
    .bind(date)
    .bind(time)
    .bind(guests)
    .fetch_optional(executor)
    .await?;

    Ok(slot)
}

pub async fn set_slot_availability<'e, E>(
    executor: E,
    experience_id: Uuid,
    date: &str,
    time: &str,
    available: bool,
) -> Result<u64>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        r#"
        UPDATE slots
        SET available = $4
        WHERE experience_id = $1 AND slot_date = $2 AND slot_time = $3
        "#,
    )
    .bind(experience_id)
    .bind(date)
    .bind(time)
    .bind(available)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}
