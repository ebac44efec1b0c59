use crate::models::DbBooking;
use bookit_core::models::booking::{Booking, BookingStatus};
use eyre::Result;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

pub async fn list_bookings<'e, E>(executor: E) -> Result<Vec<DbBooking>>
where
    E: Executor<'e, Database = Postgres>,
{
    let bookings = sqlx::query_as::<_, DbBooking>(
        r#"
        SELECT id, experience_id, experience_title, user_name, user_email, user_phone,
               selected_date, selected_time, number_of_guests, promo_code, discount,
               total_amount, booking_status, booking_date
        FROM bookings
        ORDER BY booking_date DESC
        "#,
    )
    .fetch_all(executor)
    .await?;

    Ok(bookings)
}

pub async fn get_booking_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<DbBooking>>
where
    E: Executor<'e, Database = Postgres>,
{
    let booking = sqlx::query_as::<_, DbBooking>(
        r#"
        SELECT id, experience_id, experience_title, user_name, user_email, user_phone,
               selected_date, selected_time, number_of_guests, promo_code, discount,
               total_amount, booking_status, booking_date
        FROM bookings
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(booking)
}

/// Same as [`get_booking_by_id`], but row-locks the booking for the rest of
/// the transaction.
pub async fn lock_booking_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<DbBooking>>
where
    E: Executor<'e, Database = Postgres>,
{
    let booking = sqlx::query_as::<_, DbBooking>(
        r#"
        SELECT id, experience_id, experience_title, user_name, user_email, user_phone,
               selected_date, selected_time, number_of_guests, promo_code, discount,
               total_amount, booking_status, booking_date
        FROM bookings
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(booking)
}

pub async fn has_confirmed_booking<'e, E>(
    executor: E,
    experience_id: Uuid,
    date: &str,
    time: &str,
) -> Result<bool>
where
    E: Executor<'e, Database = Postgres>,
{
    let exists = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1
            FROM bookings
            WHERE experience_id = $1
              AND selected_date = $2
              AND selected_time = $3
              AND booking_status = 'confirmed'
        )
        "#,
    )
    .bind(experience_id)
    .bind(date)
    .bind(time)
    .fetch_one(executor)
    .await?;

    Ok(exists)
}

pub async fn insert_booking<'e, E>(executor: E, booking: &Booking) -> Result<DbBooking>
where
    E: Executor<'e, Database = Postgres>,
{
    tracing::debug!(
        "Inserting booking: id={}, experience_id={}, slot={} {}",
        booking.id, booking.experience_id, booking.selected_date, booking.selected_time
    );

    let inserted = sqlx::query_as::<_, DbBooking>(
        r#"
        INSERT INTO bookings (
            id, experience_id, experience_title, user_name, user_email, user_phone,
            selected_date, selected_time, number_of_guests, promo_code, discount,
            total_amount, booking_status, booking_date
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        RETURNING id, experience_id, experience_title, user_name, user_email, user_phone,
                  selected_date, selected_time, number_of_guests, promo_code, discount,
                  total_amount, booking_status, booking_date
        "#,
    )
    .bind(booking.id)
    .bind(booking.experience_id)
    .bind(&booking.experience_title)
    .bind(&booking.user_name)
    .bind(&booking.user_email)
    .bind(&booking.user_phone)
    .bind(&booking.selected_date)
    .bind(&booking.selected_time)
    .bind(booking.number_of_guests)
    .bind(booking.promo_code.as_deref())
    .bind(booking.discount)
    .bind(booking.total_amount)
    .bind(booking.booking_status.as_str())
    .bind(booking.booking_date)
    .fetch_one(executor)
    .await?;

    Ok(inserted)
}

pub async fn set_booking_status<'e, E>(
    executor: E,
    id: Uuid,
    status: BookingStatus,
) -> Result<Option<DbBooking>>
where
    E: Executor<'e, Database = Postgres>,
{
    let booking = sqlx::query_as::<_, DbBooking>(
        r#"
        UPDATE bookings
        SET booking_status = $2
        WHERE id = $1
        RETURNING id, experience_id, experience_title, user_name, user_email, user_phone,
                  selected_date, selected_time, number_of_guests, promo_code, discount,
                  total_amount, booking_status, booking_date
        "#,
    )
    .bind(id)
    .bind(status.as_str())
    .fetch_optional(executor)
    .await?;

    Ok(booking)
}
