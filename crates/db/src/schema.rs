use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create experiences table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS experiences (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            title VARCHAR(255) NOT NULL,
            tags TEXT[] NOT NULL DEFAULT '{}',
            location VARCHAR(255) NOT NULL,
            description TEXT NOT NULL,
            price BIGINT NOT NULL,
            image_url TEXT NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT non_negative_price CHECK (price >= 0)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Slots belong to their experience and go away with it
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS slots (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            experience_id UUID NOT NULL REFERENCES experiences(id) ON DELETE CASCADE,
            slot_date VARCHAR(10) NOT NULL,
            slot_time VARCHAR(5) NOT NULL,
            available BOOLEAN NOT NULL DEFAULT TRUE,
            max_participants INTEGER NOT NULL DEFAULT 1,
            CONSTRAINT unique_slot UNIQUE (experience_id, slot_date, slot_time),
            CONSTRAINT positive_capacity CHECK (max_participants > 0)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Bookings keep a plain experience_id: deleting an experience leaves them in place
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bookings (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            experience_id UUID NOT NULL,
            experience_title VARCHAR(255) NOT NULL,
            user_name VARCHAR(255) NOT NULL,
            user_email VARCHAR(255) NOT NULL,
            user_phone VARCHAR(64) NOT NULL,
            selected_date VARCHAR(10) NOT NULL,
            selected_time VARCHAR(5) NOT NULL,
            number_of_guests INTEGER NOT NULL,
            promo_code VARCHAR(64) NULL,
            discount BIGINT NOT NULL DEFAULT 0,
            total_amount BIGINT NOT NULL,
            booking_status VARCHAR(16) NOT NULL DEFAULT 'confirmed',
            booking_date TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_booking_status CHECK (booking_status IN ('confirmed', 'cancelled')),
            CONSTRAINT non_negative_total CHECK (total_amount >= 0)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create promos table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS promos (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            code VARCHAR(64) NOT NULL UNIQUE,
            discount_type VARCHAR(16) NOT NULL,
            discount_value BIGINT NOT NULL,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_discount_type CHECK (discount_type IN ('percentage', 'flat')),
            CONSTRAINT uppercase_code CHECK (code = UPPER(code))
        );
        "#,
    )
    .execute(pool)
    .await?;

    // At most one confirmed booking per slot
    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_bookings_confirmed_slot
        ON bookings(experience_id, selected_date, selected_time)
        WHERE booking_status = 'confirmed';
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_slots_experience_id ON slots(experience_id)",
        "CREATE INDEX IF NOT EXISTS idx_bookings_experience_id ON bookings(experience_id)",
        "CREATE INDEX IF NOT EXISTS idx_bookings_booking_date ON bookings(booking_date)",
        "CREATE INDEX IF NOT EXISTS idx_experiences_created_at ON experiences(created_at)",
    ];
    for statement in indexes {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
