use async_trait::async_trait;
use bookit_core::{
    errors::{BookitError, BookitResult},
    models::{
        booking::{Booking, BookingStatus, NewBooking},
        experience::{Experience, ExperienceSummary, ExperienceUpdate, NewExperience, NewSlot, Slot},
        promo::{NewPromo, Promo},
    },
    pricing,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    DbPool,
    repositories::{booking, experience, promo, slot},
    store::{self, Store},
};

fn db_error(err: sqlx::Error) -> BookitError {
    BookitError::Database(err.into())
}

/// Maps a unique-constraint violation to `conflict`, anything else to a
/// database error.
fn unique_violation_or(err: eyre::Report, conflict: BookitError) -> BookitError {
    let is_unique = err
        .downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .is_some_and(|e| e.is_unique_violation());

    if is_unique { conflict } else { BookitError::Database(err) }
}

/// PostgreSQL-backed [`Store`].
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn load_experience(&self, id: Uuid) -> BookitResult<Option<Experience>> {
        let Some(db_experience) = experience::get_experience_by_id(&self.pool, id).await? else {
            return Ok(None);
        };
        let slots = slot::get_slots_by_experience_id(&self.pool, id).await?;

        Ok(Some(db_experience.with_slots(slots)))
    }
}

#[async_trait]
impl Store for PgStore {
    async fn list_experiences(&self, search: Option<String>) -> BookitResult<Vec<ExperienceSummary>> {
        let experiences = experience::list_experiences(&self.pool, search.as_deref()).await?;
        Ok(experiences.into_iter().map(ExperienceSummary::from).collect())
    }

    async fn get_experience(&self, id: Uuid) -> BookitResult<Option<Experience>> {
        self.load_experience(id).await
    }

    async fn create_experience(&self, new_experience: NewExperience) -> BookitResult<Experience> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let created = experience::create_experience(
            &mut *tx,
            &new_experience.title,
            &new_experience.tags,
            &new_experience.location,
            &new_experience.description,
            new_experience.price,
            &new_experience.image_url,
        )
        .await?;

        for new_slot in &new_experience.slots {
            slot::create_slot(
                &mut *tx,
                created.id,
                &new_slot.date,
                &new_slot.time,
                new_slot.max_participants,
            )
            .await
            .map_err(|e| unique_violation_or(e, store::slot_exists(&new_slot.date, &new_slot.time)))?;
        }

        let slots = slot::get_slots_by_experience_id(&mut *tx, created.id).await?;
        tx.commit().await.map_err(db_error)?;

        info!("Experience {} created: {}", created.id, created.title);
        Ok(created.with_slots(slots))
    }

    async fn update_experience(
        &self,
        id: Uuid,
        update: ExperienceUpdate,
    ) -> BookitResult<Option<Experience>> {
        if experience::update_experience(&self.pool, id, &update)
            .await?
            .is_none()
        {
            return Ok(None);
        }

        self.load_experience(id).await
    }

    async fn delete_experience(&self, id: Uuid) -> BookitResult<bool> {
        let deleted = experience::delete_experience(&self.pool, id).await?;
        if deleted {
            info!("Experience {} deleted", id);
        }
        Ok(deleted)
    }

    async fn add_slots(&self, experience_id: Uuid, slots: Vec<NewSlot>) -> BookitResult<Experience> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let db_experience = experience::get_experience_by_id(&mut *tx, experience_id)
            .await?
            .ok_or_else(store::experience_not_found)?;

        for new_slot in &slots {
            slot::create_slot(
                &mut *tx,
                experience_id,
                &new_slot.date,
                &new_slot.time,
                new_slot.max_participants,
            )
            .await
            .map_err(|e| unique_violation_or(e, store::slot_exists(&new_slot.date, &new_slot.time)))?;
        }

        let all_slots = slot::get_slots_by_experience_id(&mut *tx, experience_id).await?;
        tx.commit().await.map_err(db_error)?;

        Ok(db_experience.with_slots(all_slots))
    }

    async fn count_experiences(&self) -> BookitResult<i64> {
        Ok(experience::count_experiences(&self.pool).await?)
    }

    async fn list_bookings(&self) -> BookitResult<Vec<Booking>> {
        booking::list_bookings(&self.pool)
            .await?
            .into_iter()
            .map(Booking::try_from)
            .collect()
    }

    async fn get_booking(&self, id: Uuid) -> BookitResult<Option<Booking>> {
        booking::get_booking_by_id(&self.pool, id)
            .await?
            .map(Booking::try_from)
            .transpose()
    }

    async fn create_booking(&self, request: NewBooking) -> BookitResult<Booking> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let db_experience = experience::get_experience_by_id(&mut *tx, request.experience_id)
            .await?
            .ok_or_else(store::experience_not_found)?;

        let claimed = slot::claim_slot(
            &mut *tx,
            request.experience_id,
            &request.selected_date,
            &request.selected_time,
            request.number_of_guests,
        )
        .await?;

        if claimed.is_none() {
            // Nothing was written; work out why so the caller gets the right error.
            let existing = slot::find_slot(
                &mut *tx,
                request.experience_id,
                &request.selected_date,
                &request.selected_time,
            )
            .await?
            .map(Slot::from);

            return Err(match existing {
                None => store::slot_not_found(),
                Some(s) if !s.available => store::slot_unavailable(),
                Some(s) => store::over_capacity(&s, request.number_of_guests),
            });
        }

        let already_booked = booking::has_confirmed_booking(
            &mut *tx,
            request.experience_id,
            &request.selected_date,
            &request.selected_time,
        )
        .await?;
        if already_booked {
            warn!(
                "Slot {} {} of experience {} had a confirmed booking while marked available",
                request.selected_date, request.selected_time, request.experience_id
            );
            // Keep the claim: the slot really is taken.
            tx.commit().await.map_err(db_error)?;
            return Err(store::slot_already_booked());
        }

        let promo = match request.promo_code.as_deref() {
            Some(code) => promo::find_active_promo(&mut *tx, code)
                .await?
                .map(Promo::try_from)
                .transpose()?,
            None => None,
        };

        let quote = pricing::quote(db_experience.price, request.number_of_guests, promo.as_ref());
        let new_booking = request.confirm(&db_experience.title, quote, promo.is_some());

        let inserted = booking::insert_booking(&mut *tx, &new_booking)
            .await
            .map_err(|e| unique_violation_or(e, store::slot_already_booked()))?;
        tx.commit().await.map_err(db_error)?;

        info!(
            "Booking {} confirmed for {} on {} {}",
            inserted.id, inserted.experience_title, inserted.selected_date, inserted.selected_time
        );
        Booking::try_from(inserted)
    }

    async fn cancel_booking(&self, id: Uuid) -> BookitResult<Booking> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let current = booking::lock_booking_by_id(&mut *tx, id)
            .await?
            .ok_or_else(store::booking_not_found)?;
        if current.booking_status == BookingStatus::Cancelled.as_str() {
            return Err(store::booking_already_cancelled());
        }

        let cancelled = booking::set_booking_status(&mut *tx, id, BookingStatus::Cancelled)
            .await?
            .ok_or_else(store::booking_not_found)?;

        slot::set_slot_availability(
            &mut *tx,
            cancelled.experience_id,
            &cancelled.selected_date,
            &cancelled.selected_time,
            true,
        )
        .await?;

        tx.commit().await.map_err(db_error)?;

        info!("Booking {} cancelled", id);
        Booking::try_from(cancelled)
    }

    async fn list_promos(&self) -> BookitResult<Vec<Promo>> {
        promo::list_promos(&self.pool)
            .await?
            .into_iter()
            .map(Promo::try_from)
            .collect()
    }

    async fn find_active_promo(&self, code: String) -> BookitResult<Option<Promo>> {
        promo::find_active_promo(&self.pool, &code)
            .await?
            .map(Promo::try_from)
            .transpose()
    }

    async fn create_promo(&self, new_promo: NewPromo) -> BookitResult<Promo> {
        let created = promo::create_promo(&self.pool, &new_promo)
            .await
            .map_err(|e| unique_violation_or(e, store::promo_exists(&new_promo.code)))?;

        info!("Promo {} created", created.code);
        Promo::try_from(created)
    }
}
