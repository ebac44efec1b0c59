use std::collections::BTreeMap;

use async_trait::async_trait;
use bookit_core::{
    errors::{BookitError, BookitResult},
    models::{
        booking::{Booking, BookingStatus, NewBooking},
        experience::{Experience, ExperienceSummary, ExperienceUpdate, NewExperience, NewSlot, Slot},
        promo::{NewPromo, Promo, normalize_code},
    },
    pricing,
};
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::store::{self, Store};

#[derive(Debug, Default)]
struct Catalog {
    experiences: Vec<Experience>,
    bookings: Vec<Booking>,
    promos: BTreeMap<String, Promo>,
}

/// In-process store. Every mutation, including the whole reservation
/// sequence, runs under the write lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    catalog: RwLock<Catalog>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn to_slot(slot: NewSlot) -> Slot {
    Slot {
        id: Uuid::new_v4(),
        date: slot.date,
        time: slot.time,
        available: true,
        max_participants: slot.max_participants,
    }
}

fn sort_slots(slots: &mut [Slot]) {
    slots.sort_by(|a, b| (&a.date, &a.time).cmp(&(&b.date, &b.time)));
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_experiences(&self, search: Option<String>) -> BookitResult<Vec<ExperienceSummary>> {
        let catalog = self.catalog.read().await;

        Ok(catalog
            .experiences
            .iter()
            .map(Experience::summary)
            .filter(|summary| search.as_deref().is_none_or(|s| summary.matches_search(s)))
            .collect())
    }

    async fn get_experience(&self, id: Uuid) -> BookitResult<Option<Experience>> {
        let catalog = self.catalog.read().await;
        Ok(catalog.experiences.iter().find(|e| e.id == id).cloned())
    }

    async fn create_experience(&self, experience: NewExperience) -> BookitResult<Experience> {
        let mut slots: Vec<Slot> = experience.slots.into_iter().map(to_slot).collect();
        sort_slots(&mut slots);

        let created = Experience {
            id: Uuid::new_v4(),
            title: experience.title,
            tags: experience.tags,
            location: experience.location,
            description: experience.description,
            price: experience.price,
            image_url: experience.image_url,
            slots,
            created_at: Utc::now(),
        };

        self.catalog.write().await.experiences.push(created.clone());
        Ok(created)
    }

    async fn update_experience(
        &self,
        id: Uuid,
        update: ExperienceUpdate,
    ) -> BookitResult<Option<Experience>> {
        let mut catalog = self.catalog.write().await;

        Ok(catalog
            .experiences
            .iter_mut()
            .find(|e| e.id == id)
            .map(|experience| {
                update.apply_to(experience);
                experience.clone()
            }))
    }

    async fn delete_experience(&self, id: Uuid) -> BookitResult<bool> {
        let mut catalog = self.catalog.write().await;
        let before = catalog.experiences.len();
        catalog.experiences.retain(|e| e.id != id);
        Ok(catalog.experiences.len() < before)
    }

    async fn add_slots(&self, experience_id: Uuid, slots: Vec<NewSlot>) -> BookitResult<Experience> {
        let mut catalog = self.catalog.write().await;
        let experience = catalog
            .experiences
            .iter_mut()
            .find(|e| e.id == experience_id)
            .ok_or_else(store::experience_not_found)?;

        if let Some(existing) = slots
            .iter()
            .find(|new| experience.find_slot(&new.date, &new.time).is_some())
        {
            return Err(store::slot_exists(&existing.date, &existing.time));
        }

        experience.slots.extend(slots.into_iter().map(to_slot));
        sort_slots(&mut experience.slots);
        Ok(experience.clone())
    }

    async fn count_experiences(&self) -> BookitResult<i64> {
        let catalog = self.catalog.read().await;
        i64::try_from(catalog.experiences.len())
            .map_err(|e| BookitError::Internal(Box::new(e)))
    }

    async fn list_bookings(&self) -> BookitResult<Vec<Booking>> {
        let catalog = self.catalog.read().await;
        let mut bookings = catalog.bookings.clone();
        bookings.sort_by(|a, b| b.booking_date.cmp(&a.booking_date));
        Ok(bookings)
    }

    async fn get_booking(&self, id: Uuid) -> BookitResult<Option<Booking>> {
        let catalog = self.catalog.read().await;
        Ok(catalog.bookings.iter().find(|b| b.id == id).cloned())
    }

    async fn create_booking(&self, request: NewBooking) -> BookitResult<Booking> {
        let mut guard = self.catalog.write().await;
        let catalog = &mut *guard;

        let experience = catalog
            .experiences
            .iter_mut()
            .find(|e| e.id == request.experience_id)
            .ok_or_else(store::experience_not_found)?;
        let title = experience.title.clone();
        let price = experience.price;

        let slot = experience
            .slots
            .iter_mut()
            .find(|s| s.is_at(&request.selected_date, &request.selected_time))
            .ok_or_else(store::slot_not_found)?;

        if !slot.available {
            return Err(store::slot_unavailable());
        }
        if request.number_of_guests > slot.max_participants {
            return Err(store::over_capacity(slot, request.number_of_guests));
        }

        slot.available = false;

        let already_booked = catalog.bookings.iter().any(|b| {
            b.is_confirmed_for(request.experience_id, &request.selected_date, &request.selected_time)
        });
        if already_booked {
            warn!(
                "Slot {} {} of experience {} had a confirmed booking while marked available",
                request.selected_date, request.selected_time, request.experience_id
            );
            return Err(store::slot_already_booked());
        }

        let promo = request
            .promo_code
            .as_deref()
            .and_then(|code| catalog.promos.get(&normalize_code(code)))
            .filter(|promo| promo.is_active)
            .cloned();

        let quote = pricing::quote(price, request.number_of_guests, promo.as_ref());
        let booking = request.confirm(&title, quote, promo.is_some());
        catalog.bookings.push(booking.clone());

        info!(
            "Booking {} confirmed for {} on {} {}",
            booking.id, booking.experience_title, booking.selected_date, booking.selected_time
        );
        Ok(booking)
    }

    async fn cancel_booking(&self, id: Uuid) -> BookitResult<Booking> {
        let mut guard = self.catalog.write().await;
        let catalog = &mut *guard;

        let booking = catalog
            .bookings
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(store::booking_not_found)?;
        if booking.booking_status == BookingStatus::Cancelled {
            return Err(store::booking_already_cancelled());
        }
        booking.booking_status = BookingStatus::Cancelled;

        let slot = catalog
            .experiences
            .iter_mut()
            .find(|e| e.id == booking.experience_id)
            .and_then(|e| {
                e.slots
                    .iter_mut()
                    .find(|s| s.is_at(&booking.selected_date, &booking.selected_time))
            });
        if let Some(slot) = slot {
            slot.available = true;
        }

        info!("Booking {} cancelled", booking.id);
        Ok(booking.clone())
    }

    async fn list_promos(&self) -> BookitResult<Vec<Promo>> {
        let catalog = self.catalog.read().await;
        Ok(catalog.promos.values().cloned().collect())
    }

    async fn find_active_promo(&self, code: String) -> BookitResult<Option<Promo>> {
        let catalog = self.catalog.read().await;
        Ok(catalog
            .promos
            .get(&normalize_code(&code))
            .filter(|promo| promo.is_active)
            .cloned())
    }

    async fn create_promo(&self, promo: NewPromo) -> BookitResult<Promo> {
        let mut catalog = self.catalog.write().await;
        if catalog.promos.contains_key(&promo.code) {
            return Err(store::promo_exists(&promo.code));
        }

        let created = Promo {
            id: Uuid::new_v4(),
            code: promo.code,
            discount_type: promo.discount_type,
            discount_value: promo.discount_value,
            is_active: promo.is_active,
        };
        catalog.promos.insert(created.code.clone(), created.clone());
        Ok(created)
    }
}
