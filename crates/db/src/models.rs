use bookit_core::{
    errors::BookitError,
    models::{
        booking::Booking,
        experience::{Experience, ExperienceSummary, Slot},
        promo::Promo,
    },
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbExperience {
    pub id: Uuid,
    pub title: String,
    pub tags: Vec<String>,
    pub location: String,
    pub description: String,
    pub price: i64,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSlot {
    pub id: Uuid,
    pub experience_id: Uuid,
    pub slot_date: String,
    pub slot_time: String,
    pub available: bool,
    pub max_participants: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBooking {
    pub id: Uuid,
    pub experience_id: Uuid,
    pub experience_title: String,
    pub user_name: String,
    pub user_email: String,
    pub user_phone: String,
    pub selected_date: String,
    pub selected_time: String,
    pub number_of_guests: i32,
    pub promo_code: Option<String>,
    pub discount: i64,
    pub total_amount: i64,
    pub booking_status: String,
    pub booking_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbPromo {
    pub id: Uuid,
    pub code: String,
    pub discount_type: String,
    pub discount_value: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl DbExperience {
    pub fn with_slots(self, slots: Vec<DbSlot>) -> Experience {
        Experience {
            id: self.id,
            title: self.title,
            tags: self.tags,
            location: self.location,
            description: self.description,
            price: self.price,
            image_url: self.image_url,
            slots: slots.into_iter().map(Slot::from).collect(),
            created_at: self.created_at,
        }
    }
}

impl From<DbExperience> for ExperienceSummary {
    fn from(db: DbExperience) -> Self {
        Self {
            id: db.id,
            title: db.title,
            tags: db.tags,
            location: db.location,
            description: db.description,
            price: db.price,
            image_url: db.image_url,
            created_at: db.created_at,
        }
    }
}

impl From<DbSlot> for Slot {
    fn from(db: DbSlot) -> Self {
        Self {
            id: db.id,
            date: db.slot_date,
            time: db.slot_time,
            available: db.available,
            max_participants: db.max_participants,
        }
    }
}

impl TryFrom<DbBooking> for Booking {
    type Error = BookitError;

    fn try_from(db: DbBooking) -> Result<Self, Self::Error> {
        Ok(Self {
            id: db.id,
            experience_id: db.experience_id,
            experience_title: db.experience_title,
            user_name: db.user_name,
            user_email: db.user_email,
            user_phone: db.user_phone,
            selected_date: db.selected_date,
            selected_time: db.selected_time,
            number_of_guests: db.number_of_guests,
            promo_code: db.promo_code,
            discount: db.discount,
            total_amount: db.total_amount,
            booking_status: db.booking_status.parse()?,
            booking_date: db.booking_date,
        })
    }
}

impl TryFrom<DbPromo> for Promo {
    type Error = BookitError;

    fn try_from(db: DbPromo) -> Result<Self, Self::Error> {
        Ok(Self {
            id: db.id,
            code: db.code,
            discount_type: db.discount_type.parse()?,
            discount_value: db.discount_value,
            is_active: db.is_active,
        })
    }
}
