use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::{MAX_TEXT_LENGTH, bounded, required};
use crate::errors::{BookitError, BookitResult};

pub const SLOT_DATE_FORMAT: &str = "%Y-%m-%d";
pub const SLOT_TIME_FORMAT: &str = "%H:%M";

/// A bookable date + time unit of an experience.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub id: Uuid,
    pub date: String,
    pub time: String,
    pub available: bool,
    pub max_participants: i32,
}

impl Slot {
    pub fn is_at(&self, date: &str, time: &str) -> bool {
        self.date == date && self.time == time
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub id: Uuid,
    pub title: String,
    pub tags: Vec<String>,
    pub location: String,
    pub description: String,
    pub price: i64,
    pub image_url: String,
    pub slots: Vec<Slot>,
    pub created_at: DateTime<Utc>,
}

impl Experience {
    pub fn summary(&self) -> ExperienceSummary {
        ExperienceSummary {
            id: self.id,
            title: self.title.clone(),
            tags: self.tags.clone(),
            location: self.location.clone(),
            description: self.description.clone(),
            price: self.price,
            image_url: self.image_url.clone(),
            created_at: self.created_at,
        }
    }

    pub fn find_slot(&self, date: &str, time: &str) -> Option<&Slot> {
        self.slots.iter().find(|slot| slot.is_at(date, time))
    }
}

/// Catalog listing entry: an experience without its slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceSummary {
    pub id: Uuid,
    pub title: String,
    pub tags: Vec<String>,
    pub location: String,
    pub description: String,
    pub price: i64,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

impl ExperienceSummary {
    /// Case-insensitive substring match over title, location and tags.
    pub fn matches_search(&self, search: &str) -> bool {
        let needle = search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        self.title.to_lowercase().contains(&needle)
            || self.location.to_lowercase().contains(&needle)
            || self
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(&needle))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExperienceQuery {
    pub search: Option<String>,
}

impl ExperienceQuery {
    /// The search term, if one was given and is not blank.
    pub fn term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }
}

/// Tags arrive either as a JSON array or as the comma-separated string the
/// admin form posts.
#[derive(Deserialize)]
#[serde(untagged)]
enum TagsInput {
    List(Vec<String>),
    Csv(String),
}

impl TagsInput {
    fn into_tags(self) -> Vec<String> {
        let raw = match self {
            TagsInput::List(tags) => tags,
            TagsInput::Csv(csv) => csv.split(',').map(str::to_string).collect(),
        };

        raw.into_iter()
            .map(|tag| tag.trim().to_string())
            .filter(|tag| !tag.is_empty())
            .collect()
    }
}

fn deserialize_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(TagsInput::deserialize(deserializer)?.into_tags())
}

fn deserialize_optional_tags<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<TagsInput>::deserialize(deserializer)?.map(TagsInput::into_tags))
}

fn default_max_participants() -> i32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSlotRequest {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default = "default_max_participants")]
    pub max_participants: i32,
}

/// A validated slot, with date and time in canonical `YYYY-MM-DD` / `HH:MM` form.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSlot {
    pub date: String,
    pub time: String,
    pub max_participants: i32,
}

impl CreateSlotRequest {
    pub fn validate(&self) -> BookitResult<NewSlot> {
        let date = NaiveDate::parse_from_str(self.date.trim(), SLOT_DATE_FORMAT).map_err(|_| {
            BookitError::Validation(format!(
                "Invalid slot date '{}', expected YYYY-MM-DD",
                self.date
            ))
        })?;
        let time = NaiveTime::parse_from_str(self.time.trim(), SLOT_TIME_FORMAT).map_err(|_| {
            BookitError::Validation(format!("Invalid slot time '{}', expected HH:MM", self.time))
        })?;

        if self.max_participants < 1 {
            return Err(BookitError::Validation(
                "maxParticipants must be at least 1".to_string(),
            ));
        }

        Ok(NewSlot {
            date: date.format(SLOT_DATE_FORMAT).to_string(),
            time: time.format(SLOT_TIME_FORMAT).to_string(),
            max_participants: self.max_participants,
        })
    }
}

fn validate_slots(slots: &[CreateSlotRequest]) -> BookitResult<Vec<NewSlot>> {
    let mut seen = HashSet::new();
    let mut validated = Vec::with_capacity(slots.len());

    for slot in slots {
        let slot = slot.validate()?;
        if !seen.insert((slot.date.clone(), slot.time.clone())) {
            return Err(BookitError::Validation(format!(
                "Duplicate slot {} {}",
                slot.date, slot.time
            )));
        }
        validated.push(slot);
    }

    Ok(validated)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExperienceRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    pub price: Option<i64>,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub slots: Vec<CreateSlotRequest>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewExperience {
    pub title: String,
    pub tags: Vec<String>,
    pub location: String,
    pub description: String,
    pub price: i64,
    pub image_url: String,
    pub slots: Vec<NewSlot>,
}

impl CreateExperienceRequest {
    pub fn validate(&self) -> BookitResult<NewExperience> {
        let price = self
            .price
            .ok_or_else(|| BookitError::Validation("price is required".to_string()))?;
        if price < 0 {
            return Err(BookitError::Validation(
                "price must not be negative".to_string(),
            ));
        }

        Ok(NewExperience {
            title: bounded(required(&self.title, "title")?, "title", MAX_TEXT_LENGTH)?,
            tags: self.tags.clone(),
            location: bounded(required(&self.location, "location")?, "location", MAX_TEXT_LENGTH)?,
            description: required(&self.description, "description")?,
            price,
            image_url: required(&self.image_url, "imageUrl")?,
            slots: validate_slots(&self.slots)?,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExperienceRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_tags")]
    pub tags: Option<Vec<String>>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub image_url: Option<String>,
}

/// A validated partial update; `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExperienceUpdate {
    pub title: Option<String>,
    pub tags: Option<Vec<String>>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub image_url: Option<String>,
}

impl UpdateExperienceRequest {
    pub fn validate(&self) -> BookitResult<ExperienceUpdate> {
        let optional = |value: &Option<String>, field: &str| -> BookitResult<Option<String>> {
            value.as_deref().map(|v| required(v, field)).transpose()
        };
        let text = |value: &Option<String>, field: &str| -> BookitResult<Option<String>> {
            optional(value, field)?
                .map(|v| bounded(v, field, MAX_TEXT_LENGTH))
                .transpose()
        };

        if matches!(self.price, Some(price) if price < 0) {
            return Err(BookitError::Validation(
                "price must not be negative".to_string(),
            ));
        }

        Ok(ExperienceUpdate {
            title: text(&self.title, "title")?,
            tags: self.tags.clone(),
            location: text(&self.location, "location")?,
            description: optional(&self.description, "description")?,
            price: self.price,
            image_url: optional(&self.image_url, "imageUrl")?,
        })
    }
}

impl ExperienceUpdate {
    pub fn apply_to(&self, experience: &mut Experience) {
        if let Some(title) = &self.title {
            experience.title = title.clone();
        }
        if let Some(tags) = &self.tags {
            experience.tags = tags.clone();
        }
        if let Some(location) = &self.location {
            experience.location = location.clone();
        }
        if let Some(description) = &self.description {
            experience.description = description.clone();
        }
        if let Some(price) = self.price {
            experience.price = price;
        }
        if let Some(image_url) = &self.image_url {
            experience.image_url = image_url.clone();
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddSlotsRequest {
    #[serde(default)]
    pub slots: Vec<CreateSlotRequest>,
}

impl AddSlotsRequest {
    pub fn validate(&self) -> BookitResult<Vec<NewSlot>> {
        if self.slots.is_empty() {
            return Err(BookitError::Validation(
                "At least one slot must be provided".to_string(),
            ));
        }
        validate_slots(&self.slots)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteExperienceResponse {
    pub message: String,
}
