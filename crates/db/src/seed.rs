//! Demo catalog used by `db-migrate --seed` and `SEED_DATA=true`.

use bookit_core::{
    errors::{BookitError, BookitResult},
    models::{
        experience::{NewExperience, NewSlot, SLOT_DATE_FORMAT},
        promo::{DiscountType, NewPromo},
    },
};
use chrono::{Duration, NaiveDate, Utc};
use tracing::info;

use crate::store::Store;

const SEED_DAYS: i64 = 30;
const SEED_TIMES: [&str; 4] = ["09:00", "11:00", "14:00", "16:00"];
const SEED_CAPACITY: i32 = 10;

const KAYAK_BLURB: &str =
    "Curated small-group experience. Certified guide. Safety first with gear included.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub experiences: usize,
    pub promos: usize,
}

/// Slots for every seed time on each of the `days` days starting at `start`.
pub fn generate_slots(start: NaiveDate, days: i64) -> Vec<NewSlot> {
    (0..days)
        .map(|offset| start + Duration::days(offset))
        .flat_map(|date| {
            SEED_TIMES.iter().map(move |time| NewSlot {
                date: date.format(SLOT_DATE_FORMAT).to_string(),
                time: (*time).to_string(),
                max_participants: SEED_CAPACITY,
            })
        })
        .collect()
}

pub fn demo_experiences(start: NaiveDate) -> Vec<NewExperience> {
    let entries: [(&str, &str, &str, String, i64, &str); 8] = [
        (
            "Mangrove Kayaking Adventure",
            "Udupi",
            "Udupi, Karnataka",
            format!("{KAYAK_BLURB} Explore the beautiful mangrove forests."),
            999,
            "https://images.unsplash.com/photo-1544551763-46a013bb70d5?w=800&h=600&fit=crop",
        ),
        (
            "Kayaking Expedition",
            "Udupi, Adventure",
            "Udupi, Karnataka",
            format!("{KAYAK_BLURB} Perfect for beginners."),
            999,
            "https://images.unsplash.com/photo-1544367567-0f2fcb009e0b?w=800&h=600&fit=crop",
        ),
        (
            "River Kayaking",
            "Udupi, Water Sports",
            "Udupi, Karnataka",
            format!("{KAYAK_BLURB} Experience the thrill of river kayaking."),
            999,
            "https://images.unsplash.com/photo-1492144534655-ae79c964c9d7?w=800&h=600&fit=crop",
        ),
        (
            "Coorg Mountain Trek",
            "Coorg",
            "Coorg, Karnataka",
            "A challenging trek through dense forests with panoramic views. Experience the beauty of the Western Ghats.".to_string(),
            1499,
            "https://images.unsplash.com/photo-1506905925346-21bda4d32df4?w=800&h=600&fit=crop",
        ),
        (
            "Beach Kayaking",
            "Udupi, Beach",
            "Udupi, Karnataka",
            format!("{KAYAK_BLURB} Kayak along pristine beaches."),
            999,
            "https://images.unsplash.com/photo-1478131143081-80f7f84ca84d?w=800&h=600&fit=crop",
        ),
        (
            "Sunset Kayaking",
            "Udupi, Sunset",
            "Udupi, Karnataka",
            format!("{KAYAK_BLURB} Witness breathtaking sunsets."),
            999,
            "https://images.unsplash.com/photo-1464207687429-7505649dae38?w=800&h=600&fit=crop",
        ),
        (
            "Wildlife Kayaking",
            "Udupi, Wildlife",
            "Udupi, Karnataka",
            format!("{KAYAK_BLURB} Spot exotic birds and wildlife."),
            999,
            "https://images.unsplash.com/photo-1504608524841-42fe6f032b4b?w=800&h=600&fit=crop",
        ),
        (
            "Hiking in Chikmagalur",
            "Chikmagalur",
            "Chikmagalur, Karnataka",
            "A challenging hike through coffee plantations and misty hills. Experience the tranquility of nature.".to_string(),
            1499,
            "https://images.unsplash.com/photo-1478131143081-80f7f84ca84d?w=800&h=600&fit=crop",
        ),
    ];

    let slots = generate_slots(start, SEED_DAYS);

    entries
        .into_iter()
        .map(|(title, tags, location, description, price, image_url)| NewExperience {
            title: title.to_string(),
            tags: tags.split(',').map(|t| t.trim().to_string()).collect(),
            location: location.to_string(),
            description,
            price,
            image_url: image_url.to_string(),
            slots: slots.clone(),
        })
        .collect()
}

pub fn demo_promos() -> Vec<NewPromo> {
    [
        ("SAVE10", DiscountType::Percentage, 10),
        ("FLAT100", DiscountType::Flat, 100),
        ("WELCOME20", DiscountType::Percentage, 20),
    ]
    .into_iter()
    .map(|(code, discount_type, discount_value)| NewPromo {
        code: code.to_string(),
        discount_type,
        discount_value,
        is_active: true,
    })
    .collect()
}

/// Seeds the demo catalog. Experiences are only added to an empty catalog;
/// promos that already exist are skipped.
pub async fn seed_demo_data<S>(store: &S) -> BookitResult<SeedSummary>
where
    S: Store + ?Sized,
{
    let mut summary = SeedSummary::default();

    if store.count_experiences().await? == 0 {
        for experience in demo_experiences(Utc::now().date_naive()) {
            store.create_experience(experience).await?;
            summary.experiences += 1;
        }
    } else {
        info!("Catalog already populated, skipping demo experiences");
    }

    for promo in demo_promos() {
        match store.create_promo(promo).await {
            Ok(_) => summary.promos += 1,
            Err(BookitError::Conflict(_)) => {}
            Err(err) => return Err(err),
        }
    }

    info!(
        "Seeded {} experiences and {} promo codes",
        summary.experiences, summary.promos
    );
    Ok(summary)
}
