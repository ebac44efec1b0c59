use axum::http::StatusCode;
use bookit_core::models::experience::{Experience, ExperienceSummary};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::test_utils::{ADMIN_KEY, TestContext, bearer, booking_body};

fn new_experience_body() -> Value {
    json!({
        "title": "Coorg Mountain Trek",
        "tags": "Coorg, Trek, ",
        "location": "Coorg, Karnataka",
        "description": "A challenging trek through dense forests",
        "price": 1499,
        "imageUrl": "https://example.com/coorg.jpg",
        "slots": [
            { "date": "2025-06-02", "time": "14:00", "maxParticipants": 8 },
            { "date": "2025-06-01", "time": "9:00", "maxParticipants": 8 }
        ]
    })
}

#[tokio::test]
async fn test_list_experiences_omits_slots() {
    let ctx = TestContext::new();
    ctx.add_experience(999).await;

    let response = ctx.server.get("/experiences").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], json!("Mangrove Kayaking"));
    assert_eq!(items[0]["imageUrl"], json!("https://example.com/mangrove.jpg"));
    assert!(items[0].get("slots").is_none());
}

#[rstest]
#[case::by_title("mangrove", 1)]
#[case::by_tag("ADVENTURE", 1)]
#[case::by_location("karnataka", 1)]
#[case::blank("  ", 1)]
#[case::no_match("goa", 0)]
#[tokio::test]
async fn test_list_experiences_search(#[case] term: &str, #[case] expected: usize) {
    let ctx = TestContext::new();
    ctx.add_experience(999).await;

    let found: Vec<ExperienceSummary> = ctx
        .server
        .get("/experiences")
        .add_query_param("search", term)
        .await
        .json();

    assert_eq!(found.len(), expected);
}

#[tokio::test]
async fn test_get_experience_includes_ordered_slots() {
    let ctx = TestContext::new();
    let experience = ctx.add_experience(999).await;

    let detail: Experience = ctx
        .server
        .get(&format!("/experiences/{}", experience.id))
        .await
        .json();

    let times: Vec<_> = detail.slots.iter().map(|s| s.time.as_str()).collect();
    assert_eq!(times, vec!["09:00", "11:00"]);
    assert!(detail.slots.iter().all(|s| s.available));
}

#[tokio::test]
async fn test_get_unknown_experience_is_not_found() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .get(&format!("/experiences/{}", Uuid::new_v4()))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"], json!("Experience not found"));
}

#[rstest]
#[case::get("/experiences/not-a-uuid")]
#[case::slots("/experiences/123/slots")]
#[tokio::test]
async fn test_malformed_experience_id_is_json_bad_request(#[case] path: &str) {
    let ctx = TestContext::new();

    let response = if path.ends_with("/slots") {
        ctx.server
            .post(path)
            .json(&json!({ "slots": [{ "date": "2025-06-01", "time": "16:00" }] }))
            .await
    } else {
        ctx.server.get(path).await
    };

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("UUID"));
}

#[tokio::test]
async fn test_create_experience_normalizes_input() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/experiences")
        .json(&new_experience_body())
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let created: Experience = response.json();
    assert_eq!(created.tags, vec!["Coorg", "Trek"]);
    let slots: Vec<_> = created
        .slots
        .iter()
        .map(|s| format!("{} {}", s.date, s.time))
        .collect();
    assert_eq!(slots, vec!["2025-06-01 09:00", "2025-06-02 14:00"]);
}

#[rstest]
#[case::missing_title("title")]
#[case::missing_location("location")]
#[case::missing_description("description")]
#[case::missing_image("imageUrl")]
#[case::missing_price("price")]
#[tokio::test]
async fn test_create_experience_requires_fields(#[case] field: &str) {
    let ctx = TestContext::new();
    let mut body = new_experience_body();
    body.as_object_mut().unwrap().remove(field);

    ctx.server
        .post("/experiences")
        .json(&body)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_experience_rejects_negative_price() {
    let ctx = TestContext::new();
    let mut body = new_experience_body();
    body["price"] = json!(-1);

    ctx.server
        .post("/experiences")
        .json(&body)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_experience_is_partial() {
    let ctx = TestContext::new();
    let experience = ctx.add_experience(999).await;

    let updated: Experience = ctx
        .server
        .put(&format!("/experiences/{}", experience.id))
        .json(&json!({ "price": 1299, "tags": ["Udupi", "Mangroves"] }))
        .await
        .json();

    assert_eq!(updated.price, 1299);
    assert_eq!(updated.tags, vec!["Udupi", "Mangroves"]);
    assert_eq!(updated.title, experience.title);
    assert_eq!(updated.slots, experience.slots);

    ctx.server
        .put(&format!("/experiences/{}", Uuid::new_v4()))
        .json(&json!({ "price": 10 }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_experience_keeps_bookings() {
    let ctx = TestContext::new();
    let experience = ctx.add_experience(999).await;

    ctx.server
        .post("/bookings")
        .json(&booking_body(&experience.id.to_string(), "09:00", 1))
        .await
        .assert_status(StatusCode::CREATED);

    let response = ctx
        .server
        .delete(&format!("/experiences/{}", experience.id))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body, json!({ "message": "Experience deleted successfully" }));

    ctx.server
        .delete(&format!("/experiences/{}", experience.id))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let bookings: Value = ctx.server.get("/bookings").await.json();
    assert_eq!(bookings.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_add_slots() {
    let ctx = TestContext::new();
    let experience = ctx.add_experience(999).await;
    let path = format!("/experiences/{}/slots", experience.id);

    let response = ctx
        .server
        .post(&path)
        .json(&json!({ "slots": [{ "date": "2025-06-01", "time": "16:00", "maxParticipants": 6 }] }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let updated: Experience = response.json();
    assert_eq!(updated.slots.len(), 3);

    ctx.server
        .post(&path)
        .json(&json!({ "slots": [{ "date": "2025-06-01", "time": "09:00" }] }))
        .await
        .assert_status(StatusCode::CONFLICT);

    ctx.server
        .post(&path)
        .json(&json!({ "slots": [{ "date": "06/01/2025", "time": "09:00" }] }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    ctx.server
        .post(&path)
        .json(&json!({ "slots": [] }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_catalog_mutations_require_admin_key() {
    let ctx = TestContext::with_admin_key(Some(ADMIN_KEY));
    let experience = ctx.add_experience(999).await;

    ctx.server
        .post("/experiences")
        .json(&new_experience_body())
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    ctx.server
        .delete(&format!("/experiences/{}", experience.id))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    // Reads stay public.
    ctx.server
        .get("/experiences")
        .await
        .assert_status(StatusCode::OK);

    let (name, value) = bearer(ADMIN_KEY);
    ctx.server
        .post("/experiences")
        .add_header(name, value)
        .json(&new_experience_body())
        .await
        .assert_status(StatusCode::CREATED);
}
