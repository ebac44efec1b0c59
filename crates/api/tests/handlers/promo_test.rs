use axum::http::StatusCode;
use bookit_core::models::promo::{DiscountType, Promo};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};

use crate::test_utils::{ADMIN_KEY, TestContext, bearer};

#[rstest]
#[case::exact("SAVE10")]
#[case::lowercase("save10")]
#[case::padded("  Save10 ")]
#[tokio::test]
async fn test_validate_active_promo(#[case] code: &str) {
    let ctx = TestContext::new();
    ctx.add_promo("SAVE10", DiscountType::Percentage, 10, true).await;

    let response = ctx
        .server
        .post("/promo/validate")
        .json(&json!({ "code": code }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(
        body,
        json!({
            "valid": true,
            "discountType": "percentage",
            "discountValue": 10,
            "message": "Promo code applied successfully"
        })
    );
}

#[rstest]
#[case::unknown("NOPE")]
#[case::inactive("OLD")]
#[tokio::test]
async fn test_validate_unusable_promo(#[case] code: &str) {
    let ctx = TestContext::new();
    ctx.add_promo("OLD", DiscountType::Flat, 100, false).await;

    let response = ctx
        .server
        .post("/promo/validate")
        .json(&json!({ "code": code }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(
        body,
        json!({ "valid": false, "message": "Invalid or inactive promo code" })
    );
}

#[rstest]
#[case::missing(json!({}))]
#[case::blank(json!({ "code": "   " }))]
#[case::null(json!({ "code": null }))]
#[tokio::test]
async fn test_validate_requires_code(#[case] body: Value) {
    let ctx = TestContext::new();

    let response = ctx.server.post("/promo/validate").json(&body).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let error: Value = response.json();
    assert_eq!(error["error"], json!("Promo code is required"));
}

#[tokio::test]
async fn test_list_promos_ordered_by_code() {
    let ctx = TestContext::new();
    ctx.add_promo("WELCOME20", DiscountType::Percentage, 20, true).await;
    ctx.add_promo("FLAT100", DiscountType::Flat, 100, true).await;
    ctx.add_promo("SAVE10", DiscountType::Percentage, 10, true).await;

    let promos: Vec<Promo> = ctx.server.get("/promo").await.json();

    let codes: Vec<_> = promos.iter().map(|p| p.code.as_str()).collect();
    assert_eq!(codes, vec!["FLAT100", "SAVE10", "WELCOME20"]);
}

#[tokio::test]
async fn test_create_promo() {
    let ctx = TestContext::with_admin_key(Some(ADMIN_KEY));
    let (name, value) = bearer(ADMIN_KEY);
    let body = json!({ "code": " summer25 ", "discountType": "percentage", "discountValue": 25 });

    ctx.server
        .post("/promo")
        .json(&body)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let response = ctx
        .server
        .post("/promo")
        .add_header(name.clone(), value.clone())
        .json(&body)
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let created: Promo = response.json();
    assert_eq!(created.code, "SUMMER25");
    assert!(created.is_active);

    ctx.server
        .post("/promo")
        .add_header(name, value)
        .json(&body)
        .await
        .assert_status(StatusCode::CONFLICT);
}

#[rstest]
#[case::over_hundred_percent(json!({ "code": "HUGE", "discountType": "percentage", "discountValue": 150 }))]
#[case::negative(json!({ "code": "NEG", "discountType": "flat", "discountValue": -5 }))]
#[case::blank_code(json!({ "code": "", "discountType": "flat", "discountValue": 5 }))]
#[case::unknown_type(json!({ "code": "ODD", "discountType": "bogo", "discountValue": 5 }))]
#[tokio::test]
async fn test_create_promo_rejects_invalid(#[case] body: Value) {
    let ctx = TestContext::new();

    ctx.server
        .post("/promo")
        .json(&body)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}
