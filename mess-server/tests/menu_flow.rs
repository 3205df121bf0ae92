//! Menu CRUD, access control and feedback tests

mod common;

use common::{body_json, create_menu_item, register_user, send, send_file, test_app};
use http::{Method, StatusCode};
use serde_json::json;

#[tokio::test]
async fn staff_can_manage_items_and_anyone_can_browse() {
    let (app, _state) = test_app().await;
    let staff = register_user(&app, "user1", "staff@mess.test", "staff").await;

    let id = create_menu_item(&app, &staff, "Masala Dosa").await;
    create_menu_item(&app, &staff, "Idli Sambar").await;

    // Anonymous browsing works
    let response = send(&app, Method::GET, "/api/menu", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    // Search is case-insensitive
    let response = send(&app, Method::GET, "/api/menu?search=DOSA", None, None).await;
    let body = body_json(response).await;
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Masala Dosa");

    // Title sort
    let response = send(&app, Method::GET, "/api/menu?sort=title-asc", None, None).await;
    let body = body_json(response).await;
    assert_eq!(body["data"][0]["title"], "Idli Sambar");

    // Full-form update
    let response = send(
        &app,
        Method::PUT,
        &format!("/api/menu/{id}"),
        Some(&staff),
        Some(json!({
            "title": "Masala Dosa Special",
            "description": "Crispy rice crepe with potato filling",
            "mealType": "breakfast",
            "servingTime": "7:30 AM - 9:30 AM",
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["title"], "Masala Dosa Special");

    // Delete, then the item is gone
    let response = send(&app, Method::DELETE, &format!("/api/menu/{id}"), Some(&staff), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, Method::GET, &format!("/api/menu/{id}"), None, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn menu_writes_are_staff_only() {
    let (app, _state) = test_app().await;
    let regular = register_user(&app, "user2", "regular@mess.test", "regular").await;

    let payload = json!({
        "title": "Poha",
        "description": "Flattened rice",
        "mealType": "breakfast",
        "servingTime": "8:00 AM - 9:00 AM",
    });

    // Anonymous gets 401
    let response = send(&app, Method::POST, "/api/menu", None, Some(payload.clone())).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Regular user gets 403
    let response = send(&app, Method::POST, "/api/menu", Some(&regular), Some(payload)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Only mess workers can manage menu items");

    // Same gate on uploads
    let response = send(&app, Method::POST, "/api/upload/image", Some(&regular), None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn invalid_item_payload_is_rejected() {
    let (app, _state) = test_app().await;
    let staff = register_user(&app, "user1", "staff@mess.test", "staff").await;

    let response = send(
        &app,
        Method::POST,
        "/api/menu",
        Some(&staff),
        Some(json!({
            "title": "",
            "description": "no title given",
            "mealType": "lunch",
            "servingTime": "12:00 PM - 2:00 PM",
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["fieldErrors"]
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e["field"] == "title"));
}

#[tokio::test]
async fn feedback_upserts_and_updates_the_average() {
    let (app, _state) = test_app().await;
    let staff = register_user(&app, "user1", "staff@mess.test", "staff").await;
    let regular = register_user(&app, "user2", "regular@mess.test", "regular").await;
    let id = create_menu_item(&app, &staff, "Masala Dosa").await;

    // First submission
    let response = send(
        &app,
        Method::POST,
        "/api/feedback",
        Some(&regular),
        Some(json!({"menuItemId": id, "rating": 4, "comment": "Great crunch"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, Method::GET, &format!("/api/menu/{id}"), None, None).await;
    let body = body_json(response).await;
    assert_eq!(body["data"]["rating"], 4.0);

    // Re-submission replaces the old rating instead of adding a row
    let response = send(
        &app,
        Method::POST,
        "/api/feedback",
        Some(&regular),
        Some(json!({"menuItemId": id, "rating": 2})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, Method::GET, &format!("/api/menu/{id}"), None, None).await;
    let body = body_json(response).await;
    assert_eq!(body["data"]["rating"], 2.0);

    // The stored row is visible to its author
    let response = send(
        &app,
        Method::GET,
        &format!("/api/feedback/mine/{id}"),
        Some(&regular),
        None,
    )
    .await;
    let body = body_json(response).await;
    assert_eq!(body["data"]["rating"], 2);

    // A second user's rating averages in
    let other = register_user(&app, "user3", "other@mess.test", "regular").await;
    let response = send(
        &app,
        Method::POST,
        "/api/feedback",
        Some(&other),
        Some(json!({"menuItemId": id, "rating": 4})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, Method::GET, &format!("/api/menu/{id}"), None, None).await;
    let body = body_json(response).await;
    assert_eq!(body["data"]["rating"], 3.0);
}

#[tokio::test]
async fn zero_rating_is_rejected_before_any_lookup() {
    let (app, _state) = test_app().await;
    let staff = register_user(&app, "user1", "staff@mess.test", "staff").await;
    let regular = register_user(&app, "user2", "regular@mess.test", "regular").await;
    let id = create_menu_item(&app, &staff, "Samosa").await;

    let response = send(
        &app,
        Method::POST,
        "/api/feedback",
        Some(&regular),
        Some(json!({"menuItemId": id, "rating": 0})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["fieldErrors"]
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e["message"] == "Please select a rating before submitting"));
}

#[tokio::test]
async fn upload_bodies_between_two_and_five_megabytes_reach_image_validation() {
    let (app, _state) = test_app().await;
    let staff = register_user(&app, "user1", "staff@mess.test", "staff").await;

    // 3MB payload is over axum's stock body limit but within the image cap.
    // It must fail on image decoding, not on body size.
    let payload = vec![0u8; 3 * 1024 * 1024];
    let response = send_file(&app, "/api/upload/image", &staff, "big.png", payload).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("Invalid image file"), "got: {message}");
    assert!(!message.contains("multipart"), "got: {message}");
}

#[tokio::test]
async fn feedback_requires_a_session() {
    let (app, _state) = test_app().await;

    let response = send(
        &app,
        Method::POST,
        "/api/feedback",
        None,
        Some(json!({"menuItemId": "menu_item:x", "rating": 5})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
