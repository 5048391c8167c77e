mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{register_and_login, request_json, spawn_app};

#[tokio::test]
async fn test_login_required() {
    let app = spawn_app().await;

    let (status, _) = request_json(&app.router, "GET", "/api/tags", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = request_json(
        &app.router,
        "POST",
        "/api/tags",
        None,
        Some(json!({ "name": "Vegan" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_tag_successful() {
    let app = spawn_app().await;
    let token = register_and_login(&app, "user@example.com", "parola17pas", "u").await;

    let (status, body) = request_json(
        &app.router,
        "POST",
        "/api/tags",
        Some(&token),
        Some(json!({ "name": "Dessert" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Dessert");
    assert!(body["id"].as_i64().is_some());
    // The owner is never serialized.
    assert!(body.get("user_id").is_none());

    let (status, body) = request_json(&app.router, "GET", "/api/tags", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["name"], "Dessert");
}

#[tokio::test]
async fn test_create_tag_empty_name_fails() {
    let app = spawn_app().await;
    let token = register_and_login(&app, "user@example.com", "parola17pas", "u").await;

    let (status, _) = request_json(
        &app.router,
        "POST",
        "/api/tags",
        Some(&token),
        Some(json!({ "name": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = request_json(&app.router, "GET", "/api/tags", Some(&token), None).await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_tags_limited_to_user() {
    let app = spawn_app().await;
    let token_a = register_and_login(&app, "a@example.com", "parola17pas", "a").await;
    let token_b = register_and_login(&app, "b@example.com", "parola17pas", "b").await;

    // Both accounts create a tag with the same name.
    for token in [&token_a, &token_b] {
        let (status, _) = request_json(
            &app.router,
            "POST",
            "/api/tags",
            Some(token),
            Some(json!({ "name": "Vegan" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    for token in [&token_a, &token_b] {
        let (status, body) = request_json(&app.router, "GET", "/api/tags", Some(token), None).await;
        assert_eq!(status, StatusCode::OK);
        let tags = body.as_array().unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0]["name"], "Vegan");
    }
}

#[tokio::test]
async fn test_tags_ordered_by_name_descending() {
    let app = spawn_app().await;
    let token = register_and_login(&app, "user@example.com", "parola17pas", "u").await;

    for name in ["Apple", "Zucchini", "Mango"] {
        request_json(
            &app.router,
            "POST",
            "/api/tags",
            Some(&token),
            Some(json!({ "name": name })),
        )
        .await;
    }

    let (_, body) = request_json(&app.router, "GET", "/api/tags", Some(&token), None).await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Zucchini", "Mango", "Apple"]);
}

#[tokio::test]
async fn test_rename_tag() {
    let app = spawn_app().await;
    let token = register_and_login(&app, "user@example.com", "parola17pas", "u").await;

    let (_, created) = request_json(
        &app.router,
        "POST",
        "/api/tags",
        Some(&token),
        Some(json!({ "name": "Breakfast" })),
    )
    .await;
    let tag_id = created["id"].as_i64().unwrap();

    let (status, body) = request_json(
        &app.router,
        "PATCH",
        &format!("/api/tags/{tag_id}"),
        Some(&token),
        Some(json!({ "name": "Brunch" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Brunch");
}

#[tokio::test]
async fn test_rename_other_users_tag_is_not_found() {
    let app = spawn_app().await;
    let token_a = register_and_login(&app, "a@example.com", "parola17pas", "a").await;
    let token_b = register_and_login(&app, "b@example.com", "parola17pas", "b").await;

    let (_, created) = request_json(
        &app.router,
        "POST",
        "/api/tags",
        Some(&token_a),
        Some(json!({ "name": "Private" })),
    )
    .await;
    let tag_id = created["id"].as_i64().unwrap();

    let (status, _) = request_json(
        &app.router,
        "PATCH",
        &format!("/api/tags/{tag_id}"),
        Some(&token_b),
        Some(json!({ "name": "Mine Now" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_tag() {
    let app = spawn_app().await;
    let token = register_and_login(&app, "user@example.com", "parola17pas", "u").await;

    let (_, created) = request_json(
        &app.router,
        "POST",
        "/api/tags",
        Some(&token),
        Some(json!({ "name": "Temporary" })),
    )
    .await;
    let tag_id = created["id"].as_i64().unwrap();

    let (status, _) = request_json(
        &app.router,
        "DELETE",
        &format!("/api/tags/{tag_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Already gone.
    let (status, _) = request_json(
        &app.router,
        "DELETE",
        &format!("/api/tags/{tag_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
