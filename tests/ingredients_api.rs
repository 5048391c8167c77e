mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{register_and_login, request_json, spawn_app};

#[tokio::test]
async fn test_login_required() {
    let app = spawn_app().await;

    let (status, _) = request_json(&app.router, "GET", "/api/ingredients", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_ingredient_successful() {
    let app = spawn_app().await;
    let token = register_and_login(&app, "user@example.com", "parola17pas", "u").await;

    let (status, body) = request_json(
        &app.router,
        "POST",
        "/api/ingredients",
        Some(&token),
        Some(json!({ "name": "Cucumber" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Cucumber");
    assert!(body.get("user_id").is_none());
}

#[tokio::test]
async fn test_create_ingredient_empty_name_fails() {
    let app = spawn_app().await;
    let token = register_and_login(&app, "user@example.com", "parola17pas", "u").await;

    let (status, _) = request_json(
        &app.router,
        "POST",
        "/api/ingredients",
        Some(&token),
        Some(json!({ "name": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_ingredients_limited_to_user() {
    let app = spawn_app().await;
    let token_a = register_and_login(&app, "a@example.com", "parola17pas", "a").await;
    let token_b = register_and_login(&app, "other@user.com", "testparols12", "b").await;

    request_json(
        &app.router,
        "POST",
        "/api/ingredients",
        Some(&token_b),
        Some(json!({ "name": "Meat" })),
    )
    .await;
    request_json(
        &app.router,
        "POST",
        "/api/ingredients",
        Some(&token_a),
        Some(json!({ "name": "Icecream" })),
    )
    .await;

    let (status, body) =
        request_json(&app.router, "GET", "/api/ingredients", Some(&token_a), None).await;
    assert_eq!(status, StatusCode::OK);
    let ingredients = body.as_array().unwrap();
    assert_eq!(ingredients.len(), 1);
    assert_eq!(ingredients[0]["name"], "Icecream");
}

#[tokio::test]
async fn test_ingredients_ordered_by_name_descending() {
    let app = spawn_app().await;
    let token = register_and_login(&app, "user@example.com", "parola17pas", "u").await;

    for name in ["Basil", "Tomato", "Garlic"] {
        request_json(
            &app.router,
            "POST",
            "/api/ingredients",
            Some(&token),
            Some(json!({ "name": name })),
        )
        .await;
    }

    let (_, body) = request_json(&app.router, "GET", "/api/ingredients", Some(&token), None).await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Tomato", "Garlic", "Basil"]);
}

#[tokio::test]
async fn test_delete_ingredient() {
    let app = spawn_app().await;
    let token = register_and_login(&app, "user@example.com", "parola17pas", "u").await;

    let (_, created) = request_json(
        &app.router,
        "POST",
        "/api/ingredients",
        Some(&token),
        Some(json!({ "name": "Flour" })),
    )
    .await;
    let ingredient_id = created["id"].as_i64().unwrap();

    let (status, _) = request_json(
        &app.router,
        "DELETE",
        &format!("/api/ingredients/{ingredient_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = request_json(
        &app.router,
        "DELETE",
        &format!("/api/ingredients/{ingredient_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_other_users_ingredient_is_not_found() {
    let app = spawn_app().await;
    let token_a = register_and_login(&app, "a@example.com", "parola17pas", "a").await;
    let token_b = register_and_login(&app, "b@example.com", "parola17pas", "b").await;

    let (_, created) = request_json(
        &app.router,
        "POST",
        "/api/ingredients",
        Some(&token_a),
        Some(json!({ "name": "Saffron" })),
    )
    .await;
    let ingredient_id = created["id"].as_i64().unwrap();

    let (status, _) = request_json(
        &app.router,
        "DELETE",
        &format!("/api/ingredients/{ingredient_id}"),
        Some(&token_b),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Still there for its owner.
    let (_, body) = request_json(&app.router, "GET", "/api/ingredients", Some(&token_a), None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}
