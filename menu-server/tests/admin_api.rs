//! Staff console endpoints

mod common;

use std::io::Cursor;

use axum::body::Body;
use common::{STAFF_PASSWORD, STAFF_USERNAME, TestApp, error_code};
use http::{Method, Request, StatusCode, header};
use menu_server::notify::order_group;
use serde_json::json;
use shared::models::NotificationKind;

#[tokio::test]
async fn test_admin_requires_token() {
    let app = TestApp::new().await;

    let (status, body) = app.call(Method::GET, "/api/admin/orders", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), 1001);

    let req = common::build_request(Method::GET, "/api/admin/orders", None, Some("not-a-jwt"));
    let (status, body) = app.send(req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), 1004);
}

#[tokio::test]
async fn test_login() {
    let app = TestApp::new().await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/auth/login",
            Some(json!({ "username": STAFF_USERNAME, "password": "wrong" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), 1002);

    let (status, body) = app
        .call(
            Method::POST,
            "/api/auth/login",
            Some(json!({ "username": STAFF_USERNAME, "password": STAFF_PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["staff"]["username"], STAFF_USERNAME);
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let req = common::build_request(Method::GET, "/api/admin/me", None, Some(&token));
    let (status, body) = app.send(req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], STAFF_USERNAME);
}

#[tokio::test]
async fn test_list_filters_and_paginates() {
    let app = TestApp::new().await;
    let (burger, _, tables) = app.seed().await;
    app.placed_order(tables[0], burger, 1).await;
    app.placed_order(tables[1], burger, 2).await;
    app.call(Method::POST, &format!("/api/tables/{}/orders", tables[2]), None)
        .await;

    let (_, body) = app.admin(Method::GET, "/api/admin/orders", None).await;
    assert_eq!(body["data"]["pagination"]["total"], 3);

    let (_, body) = app
        .admin(Method::GET, "/api/admin/orders?status=pending&per_page=1", None)
        .await;
    let page = &body["data"];
    assert_eq!(page["pagination"]["total"], 2);
    assert_eq!(page["pagination"]["total_pages"], 2);
    assert_eq!(page["items"].as_array().unwrap().len(), 1);
    // newest first
    assert_eq!(page["items"][0]["table_name"], "T2");
    assert_eq!(page["items"][0]["item_count"], 2);
    assert_eq!(page["items"][0]["status"], "pending");

    let (_, body) = app
        .admin(Method::GET, "/api/admin/orders?status=pending&per_page=1&page=2", None)
        .await;
    assert_eq!(body["data"]["items"][0]["table_name"], "T1");

    let (_, body) = app
        .admin(
            Method::GET,
            &format!("/api/admin/orders?table_id={}", tables[2]),
            None,
        )
        .await;
    assert_eq!(body["data"]["pagination"]["total"], 1);
    assert_eq!(body["data"]["items"][0]["status"], "draft");
}

#[tokio::test]
async fn test_delete_and_delete_all() {
    let app = TestApp::new().await;
    let (burger, _, tables) = app.seed().await;
    let first = app.placed_order(tables[0], burger, 1).await;
    app.placed_order(tables[1], burger, 1).await;
    app.call(Method::POST, &format!("/api/tables/{}/orders", tables[2]), None)
        .await;

    let (status, body) = app
        .admin(Method::DELETE, &format!("/api/admin/orders/{first}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["affected"], 1);

    let (status, body) = app
        .admin(Method::DELETE, &format!("/api/admin/orders/{first}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), 4001);

    // the order's notification survives without its order
    let (_, body) = app.admin(Method::GET, "/api/admin/notifications", None).await;
    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert!(items.iter().any(|n| n["order_id"].is_null()));

    let (_, body) = app
        .admin(Method::DELETE, "/api/admin/orders?status=draft", None)
        .await;
    assert_eq!(body["data"]["affected"], 1);

    let (_, body) = app.admin(Method::DELETE, "/api/admin/orders", None).await;
    assert_eq!(body["data"]["affected"], 1);

    let (_, body) = app.admin(Method::GET, "/api/admin/orders", None).await;
    assert_eq!(body["data"]["pagination"]["total"], 0);
}

#[tokio::test]
async fn test_accept_notifies_customer() {
    let app = TestApp::new().await;
    let (burger, _, tables) = app.seed().await;
    let id = app.placed_order(tables[0], burger, 1).await;
    let mut order_rx = app.state.channels.group_add(&order_group(id));
    let uri = format!("/api/admin/orders/{id}/accept");

    let (status, body) = app.admin(Method::POST, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "accepted");

    let event = order_rx.try_recv().unwrap();
    assert_eq!(event.kind, NotificationKind::Accept);
    assert_eq!(event.body, format!("Order #{id} accepted"));

    let (status, body) = app.admin(Method::POST, &uri, None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&body), 4005);

    // accepted orders can no longer be canceled by the table
    let (status, body) = app
        .call(Method::POST, &format!("/api/orders/{id}/cancel"), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&body), 4005);
}

#[tokio::test]
async fn test_notification_open_flow() {
    let app = TestApp::new().await;
    let (burger, _, tables) = app.seed().await;
    app.placed_order(tables[0], burger, 1).await;
    app.placed_order(tables[1], burger, 1).await;

    let (_, body) = app
        .admin(Method::GET, "/api/admin/notifications/unread-count", None)
        .await;
    assert_eq!(body["data"]["unread"], 2);

    let (_, body) = app
        .admin(Method::GET, "/api/admin/notifications?unopened=true", None)
        .await;
    let first = body["data"]["items"][0]["id"].as_i64().unwrap();

    let (status, body) = app
        .admin(Method::POST, &format!("/api/admin/notifications/{first}/open"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["unread"], 1);

    let (_, body) = app
        .admin(Method::POST, "/api/admin/notifications/open-all", None)
        .await;
    assert_eq!(body["data"]["affected"], 1);

    let (_, body) = app
        .admin(Method::GET, "/api/admin/notifications?unopened=true", None)
        .await;
    assert_eq!(body["data"]["pagination"]["total"], 0);

    let (status, _) = app
        .admin(Method::DELETE, &format!("/api/admin/notifications/{first}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .admin(Method::POST, &format!("/api/admin/notifications/{first}/open"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), 3001);
}

#[tokio::test]
async fn test_menu_crud() {
    let app = TestApp::new().await;

    let (status, body) = app
        .admin(Method::POST, "/api/admin/categories", Some(json!({ "name": "Drinks" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    let category_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = app
        .admin(Method::POST, "/api/admin/categories", Some(json!({ "name": "Drinks" })))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&body), 6103);

    let (status, body) = app
        .admin(
            Method::POST,
            "/api/admin/items",
            Some(json!({ "category_id": category_id, "name": "Tea", "price": -1.0 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), 6002);

    let (status, body) = app
        .admin(
            Method::POST,
            "/api/admin/items",
            Some(json!({ "category_id": 999, "name": "Tea", "price": 2.0 })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), 6101);

    let (_, body) = app
        .admin(
            Method::POST,
            "/api/admin/items",
            Some(json!({ "category_id": category_id, "name": "Tea", "price": 2.0 })),
        )
        .await;
    let item_id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["available"], true);

    let (_, body) = app
        .admin(
            Method::PUT,
            &format!("/api/admin/items/{item_id}"),
            Some(json!({ "available": false })),
        )
        .await;
    assert_eq!(body["data"]["available"], false);
    assert_eq!(body["data"]["name"], "Tea");

    let (_, body) = app
        .admin(Method::GET, "/api/admin/items?available_only=true", None)
        .await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let (status, _) = app
        .admin(Method::POST, "/api/admin/tables", Some(json!({ "name": "Patio" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = app
        .admin(Method::POST, "/api/admin/tables", Some(json!({ "name": "Patio" })))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&body), 7002);

    let (status, _) = app
        .admin(Method::DELETE, &format!("/api/admin/categories/{category_id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .admin(Method::GET, &format!("/api/admin/items/{item_id}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

fn multipart_png(boundary: &str, filename: &str) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(8, 8, image::Rgb([10, 120, 30]));
    let mut png = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .unwrap();

    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: image/png\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(&png);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

#[tokio::test]
async fn test_item_image_upload_and_serve() {
    let app = TestApp::new().await;
    let (burger, _, _) = app.seed().await;
    let boundary = "menu-test-boundary";

    let upload = |filename: &str| {
        Request::builder()
            .method(Method::POST)
            .uri(format!("/api/admin/items/{burger}/image"))
            .header(header::AUTHORIZATION, format!("Bearer {}", app.token))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(multipart_png(boundary, filename)))
            .unwrap()
    };

    let (status, body) = app.send(upload("burger.gif")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), 6502);

    let (status, body) = app.send(upload("burger.png")).await;
    assert_eq!(status, StatusCode::OK);
    let image = body["data"]["image"].as_str().unwrap().to_string();
    assert!(image.starts_with("media/images/items/"));
    assert!(image.ends_with(".jpg"));

    let req = common::build_request(Method::GET, &format!("/{image}"), None, None);
    let resp = tower::ServiceExt::oneshot(app.app.clone(), req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "image/jpeg");

    let (status, body) = app
        .admin(Method::DELETE, &format!("/api/admin/items/{burger}/image"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["image"].is_null());
}
