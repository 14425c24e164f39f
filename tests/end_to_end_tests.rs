// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Full sign-in and favorites flow over HTTP against a mocked Backlog space.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use backlog_favorites::middleware::auth::verify_jwt;
use base64::{engine::general_purpose::URL_SAFE, Engine as _};
use tower::ServiceExt;

mod common;
use common::{create_test_app, mount_code_exchange, mount_feed, mount_profile};

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn query_value<'a>(url: &'a str, name: &str) -> Option<&'a str> {
    let query = url.split_once('?')?.1;
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v)
}

fn authed(method: &str, uri: &str, jwt: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", jwt))
        .body(Body::empty())
        .unwrap()
}

async fn favorite_ids(app: &common::TestApp, jwt: &str) -> Vec<String> {
    let response = app
        .router
        .clone()
        .oneshot(authed("GET", "/api/favorites", jwt))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    body_json(response).await["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_sign_in_then_manage_favorites() {
    let app = create_test_app().await;
    mount_code_exchange(&app.upstream, "access-abc").await;
    mount_profile(&app.upstream, 42, "Taro").await;
    mount_feed(&app.upstream).await;

    // 1. Start authorization
    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/api/auth/url").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let auth_url = body_json(response).await["url"].as_str().unwrap().to_string();
    let state = query_value(&auth_url, "state").unwrap().to_string();

    // 2. Backlog redirects back with code "abc"
    let callback = format!("/api/auth/callback?code=abc&state={}", state);
    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri(&callback).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("backlog_session="));
    assert!(set_cookie.contains("HttpOnly"));

    let location = response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(location.starts_with("http://localhost:3000/auth/callback?token="));

    let jwt = query_value(&location, "token").unwrap().to_string();
    assert_eq!(verify_jwt(&jwt, &app.state.config.jwt_signing_key).unwrap(), "42");

    let user_b64 = query_value(&location, "user").unwrap();
    let user: serde_json::Value = serde_json::from_slice(&URL_SAFE.decode(user_b64).unwrap()).unwrap();
    assert_eq!(user["id"], "42");
    assert_eq!(user["name"], "Taro");

    // Token stored under the profile id
    let stored = app.tokens.find("42").await.unwrap().unwrap();
    assert_eq!(stored.access_token, "access-abc");

    // The state cannot be replayed
    let replay = app
        .router
        .clone()
        .oneshot(Request::builder().uri(&callback).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(replay.status(), StatusCode::BAD_REQUEST);

    // 3. Add, list, remove
    let response = app
        .router
        .clone()
        .oneshot(authed("POST", "/api/favorites/7", &jwt))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(favorite_ids(&app, &jwt).await, vec!["7"]);

    let response = app
        .router
        .clone()
        .oneshot(authed("DELETE", "/api/favorites/7", &jwt))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(favorite_ids(&app, &jwt).await.is_empty());

    // 4. Logout discards the stored token
    let response = app
        .router
        .clone()
        .oneshot(authed("POST", "/api/auth/logout", &jwt))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(app.tokens.find("42").await.unwrap().is_none());

    let response = app
        .router
        .clone()
        .oneshot(authed("GET", "/api/items", &jwt))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
