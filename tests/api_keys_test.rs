use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt; // for oneshot

#[path = "common.rs"]
mod common;

use common::{body_json, seed_partner, session_cookie_header, test_app};

fn create_key_request(cookie: &str, name: &str) -> Request<Body> {
    Request::post("/api/keys")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, cookie)
        .body(Body::from(json!({ "name": name }).to_string()))
        .unwrap()
}

#[tokio::test]
async fn key_endpoints_require_auth() {
    let app = test_app().await;

    let res = app
        .router
        .clone()
        .oneshot(Request::get("/api/keys").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(res).await["error"], "Not authenticated");

    let res = app
        .router
        .clone()
        .oneshot(
            Request::post("/api/keys")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "name": "CI" }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_key_returns_secret_once() {
    let app = test_app().await;
    seed_partner(&app.store, "p1", "Acme Holdings").await;
    let cookie = session_cookie_header(&app.cookie_key, "p1");

    let res = app
        .router
        .clone()
        .oneshot(create_key_request(&cookie, "Production"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created = body_json(res).await;
    assert_eq!(created["name"], "Production");
    assert!(created["id"].is_string());
    assert!(created["created_at"].is_string());

    let secret = created["key"].as_str().expect("plaintext secret");
    assert!(secret.starts_with("letsy_"));
    assert_eq!(secret.len(), 46);
    assert!(secret["letsy_".len()..]
        .chars()
        .all(|c| c.is_ascii_alphanumeric()));

    // The listing never carries the secret or its hash
    let res = app
        .router
        .clone()
        .oneshot(
            Request::get("/api/keys")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let listing = body_json(res).await;
    let items = listing["items"].as_array().expect("items array");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], created["id"]);
    assert_eq!(items[0]["name"], "Production");
    assert_eq!(items[0]["revoked"], false);
    assert!(items[0].get("key").is_none());
    assert!(items[0].get("secret_hash").is_none());
}

#[tokio::test]
async fn bearer_secret_authenticates_requests() {
    let app = test_app().await;
    seed_partner(&app.store, "p1", "Acme Holdings").await;
    let cookie = session_cookie_header(&app.cookie_key, "p1");

    let res = app
        .router
        .clone()
        .oneshot(create_key_request(&cookie, "CI"))
        .await
        .unwrap();
    let secret = body_json(res).await["key"].as_str().unwrap().to_string();

    // No cookie; the bearer secret alone identifies the partner
    let res = app
        .router
        .clone()
        .oneshot(
            Request::get("/me")
                .header(header::AUTHORIZATION, format!("Bearer {}", secret))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await["partner_id"], "p1");

    // An unknown secret of the right shape is rejected
    let res = app
        .router
        .clone()
        .oneshot(
            Request::get("/me")
                .header(
                    header::AUTHORIZATION,
                    format!("Bearer letsy_{}", "x".repeat(40)),
                )
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn blank_key_name_is_rejected() {
    let app = test_app().await;
    seed_partner(&app.store, "p1", "Acme Holdings").await;
    let cookie = session_cookie_header(&app.cookie_key, "p1");

    let res = app
        .router
        .clone()
        .oneshot(create_key_request(&cookie, "   "))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app
        .router
        .clone()
        .oneshot(
            Request::get("/api/keys")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let listing = body_json(res).await;
    assert_eq!(listing["items"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn revoke_is_idempotent_and_disables_the_secret() {
    let app = test_app().await;
    seed_partner(&app.store, "p1", "Acme Holdings").await;
    let cookie = session_cookie_header(&app.cookie_key, "p1");

    let res = app
        .router
        .clone()
        .oneshot(create_key_request(&cookie, "Staging"))
        .await
        .unwrap();
    let created = body_json(res).await;
    let key_id = created["id"].as_str().unwrap().to_string();
    let secret = created["key"].as_str().unwrap().to_string();

    let revoke = |app: &common::TestApp, cookie: &str| {
        app.router.clone().oneshot(
            Request::post(format!("/api/keys/{}/revoke", key_id))
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
    };

    let res = revoke(&app, &cookie).await.unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    // Revoking again is a no-op, not an error
    let res = revoke(&app, &cookie).await.unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = app
        .router
        .clone()
        .oneshot(
            Request::get("/api/keys")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let listing = body_json(res).await;
    assert_eq!(listing["items"][0]["revoked"], true);

    // The revoked secret no longer authenticates
    let res = app
        .router
        .clone()
        .oneshot(
            Request::get("/me")
                .header(header::AUTHORIZATION, format!("Bearer {}", secret))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn delete_requires_prior_revocation() {
    let app = test_app().await;
    seed_partner(&app.store, "p1", "Acme Holdings").await;
    let cookie = session_cookie_header(&app.cookie_key, "p1");

    let res = app
        .router
        .clone()
        .oneshot(create_key_request(&cookie, "Old integration"))
        .await
        .unwrap();
    let key_id = body_json(res).await["id"].as_str().unwrap().to_string();

    // Deleting an active key is refused
    let res = app
        .router
        .clone()
        .oneshot(
            Request::delete(format!("/api/keys/{}", key_id))
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(
        body_json(res).await["error"],
        "key must be revoked before deletion"
    );

    let res = app
        .router
        .clone()
        .oneshot(
            Request::post(format!("/api/keys/{}/revoke", key_id))
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = app
        .router
        .clone()
        .oneshot(
            Request::delete(format!("/api/keys/{}", key_id))
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    // Gone from the listing, and a second delete is a 404
    let res = app
        .router
        .clone()
        .oneshot(
            Request::get("/api/keys")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(body_json(res).await["items"].as_array().unwrap().len(), 0);

    let res = app
        .router
        .clone()
        .oneshot(
            Request::delete(format!("/api/keys/{}", key_id))
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn keys_are_scoped_to_their_partner() {
    let app = test_app().await;
    seed_partner(&app.store, "p1", "Acme Holdings").await;
    seed_partner(&app.store, "p2", "Globex LLC").await;
    let p1_cookie = session_cookie_header(&app.cookie_key, "p1");
    let p2_cookie = session_cookie_header(&app.cookie_key, "p2");

    let res = app
        .router
        .clone()
        .oneshot(create_key_request(&p1_cookie, "Acme prod"))
        .await
        .unwrap();
    let key_id = body_json(res).await["id"].as_str().unwrap().to_string();

    // p2 sees none of p1's keys
    let res = app
        .router
        .clone()
        .oneshot(
            Request::get("/api/keys")
                .header(header::COOKIE, &p2_cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(body_json(res).await["items"].as_array().unwrap().len(), 0);

    // and cannot revoke or delete them either
    let res = app
        .router
        .clone()
        .oneshot(
            Request::post(format!("/api/keys/{}/revoke", key_id))
                .header(header::COOKIE, &p2_cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = app
        .router
        .clone()
        .oneshot(
            Request::delete(format!("/api/keys/{}", key_id))
                .header(header::COOKIE, &p2_cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // p1 still has the key, untouched
    let res = app
        .router
        .clone()
        .oneshot(
            Request::get("/api/keys")
                .header(header::COOKIE, &p1_cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let listing = body_json(res).await;
    assert_eq!(listing["items"].as_array().unwrap().len(), 1);
    assert_eq!(listing["items"][0]["revoked"], false);
}
