//! Application state and routing

use crate::handlers;
use crate::services::{ItemService, StoreService, TagService, UserService};
use crate::storage::Database;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use stores_core::{AuthGate, TokenCodec, TokenPolicy};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub stores: Arc<StoreService>,
    pub items: Arc<ItemService>,
    pub tags: Arc<TagService>,
    pub users: Arc<UserService>,
    pub gate: Arc<AuthGate>,
}

impl AppState {
    pub fn new(db: Arc<Database>, jwt_secret: &str, policy: TokenPolicy) -> Self {
        let codec = Arc::new(TokenCodec::new(jwt_secret, policy));
        let gate = Arc::new(AuthGate::new(codec.clone(), db.clone()));

        Self {
            stores: Arc::new(StoreService::new(db.clone())),
            items: Arc::new(ItemService::new(db.clone())),
            tags: Arc::new(TagService::new(db.clone())),
            users: Arc::new(UserService::new(db, codec)),
            gate,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/store",
            get(handlers::stores::list).post(handlers::stores::create),
        )
        .route(
            "/store/:store_id",
            get(handlers::stores::get).delete(handlers::stores::delete),
        )
        .route(
            "/store/:store_id/tag",
            get(handlers::tags::list_for_store).post(handlers::tags::create),
        )
        .route(
            "/item",
            get(handlers::items::list).post(handlers::items::create),
        )
        .route(
            "/item/:item_id",
            get(handlers::items::get)
                .put(handlers::items::replace)
                .delete(handlers::items::delete),
        )
        .route(
            "/item/:item_id/tag/:tag_id",
            post(handlers::tags::link).delete(handlers::tags::unlink),
        )
        .route(
            "/tag/:tag_id",
            get(handlers::tags::get).delete(handlers::tags::delete),
        )
        .route("/register", post(handlers::users::register))
        .route("/login", post(handlers::users::login))
        .route("/refresh", post(handlers::users::refresh))
        .route("/logout", post(handlers::users::logout))
        .route(
            "/user/:user_id",
            get(handlers::users::get).delete(handlers::users::delete),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn app() -> Router {
        let db = Arc::new(Database::in_memory().await.unwrap());
        router(AppState::new(db, "router-test", TokenPolicy::default()))
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    /// Registers and logs in; returns (access, refresh)
    async fn login(app: &Router, username: &str) -> (String, String) {
        let creds = json!({ "username": username, "password": "hunter2" });
        let (status, _) = send(app, Method::POST, "/register", None, Some(creds.clone())).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(app, Method::POST, "/login", None, Some(creds)).await;
        assert_eq!(status, StatusCode::OK);
        (
            body["access_token"].as_str().unwrap().to_string(),
            body["refresh_token"].as_str().unwrap().to_string(),
        )
    }

    async fn create_store(app: &Router, name: &str) -> i64 {
        let (status, body) =
            send(app, Method::POST, "/store", None, Some(json!({ "name": name }))).await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = app().await;
        let (status, body) = send(&app, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_store_lifecycle() {
        let app = app().await;
        let id = create_store(&app, "Main").await;

        let (status, body) = send(&app, Method::GET, &format!("/store/{id}"), None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Main");
        assert_eq!(body["items"], json!([]));

        let (status, body) =
            send(&app, Method::POST, "/store", None, Some(json!({ "name": "Main" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 400);

        let (status, _) = send(&app, Method::DELETE, &format!("/store/{id}"), None, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&app, Method::GET, &format!("/store/{id}"), None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], "Not Found");
    }

    #[tokio::test]
    async fn test_validation_rejected_with_field_errors() {
        let app = app().await;

        let (status, body) = send(&app, Method::POST, "/store", None, Some(json!({}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["errors"][0]["field"], "name");

        // Names are stored as sent, so padded names do not collide
        let (status, body) =
            send(&app, Method::POST, "/store", None, Some(json!({ "name": " Main" }))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["name"], " Main");
        create_store(&app, "Main").await;
    }

    #[tokio::test]
    async fn test_item_routes_require_access_token() {
        let app = app().await;
        let store_id = create_store(&app, "Main").await;
        let item = json!({ "name": "Chair", "price": 15.99, "store_id": store_id });

        let (status, body) = send(&app, Method::POST, "/item", None, Some(item.clone())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "authorization_required");

        let (access, refresh) = login(&app, "admin").await;

        // Refresh tokens are not accepted on access routes
        let (status, body) =
            send(&app, Method::POST, "/item", Some(&refresh), Some(item.clone())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "invalid_token");

        let (status, body) = send(&app, Method::POST, "/item", Some(&access), Some(item)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["store"]["id"], store_id);
        assert!(body.get("store_id").is_none());
    }

    #[tokio::test]
    async fn test_put_item_upserts() {
        let app = app().await;
        let store_id = create_store(&app, "Main").await;
        let (access, _) = login(&app, "admin").await;

        let (status, body) = send(
            &app,
            Method::PUT,
            "/item/5",
            Some(&access),
            Some(json!({ "name": "X", "price": 10.0, "store_id": store_id })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 5);

        let (status, body) = send(
            &app,
            Method::PUT,
            "/item/5",
            Some(&access),
            Some(json!({ "name": "Y", "price": 20.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Y");
        assert_eq!(body["price"], 20.0);

        let (status, body) = send(
            &app,
            Method::PUT,
            "/item/6",
            Some(&access),
            Some(json!({ "name": "Z", "price": 1.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["errors"][0]["field"], "store_id");
    }

    #[tokio::test]
    async fn test_only_admin_deletes_items() {
        let app = app().await;
        let store_id = create_store(&app, "Main").await;
        let (admin, _) = login(&app, "admin").await;
        let (user, _) = login(&app, "bob").await;

        let (_, body) = send(
            &app,
            Method::POST,
            "/item",
            Some(&user),
            Some(json!({ "name": "Chair", "price": 1.5, "store_id": store_id })),
        )
        .await;
        let uri = format!("/item/{}", body["id"]);

        let (status, _) = send(&app, Method::DELETE, &uri, Some(&user), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let (status, _) = send(&app, Method::GET, &uri, None, None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, Method::DELETE, &uri, Some(&admin), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, Method::GET, &uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_tag_link_flow() {
        let app = app().await;
        let store_a = create_store(&app, "A").await;
        let store_b = create_store(&app, "B").await;
        let (access, _) = login(&app, "admin").await;

        let (_, item) = send(
            &app,
            Method::POST,
            "/item",
            Some(&access),
            Some(json!({ "name": "Chair", "price": 5.0, "store_id": store_a })),
        )
        .await;
        let (status, tag) = send(
            &app,
            Method::POST,
            &format!("/store/{store_a}/tag"),
            None,
            Some(json!({ "name": "sale" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let (_, foreign) = send(
            &app,
            Method::POST,
            &format!("/store/{store_b}/tag"),
            None,
            Some(json!({ "name": "other" })),
        )
        .await;

        let link = format!("/item/{}/tag/{}", item["id"], tag["id"]);
        let (status, body) = send(&app, Method::POST, &link, None, None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["items"][0]["name"], "Chair");

        let cross = format!("/item/{}/tag/{}", item["id"], foreign["id"]);
        let (status, _) = send(&app, Method::POST, &cross, None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let tag_uri = format!("/tag/{}", tag["id"]);
        let (status, body) = send(&app, Method::DELETE, &tag_uri, None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 400);

        let (status, body) = send(&app, Method::DELETE, &link, None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Item removed from tag");

        let (status, _) = send(&app, Method::DELETE, &link, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(&app, Method::DELETE, &tag_uri, None, None).await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(body["message"], "Tag deleted");
    }

    #[tokio::test]
    async fn test_logout_revokes_token() {
        let app = app().await;
        let (access, refresh) = login(&app, "admin").await;

        let (status, _) = send(&app, Method::POST, "/logout", Some(&access), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, Method::POST, "/logout", Some(&access), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "token_revoked");

        // The refresh token was not revoked
        let (status, body) = send(&app, Method::POST, "/refresh", Some(&refresh), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["access_token"].is_string());
    }

    #[tokio::test]
    async fn test_user_routes() {
        let app = app().await;
        login(&app, "admin").await;

        let (status, body) = send(&app, Method::GET, "/user/1", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], "admin");
        assert!(body.get("password").is_none());

        let creds = json!({ "username": "admin", "password": "x" });
        let (status, _) = send(&app, Method::POST, "/register", None, Some(creds.clone())).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = send(&app, Method::POST, "/login", None, Some(creds)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&app, Method::DELETE, "/user/1", None, None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, Method::GET, "/user/1", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
