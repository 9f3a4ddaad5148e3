#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use dreamswide_auth::api::{app, AppState};
use dreamswide_auth::entity::principal::Role;
use dreamswide_auth::migration::{Migrator, MigratorTrait};
use dreamswide_auth::password::hash_password;
use dreamswide_auth::principal_store::UpsertPrincipal;
use dreamswide_auth::{AuthConfig, AuthService};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::Value;
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = "admin@dreamswide.et";
pub const ADMIN_PASSWORD: &str = "admin123";

pub struct TestApp {
    pub db: DatabaseConnection,
    pub auth: AuthService,
    pub router: Router,
}

/// In-memory SQLite with migrations applied and the default admin seeded.
pub async fn setup() -> TestApp {
    // A single pooled connection keeps the in-memory database alive and shared
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    let config = AuthConfig::from_lookup(|key| match key {
        "DATABASE_URL" => Some("sqlite::memory:".to_string()),
        _ => None,
    })
    .unwrap();

    let auth = AuthService::from_connection(db.clone(), &config);
    auth.seed_admin(&config.admin).await.unwrap();

    let router = app(AppState::new(auth.clone()));
    TestApp { db, auth, router }
}

impl TestApp {
    pub async fn add_principal(&self, email: &str, password: &str, role: Role) -> i32 {
        self.auth
            .principals()
            .upsert(UpsertPrincipal {
                email: email.to_string(),
                name: format!("{role} account"),
                password_hash: hash_password(password).unwrap(),
                role,
            })
            .await
            .unwrap()
            .id
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    pub async fn post_json(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn with_bearer(&self, method: Method, path: &str, token: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// Logs in and returns the issued session token.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .post_json(
                "/api/auth/login",
                serde_json::json!({ "email": email, "password": password }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["user"]["sessionToken"].as_str().unwrap().to_string()
    }
}
