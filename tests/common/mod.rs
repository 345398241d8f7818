// Shared across integration test binaries; not every binary uses every helper.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    routing::get,
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use gruntex_api::{
    auth::{AuthConfig, AuthService},
    config::AppConfig,
    db,
    events,
    handlers::AppServices,
    notifications::NoopNotifier,
    services::storage::{FileStorage, LocalDiskStorage},
    AppState,
};

/// Test harness: the real router over an in-memory SQLite database with a
/// seeded admin session.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub token: String,
    pub admin_id: Uuid,
    _event_task: tokio::task::JoinHandle<()>,
    _upload_dir: tempfile::TempDir,
}

pub const ADMIN_EMAIL: &str = "admin@gruntex.test";
pub const ADMIN_PASSWORD: &str = "correct-horse-25";

impl TestApp {
    pub async fn new() -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "integration_test_secret_key_that_is_long_enough".to_string(),
            "test".to_string(),
        );
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations");
        let db = Arc::new(pool);

        let (event_sender, event_task) = events::channel(64);

        let auth_service = Arc::new(AuthService::new(
            AuthConfig {
                jwt_secret: cfg.jwt_secret.clone(),
                session_ttl: Duration::from_secs(3600),
            },
            db.clone(),
        ));

        let upload_dir = tempfile::tempdir().expect("tempdir");
        let storage: Arc<dyn FileStorage> = Arc::new(LocalDiskStorage::new(
            upload_dir.path().to_path_buf(),
            "/uploads",
        ));

        let services = AppServices::new(
            db.clone(),
            event_sender.clone(),
            storage,
            Arc::new(NoopNotifier),
        );

        let admin = services
            .users
            .register(
                "Test Admin".to_string(),
                ADMIN_EMAIL.to_string(),
                ADMIN_PASSWORD.to_string(),
            )
            .await
            .expect("failed to seed admin");
        let admin_id = admin.id;

        let token = auth_service
            .issue_token(&admin)
            .expect("failed to issue session token")
            .access_token;

        let state = AppState {
            db,
            config: cfg.clone(),
            auth: auth_service.clone(),
            event_sender,
            services,
        };

        let router = Router::new()
            .route("/health", get(gruntex_api::health_check))
            .nest("/api/v1", gruntex_api::api_v1_routes(&cfg))
            .layer(axum::middleware::from_fn_with_state(
                auth_service,
                |axum::extract::State(auth): axum::extract::State<Arc<AuthService>>,
                 mut req: axum::http::Request<Body>,
                 next: axum::middleware::Next| async move {
                    req.extensions_mut().insert(auth);
                    next.run(req).await
                },
            ))
            .with_state(state.clone());

        Self {
            router,
            state,
            token,
            admin_id,
            _event_task: event_task,
            _upload_dir: upload_dir,
        }
    }

    /// Register a second admin and return their (id, token).
    pub async fn second_admin(&self) -> (Uuid, String) {
        let user = self
            .state
            .services
            .users
            .register(
                "Other Admin".to_string(),
                format!("other-{}@gruntex.test", Uuid::new_v4()),
                "another-pass-99".to_string(),
            )
            .await
            .expect("failed to register second admin");

        let token = self
            .state
            .auth
            .issue_token(&user)
            .expect("failed to issue token")
            .access_token;

        (user.id, token)
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .expect("request"),
            None => builder.body(Body::empty()).expect("request"),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router error");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();

        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, value)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None, None).await
    }

    pub async fn get_authed(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None, Some(&self.token)).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body), None).await
    }

    pub async fn post_authed(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body), Some(&self.token))
            .await
    }

    pub async fn put_authed(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(body), Some(&self.token))
            .await
    }

    pub async fn patch_authed(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PATCH, uri, Some(body), Some(&self.token))
            .await
    }

    pub async fn delete_authed(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None, Some(&self.token))
            .await
    }
}

/// Minimal valid machine payload for the create endpoint.
pub fn machine_payload(name: &str) -> Value {
    serde_json::json!({
        "name": name,
        "power": "25 KM",
        "dig_depth": "2.8 m",
        "weight": "2.2 t",
        "bucket_capacity": "0.06 m³",
        "price": "65000",
    })
}
