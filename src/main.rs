use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{routing::get, Router};
use http::HeaderValue;
use tokio::signal;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use gruntex_api as api;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = api::config::load_config()?;
    api::config::init_tracing(cfg.log_level(), cfg.log_json);

    let db_pool = api::db::establish_connection_from_app_config(&cfg).await?;
    if cfg.auto_migrate {
        api::db::run_migrations(&db_pool).await?;
    }
    let db = Arc::new(db_pool);

    let (event_sender, _event_task) = api::events::channel(1024);

    let auth_service = Arc::new(api::auth::AuthService::new(
        api::auth::AuthConfig {
            jwt_secret: cfg.jwt_secret.clone(),
            session_ttl: Duration::from_secs(cfg.session_ttl_secs),
        },
        db.clone(),
    ));

    let storage: Arc<dyn api::services::storage::FileStorage> = Arc::new(
        api::services::storage::LocalDiskStorage::new(
            cfg.upload_dir.clone(),
            cfg.upload_base_url.clone(),
        ),
    );

    let notifier: Arc<dyn api::notifications::Notifier> = match &cfg.mail_api_url {
        Some(url) => Arc::new(api::notifications::MailApiNotifier::new(
            url.clone(),
            cfg.mail_api_token.clone(),
        )),
        None => Arc::new(api::notifications::NoopNotifier),
    };

    let services =
        api::handlers::AppServices::new(db.clone(), event_sender.clone(), storage, notifier);

    if let (Some(email), Some(password)) = (&cfg.seed_admin_email, &cfg.seed_admin_password) {
        services
            .users
            .ensure_seed_admin(email, password, "Administrator")
            .await?;
    }

    let app_state = api::AppState {
        db: db.clone(),
        config: cfg.clone(),
        auth: auth_service.clone(),
        event_sender,
        services,
    };

    let cors_layer = match cfg.cors_allowed_origins.as_deref() {
        Some(raw) => {
            let origins: Vec<HeaderValue> = raw
                .split(',')
                .filter_map(|origin| HeaderValue::from_str(origin.trim()).ok())
                .collect();
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(Any)
                .allow_headers(Any)
        }
        None => CorsLayer::permissive(),
    };

    let app = Router::<api::AppState>::new()
        .route("/", get(|| async { "gruntex-api up" }))
        .route("/health", get(api::health_check))
        .nest("/api/v1", api::api_v1_routes(&cfg))
        .merge(api::openapi::swagger_ui())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors_layer)
        // Inject AuthService into request extensions for the session middleware
        .layer(axum::middleware::from_fn_with_state(
            auth_service.clone(),
            |axum::extract::State(auth): axum::extract::State<Arc<api::auth::AuthService>>,
             mut req: axum::http::Request<axum::body::Body>,
             next: axum::middleware::Next| async move {
                req.extensions_mut().insert(auth);
                next.run(req).await
            },
        ))
        .with_state(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    info!("gruntex-api listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install signal handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
