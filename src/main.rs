use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use orgchart_api::database::DatabaseManager;
use orgchart_api::handlers;
use orgchart_api::middleware::jwt_auth_middleware;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    let config = orgchart_api::config::config();

    tracing_subscriber::fmt::init();
    tracing::info!("Starting orgchart API in {:?} mode", config.environment);

    let pool = DatabaseManager::pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("ORGCHART_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("orgchart API listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;

    DatabaseManager::close().await;
    Ok(())
}

fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_routes())
        // Protected
        .merge(user_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn auth_routes() -> Router {
    use handlers::auth;

    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
}

fn user_routes() -> Router {
    use handlers::users;

    Router::new()
        .route("/user/:id", get(users::list_visible).put(users::update_boss))
        .layer(from_fn(jwt_auth_middleware))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Orgchart API",
            "version": version,
            "description": "Identity and organizational-hierarchy API with role-scoped visibility",
            "endpoints": {
                "home": "/ (public)",
                "auth": "/auth/register, /auth/login (public - account creation and token acquisition)",
                "users": "/user/:id (protected - subtree visibility and boss reassignment)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
