// Admin HTTP API server
//
// Exposes the description-generation endpoint plus the project collection
// and the login/logout pair the admin surface needs.

mod auth;

pub use auth::has_auth_cookie;

use crate::generator::DescriptionGenerator;
use crate::project::Project;
use crate::store::ProjectStore;
use crate::AtelierError;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

/// API server configuration
#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub port: u16,
    pub host: String,
    pub admin_password: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "127.0.0.1".to_string(),
            admin_password: "admin".to_string(),
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("ATELIER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            host: std::env::var("ATELIER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            admin_password: std::env::var("ATELIER_ADMIN_PASSWORD")
                .unwrap_or_else(|_| "admin".to_string()),
        }
    }
}

/// Shared handler state
#[derive(Clone)]
struct ApiState {
    store: Arc<ProjectStore>,
    generator: Arc<dyn DescriptionGenerator>,
    admin_password: String,
}

/// Admin HTTP server
pub struct ApiServer {
    config: ApiConfig,
    store: Arc<ProjectStore>,
    generator: Arc<dyn DescriptionGenerator>,
}

impl ApiServer {
    pub fn new(
        config: ApiConfig,
        store: Arc<ProjectStore>,
        generator: Arc<dyn DescriptionGenerator>,
    ) -> Self {
        Self {
            config,
            store,
            generator,
        }
    }

    /// Build the router; exposed separately so tests can bind to port 0
    pub fn router(&self) -> Router {
        let state = ApiState {
            store: Arc::clone(&self.store),
            generator: Arc::clone(&self.generator),
            admin_password: self.config.admin_password.clone(),
        };

        Router::new()
            .route("/api/generate-description", post(generate_handler))
            .route(
                "/api/projects",
                get(list_projects_handler).put(replace_projects_handler),
            )
            .route("/api/login", post(auth::login_handler))
            .route("/api/logout", post(auth::logout_handler))
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
            .with_state(state)
    }

    /// Bind and serve until the process exits
    pub async fn serve(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let app = self.router();

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        info!(
            target: "api",
            url = %format!("http://{}", addr),
            "Admin API server ready"
        );

        axum::serve(listener, app).await?;
        Ok(())
    }
}

/// Request body for the generation endpoint; `tools` is optional
#[derive(Deserialize)]
struct GenerateRequest {
    title: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    tools: Vec<String>,
}

/// POST /api/generate-description
///
/// 400 when title or type is missing (the backend is never invoked),
/// 500 with a diagnostic when the backend call or JSON extraction fails,
/// 200 with exactly the four parsed fields otherwise. Raw model text never
/// reaches the success response.
async fn generate_handler(
    State(state): State<ApiState>,
    Json(req): Json<GenerateRequest>,
) -> impl IntoResponse {
    let title = req.title.as_deref().unwrap_or("").trim().to_string();
    let kind = req.kind.as_deref().unwrap_or("").trim().to_string();
    if title.is_empty() || kind.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Title and type are required" })),
        );
    }

    match state.generator.generate(&title, &kind, &req.tools).await {
        Ok(generated) => (
            StatusCode::OK,
            Json(serde_json::to_value(&generated).unwrap_or_default()),
        ),
        Err(AtelierError::ValidationError(message)) => {
            (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
        }
        Err(e) => {
            warn!(target: "api", error = %e, "Description generation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Failed to generate description",
                    "details": e.to_string(),
                })),
            )
        }
    }
}

/// GET /api/projects - current collection (public: the portfolio site reads it)
async fn list_projects_handler(State(state): State<ApiState>) -> impl IntoResponse {
    match state.store.load().await {
        Ok(projects) => (StatusCode::OK, Json(serde_json::json!(projects))),
        Err(e) => {
            warn!(target: "api", error = %e, "Failed to load projects");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Failed to load projects",
                    "details": e.to_string(),
                })),
            )
        }
    }
}

/// PUT /api/projects - full-collection replace; requires the auth cookie
async fn replace_projects_handler(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(projects): Json<Vec<Project>>,
) -> impl IntoResponse {
    if !has_auth_cookie(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Unauthorized" })),
        );
    }

    match state.store.save(&projects).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "count": projects.len() }))),
        Err(e) => {
            warn!(target: "api", error = %e, "Failed to save projects");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Failed to save projects",
                    "details": e.to_string(),
                })),
            )
        }
    }
}
