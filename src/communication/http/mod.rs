use crate::booking::{Conversation, Event};
use crate::communication::error_handler::ChatApiError;
use crate::communication::SessionStore;
use crate::configuration::Context;
use crate::core::service_manager::{Error as ServiceManagerError, Service};
use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;
use uuid::Uuid;

mod payload;

pub use payload::{CreateSessionRequest, SessionView, TextMessageRequest, TurnResponse};

#[derive(Clone)]
pub struct AppState {
    pub conversation: Arc<Conversation>,
    pub sessions: SessionStore,
    pub default_phone: String,
}

pub struct ChatApiService {
    port: u16,
    state: AppState,
}

#[async_trait]
impl Service for ChatApiService {
    type Context = Context;
    const NAME: &'static str = "chat-api";

    async fn new(context: Context) -> Result<Self, ServiceManagerError> {
        Ok(Self {
            port: context.config.http.port,
            state: AppState {
                conversation: context.conversation,
                sessions: context.sessions,
                default_phone: context.config.shop.default_phone,
            },
        })
    }

    async fn run(self) -> Result<(), ServiceManagerError> {
        let app = router(self.state);

        let listener = TcpListener::bind(format!("0.0.0.0:{}", self.port))
            .await
            .map_err(|e| ServiceManagerError::new(&format!("Failed to bind port: {}", e)))?;

        info!("Chat HTTP server running on port {}", self.port);

        axum::serve(listener, app)
            .await
            .map_err(|e| ServiceManagerError::new(&format!("HTTP server error: {}", e)))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/sessions", post(create_session))
        .route("/sessions/{id}", get(get_session))
        .route("/sessions/{id}/messages", post(post_message))
        .route("/sessions/{id}/actions", post(post_action))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}

async fn create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> (StatusCode, Json<TurnResponse>) {
    let id = Uuid::new_v4().to_string();
    let phone = request
        .phone
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| state.default_phone.clone());

    let turn = state.sessions.open(&state.conversation, &id, &phone).await;
    info!(session_id = %id, "HTTP session created");
    (
        StatusCode::CREATED,
        Json(TurnResponse::new(&state.conversation, turn)),
    )
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ChatApiError> {
    let session = state
        .sessions
        .get(&id)
        .await
        .ok_or(ChatApiError::SessionNotFound(id))?;
    Ok(Json(SessionView::new(&state.conversation, &session)))
}

async fn post_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<TextMessageRequest>,
) -> Result<Json<TurnResponse>, ChatApiError> {
    if request.text.trim().is_empty() {
        return Err(ChatApiError::EmptyMessage);
    }
    dispatch(&state, id, Event::Text { text: request.text }).await
}

async fn post_action(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(event): Json<Event>,
) -> Result<Json<TurnResponse>, ChatApiError> {
    dispatch(&state, id, event).await
}

async fn dispatch(
    state: &AppState,
    id: String,
    event: Event,
) -> Result<Json<TurnResponse>, ChatApiError> {
    let turn = state
        .sessions
        .dispatch(&state.conversation, &id, event)
        .await
        .ok_or(ChatApiError::SessionNotFound(id))?;
    Ok(Json(TurnResponse::new(&state.conversation, turn)))
}
