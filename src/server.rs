use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

use crate::context::{AppContext, Report};
use crate::error::SatisfactionError;
use crate::form::{survey, FormSpec};
use crate::session::{FormSession, SessionView};
use crate::types::PassengerProfile;

const INDEX_HTML: &str = include_str!("../static/index.html");

#[derive(Clone)]
pub struct AppState {
    pub ctx: AppContext,
    pub session: Arc<Mutex<FormSession>>,
}

impl AppState {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            session: Arc::new(Mutex::new(FormSession::new())),
        }
    }
}

#[derive(Debug)]
pub enum AppError {
    InvalidProfile(String),
    Prediction(SatisfactionError),
}

impl From<SatisfactionError> for AppError {
    fn from(e: SatisfactionError) -> Self {
        match e {
            SatisfactionError::InvalidProfile(msg) => AppError::InvalidProfile(msg),
            other => AppError::Prediction(other),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(r: JsonRejection) -> Self {
        AppError::InvalidProfile(r.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            AppError::InvalidProfile(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::Prediction(e) => {
                tracing::error!("prediction failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "prediction failed".to_string())
            }
        };
        (status, Json(json!({ "error": msg, "status": status.as_u16() }))).into_response()
    }
}

type JsonBody<T> = Result<Json<T>, JsonRejection>;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/form", get(form))
        .route("/api/session", get(session))
        .route("/api/draft", post(draft))
        .route("/api/predict", post(predict))
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    backend: String,
    classes: Vec<String>,
    population: usize,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let c = state.ctx.classifier();
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        backend: c.backend_name().to_string(),
        classes: c.classes().to_vec(),
        population: state.ctx.population().len(),
    })
}

async fn form() -> Json<FormSpec> {
    Json(survey())
}

async fn session(State(state): State<AppState>) -> Json<SessionView> {
    Json(state.session.lock().view())
}

async fn draft(
    State(state): State<AppState>,
    payload: JsonBody<PassengerProfile>,
) -> Result<Json<SessionView>, AppError> {
    let Json(profile) = payload?;
    let mut s = state.session.lock();
    s.observe(&profile);
    Ok(Json(s.view()))
}

async fn predict(
    State(state): State<AppState>,
    payload: JsonBody<PassengerProfile>,
) -> Result<Json<Report>, AppError> {
    let Json(profile) = payload?;
    let report = state.ctx.evaluate(&profile)?;
    tracing::info!(
        "predicted {} ({:.1}%)",
        report.prediction.predicted_category,
        report.prediction.confidence_percentage
    );
    state.session.lock().submit(report.clone());
    Ok(Json(report))
}
