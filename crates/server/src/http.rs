//! HTTP interface.
//!
//! - `GET /` welcome message
//! - `GET /health` dataset counts
//! - `POST /recommendations` (with or without trailing slash)

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::engine::RecommendationEngine;
use crate::error::RecommendError;
use data_loader::CustomerId;
use similarity::{DEFAULT_MIN_INVENTORY, DEFAULT_TOP_N};

/// Body of `POST /recommendations`
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationBody {
    pub customer_id: i64,
    #[serde(default)]
    pub top_n: Option<i64>,
    #[serde(default)]
    pub min_inventory: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationResponse {
    pub customer_id: i64,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
struct MessageResponse {
    message: &'static str,
}

#[derive(Debug, Clone, Serialize)]
struct HealthResponse {
    status: &'static str,
    companies: usize,
    customers: usize,
    transactions: usize,
    items: usize,
}

/// Error body, `{"detail": "..."}`
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn not_found(customer_id: i64) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            detail: format!("Customer ID {customer_id} not found."),
        }
    }

    fn unprocessable(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            detail: detail.into(),
        }
    }
}

impl From<RecommendError> for ApiError {
    fn from(err: RecommendError) -> Self {
        match err {
            RecommendError::NotFound(customer_id) => Self::not_found(i64::from(customer_id)),
            RecommendError::Pipeline(_) => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                detail: err.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

pub fn router(engine: RecommendationEngine) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/recommendations", post(recommendations))
        .route("/recommendations/", post(recommendations))
        .with_state(engine)
}

async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Welcome to the Wholesale Recommendation API!",
    })
}

async fn health(State(engine): State<RecommendationEngine>) -> Json<HealthResponse> {
    let (companies, customers, transactions) = engine.data_index().counts();
    Json(HealthResponse {
        status: "ok",
        companies,
        customers,
        transactions,
        items: engine.item_matrix().items().len(),
    })
}

pub async fn recommendations(
    State(engine): State<RecommendationEngine>,
    Json(body): Json<RecommendationBody>,
) -> Result<Json<RecommendationResponse>, ApiError> {
    let top_n = body.top_n.unwrap_or(DEFAULT_TOP_N as i64);
    let min_inventory = body.min_inventory.unwrap_or(DEFAULT_MIN_INVENTORY);

    if top_n < 1 {
        return Err(ApiError::unprocessable("top_n must be at least 1"));
    }
    if min_inventory.is_nan() || min_inventory < 0.0 {
        return Err(ApiError::unprocessable("min_inventory must be non-negative"));
    }

    // Ids outside the index's id range cannot be in the dataset
    let Ok(customer_id) = CustomerId::try_from(body.customer_id) else {
        warn!(customer_id = body.customer_id, "Recommendation for unknown customer");
        return Err(ApiError::not_found(body.customer_id));
    };
    let top_n = usize::try_from(top_n).unwrap_or(usize::MAX);

    let recommendations = engine
        .recommend(customer_id, top_n, min_inventory)
        .inspect_err(|err| warn!(customer_id, %err, "Recommendation failed"))?;

    info!(
        customer_id,
        top_n,
        min_inventory,
        returned = recommendations.len(),
        "Served recommendations"
    );

    Ok(Json(RecommendationResponse {
        customer_id: body.customer_id,
        recommendations,
    }))
}
