//! `POST /protected`: static allow-list check of a bearer token

use axum::extract::State;
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, warn};

use crate::api::middleware::BearerToken;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};

#[derive(Debug, Serialize)]
pub struct ProtectedResponse {
    pub message: &'static str,
    pub status: &'static str,
    pub data: AccessData,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessData {
    pub timestamp: String,
    pub access_granted: bool,
}

pub async fn protected(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<ProtectedResponse>, ApiError> {
    if !state.allow_list.contains(&token) {
        warn!("Rejected token on /protected");
        return Err(ApiError::unauthorized("invalid api key"));
    }

    debug!("Accepted token on /protected");

    Ok(Json(ProtectedResponse {
        message: "valid api key, /protected can be accessed",
        status: "success",
        data: AccessData {
            timestamp: Utc::now().to_rfc3339(),
            access_granted: true,
        },
    }))
}
