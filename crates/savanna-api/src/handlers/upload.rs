//! Upload signature endpoint.

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;
use savanna_core::constants::UPLOAD_FOLDER;
use savanna_core::issue_signature;
use savanna_core::models::UploadSignature;

use crate::auth::AdminContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

/// Issues a signature for one direct upload into the fixed upload folder.
/// The API secret never appears in the response.
#[utoipa::path(
    get,
    path = "/api/upload/sign",
    tag = "upload",
    responses(
        (status = 200, description = "Signature issued", body = UploadSignature),
        (status = 401, description = "Not authorized", body = ErrorResponse),
        (status = 503, description = "Media host not configured", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[tracing::instrument(skip(state, admin), fields(admin = %admin.username))]
pub async fn sign_upload(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
) -> Result<impl IntoResponse, HttpAppError> {
    let signature = issue_signature(
        state.config.vendor.as_ref(),
        UPLOAD_FOLDER,
        Utc::now().timestamp(),
    )?;
    tracing::debug!(timestamp = signature.timestamp, "Issued upload signature");
    Ok(Json(signature))
}
