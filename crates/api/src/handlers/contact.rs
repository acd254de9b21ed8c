//! Handlers for the contact form.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use kvp_core::contact::ContactSubmission;
use kvp_core::error::CoreError;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/contact
///
/// Validate a contact submission and forward it to the mail notifier.
/// Delivery is fire-and-forget: failures are logged, not surfaced, and the
/// submission itself is never stored.
pub async fn submit_contact(
    State(state): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let map = payload.as_object().cloned().unwrap_or_default();
    let submission = ContactSubmission::from_map(&map);

    let errors = submission.validate();
    if !errors.is_empty() {
        return Err(AppError::Core(CoreError::invalid(errors)));
    }

    match &state.mailer {
        Some(mailer) => {
            let mailer = Arc::clone(mailer);
            tokio::spawn(async move {
                if let Err(err) = mailer.notify(&submission).await {
                    tracing::error!(error = %err, "Contact notification delivery failed");
                }
            });
        }
        None => {
            tracing::warn!("SMTP not configured; contact submission was validated but not forwarded");
        }
    }

    Ok(Json(DataResponse {
        data: serde_json::json!({ "status": "accepted" }),
    }))
}
