//! Handlers for event registration entries.

use axum::response::IntoResponse;
use axum::Json;
use kvp_core::csv_export::{export_entry, CsvOptions, LineEnding};
use kvp_core::error::CoreError;
use kvp_core::registration::{RegistrationEntry, GRADES, REFERRAL_SOURCES, SCHOOLS};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;

/// GET /api/v1/event/options
///
/// Select-box options for the registration form.
pub async fn registration_options() -> Json<DataResponse<serde_json::Value>> {
    Json(DataResponse {
        data: serde_json::json!({
            "schools": SCHOOLS,
            "grades": GRADES,
            "referral_sources": REFERRAL_SOURCES,
        }),
    })
}

/// POST /api/v1/event/entries
///
/// Validate a registration submission and return it as a CSV attachment
/// (header row plus one data row). Entries are never stored.
pub async fn submit_entry(
    Json(payload): Json<serde_json::Value>,
) -> AppResult<impl IntoResponse> {
    let map = payload.as_object().cloned().unwrap_or_default();
    let entry = RegistrationEntry::from_map(&map);

    let errors = entry.validate();
    if !errors.is_empty() {
        return Err(AppError::Core(CoreError::invalid(errors)));
    }

    let csv = export_entry(
        &entry,
        chrono::Utc::now(),
        &CsvOptions {
            line_ending: LineEnding::Crlf,
        },
    )?;

    tracing::info!(email = %entry.email, "Registration entry exported");

    Ok(axum::response::Response::builder()
        .status(200)
        .header("Content-Type", "text/csv; charset=utf-8")
        .header(
            "Content-Disposition",
            "attachment; filename=\"event-entry.csv\"",
        )
        .body(axum::body::Body::from(csv))
        .unwrap()
        .into_response())
}
