//! Submission handlers for the portal web API.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::Serialize;

use crate::data::{AppendOutcome, Record, SubmissionForm};
use crate::web::error::WebError;
use crate::web::state::WebAppState;

/// Response for an accepted submission.
#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub message: String,
    pub record: Record,
}

/// Validate a form and append it to the submission table.
pub async fn create_submission(
    State(state): State<WebAppState>,
    Json(form): Json<SubmissionForm>,
) -> Result<(StatusCode, Json<SubmissionResponse>), WebError> {
    let record = form.clone().into_record(Utc::now()).map_err(|e| {
        tracing::info!(missing = ?e.missing, invalid = ?e.invalid, "Rejected submission");
        WebError::Validation(e)
    })?;

    let portal = &state.config().portal;
    match state.submissions().append(record.clone()) {
        Ok(AppendOutcome::Appended { total_rows }) => {
            tracing::info!(
                record_id = %record.record_id,
                total_rows,
                "Stored submission"
            );
        }
        Ok(AppendOutcome::RecoveredFromCorruption { quarantined }) => {
            tracing::warn!(
                record_id = %record.record_id,
                quarantined = ?quarantined,
                "Stored submission in a fresh table after discarding an unreadable one"
            );
        }
        Err(e) => {
            return Err(WebError::Persistence {
                message: format!(
                    "Your form was received but there was an issue saving it internally. \
                     Please contact {} and mention this message.",
                    portal.contact_email
                ),
                details: e.to_string(),
                submitted: Box::new(form),
            });
        }
    }

    Ok((
        StatusCode::CREATED,
        Json(SubmissionResponse {
            message: format!(
                "Thank you for submitting your information. \
                 {} will review your details and contact you soon.",
                portal.company_name
            ),
            record,
        }),
    ))
}
