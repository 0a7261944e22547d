//! Admin table handlers for the portal web API.
//!
//! Every route here takes an [`AdminGate`], which only checks for
//! `?admin=true` in the query string. That hides the view from casual
//! visitors; it is not authentication.

use std::collections::{BTreeSet, HashSet};

use axum::{
    extract::{FromRequestParts, Query, State},
    http::{header, request::Parts},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::data::{Record, COLUMNS};
use crate::web::error::WebError;
use crate::web::state::WebAppState;

/// Message shown when there is nothing to list.
pub const EMPTY_MESSAGE: &str = "No submissions have been recorded yet.";

#[derive(Debug, Default, Deserialize)]
struct AdminQuery {
    admin: Option<String>,
}

/// Extractor that lets a request through only with `?admin=true`.
///
/// Anything else answers 404 so the admin routes look absent.
#[derive(Debug, Clone, Copy)]
pub struct AdminGate;

impl<S> FromRequestParts<S> for AdminGate
where
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let enabled = Query::<AdminQuery>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(q)| q.admin)
            .is_some_and(|flag| is_truthy(&flag));

        if enabled {
            Ok(AdminGate)
        } else {
            Err(WebError::NotFound(parts.uri.path().to_string()))
        }
    }
}

fn is_truthy(flag: &str) -> bool {
    matches!(
        flag.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes"
    )
}

/// One row of the admin table with its current position.
#[derive(Debug, Serialize)]
pub struct AdminRow {
    pub position: usize,
    #[serde(flatten)]
    pub record: Record,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TableStatus {
    Ok,
    Empty,
}

/// Response for listing the admin table.
#[derive(Debug, Serialize)]
pub struct AdminTableResponse {
    pub status: TableStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub columns: &'static [&'static str],
    pub rows: Vec<AdminRow>,
    /// Unreadable tables moved aside by earlier submissions.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub quarantined_files: Vec<String>,
}

/// Request to delete rows, by position in the current table or by id.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeleteSubmissionsRequest {
    pub positions: Option<BTreeSet<usize>>,
    pub ids: Option<HashSet<Uuid>>,
}

#[derive(Debug, Serialize)]
pub struct DeleteSubmissionsResponse {
    pub deleted: usize,
    pub remaining: usize,
}

/// List every stored submission.
pub async fn list_submissions(
    _gate: AdminGate,
    State(state): State<WebAppState>,
) -> Result<Json<AdminTableResponse>, WebError> {
    let admin = state.admin();
    let quarantined_files = admin
        .quarantined_files()
        .into_iter()
        .map(|p| p.display().to_string())
        .collect();

    let table = admin.load()?.unwrap_or_default();
    if table.is_empty() {
        return Ok(Json(AdminTableResponse {
            status: TableStatus::Empty,
            message: Some(EMPTY_MESSAGE),
            columns: &COLUMNS,
            rows: Vec::new(),
            quarantined_files,
        }));
    }

    Ok(Json(AdminTableResponse {
        status: TableStatus::Ok,
        message: None,
        columns: &COLUMNS,
        rows: table
            .into_rows()
            .into_iter()
            .enumerate()
            .map(|(position, record)| AdminRow { position, record })
            .collect(),
        quarantined_files,
    }))
}

/// Delete the selected submissions and rewrite the table.
pub async fn delete_submissions(
    _gate: AdminGate,
    State(state): State<WebAppState>,
    Json(req): Json<DeleteSubmissionsRequest>,
) -> Result<Json<DeleteSubmissionsResponse>, WebError> {
    let admin = state.admin();

    let (before, after) = match (req.positions, req.ids) {
        (Some(_), Some(_)) => {
            return Err(WebError::BadRequest(
                "Send either positions or ids, not both".to_string(),
            ));
        }
        (None, None) => {
            return Err(WebError::BadRequest(
                "Either positions or ids is required".to_string(),
            ));
        }
        (Some(positions), None) => {
            let snapshot = admin.load()?.unwrap_or_default();
            if snapshot.is_empty() && !positions.is_empty() {
                return Err(WebError::BadRequest(EMPTY_MESSAGE.to_string()));
            }
            let after = admin.delete(&snapshot, &positions)?;
            (snapshot.len(), after.len())
        }
        (None, Some(ids)) => {
            let before = admin.load()?.map(|t| t.len()).unwrap_or(0);
            let after = admin.delete_ids(&ids)?;
            (before, after.len())
        }
    };

    Ok(Json(DeleteSubmissionsResponse {
        deleted: before.saturating_sub(after),
        remaining: after,
    }))
}

/// Download the whole table as CSV.
pub async fn download_submissions(
    _gate: AdminGate,
    State(state): State<WebAppState>,
) -> Result<impl IntoResponse, WebError> {
    let bytes = state.admin().export()?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        state.config().portal.download_filename.replace('"', "")
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}
