//! Weight history routes.

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use database::weight;
use serde::Deserialize;
use tracing::info;
use tracker_core::{
    clamp_limit, export_csv, NewWeight, PageCursor, WeightPage, WeightRecord, CSV_CONTENT_TYPE,
    EXPORT_FILENAME,
};

use crate::auth::authorize;
use crate::error::{ApiError, Result};
use crate::extract::{ApiJson, ApiQuery};
use crate::state::AppState;

/// Paging parameters for `GET /api/weights`.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
    pub before_date: Option<String>,
    pub before_id: Option<String>,
}

impl ListQuery {
    fn cursor(&self) -> Result<Option<PageCursor>> {
        match (&self.before_date, &self.before_id) {
            (Some(date), Some(id)) => Ok(Some(PageCursor {
                date: date.clone(),
                id: id.clone(),
            })),
            (None, None) => Ok(None),
            _ => Err(ApiError::BadRequest(
                "before_date and before_id must be given together".to_string(),
            )),
        }
    }
}

/// One page of the caller's records, newest first.
pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<WeightPage>> {
    let user_id = authorize(&state, &headers).await?;
    let cursor = query.cursor()?;
    let limit = clamp_limit(query.limit);

    let records = weight::list_weights_page(state.db.pool(), &user_id, cursor.as_ref(), limit).await?;
    Ok(Json(WeightPage::from_records(records, limit)))
}

/// Record the weight for a day, replacing any earlier entry for that day.
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(entry): ApiJson<NewWeight>,
) -> Result<(StatusCode, Json<WeightRecord>)> {
    let user_id = authorize(&state, &headers).await?;
    let record = weight::upsert_weight(state.db.pool(), &user_id, &entry).await?;

    info!(user = %user_id, date = %record.date, "Weight recorded");
    Ok((StatusCode::CREATED, Json(record)))
}

/// Delete one of the caller's records.
pub async fn delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let user_id = authorize(&state, &headers).await?;
    weight::delete_weight(state.db.pool(), &user_id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Download the caller's full history as CSV.
pub async fn export(State(state): State<AppState>, headers: HeaderMap) -> Result<impl IntoResponse> {
    let user_id = authorize(&state, &headers).await?;
    let records = weight::list_weights(state.db.pool(), &user_id).await?;
    let csv = export_csv(&records);

    info!(user = %user_id, rows = records.len(), "Exported weights");
    Ok((
        [
            (header::CONTENT_TYPE, CSV_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", EXPORT_FILENAME),
            ),
        ],
        csv,
    ))
}
