//! Dashboard summary route.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use database::{settings, weight};
use serde::{Deserialize, Serialize};
use tracker_core::{chart_window, summarize, ChartRange, DashboardSummary, WeightRecord};

use crate::auth::authorize;
use crate::error::{ApiError, Result};
use crate::extract::ApiQuery;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub range: Option<String>,
}

/// Dashboard figures plus chart points.
#[derive(Serialize)]
pub struct Dashboard {
    pub range: ChartRange,
    /// `None` until the user has saved settings.
    pub summary: Option<DashboardSummary>,
    /// Oldest first.
    pub chart: Vec<WeightRecord>,
}

pub async fn dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiQuery(query): ApiQuery<DashboardQuery>,
) -> Result<Json<Dashboard>> {
    let user_id = authorize(&state, &headers).await?;
    let range = match query.range.as_deref() {
        Some(range) => range
            .parse::<ChartRange>()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?,
        None => ChartRange::default(),
    };

    let pool = state.db.pool();
    let records = weight::list_weights(pool, &user_id).await?;
    let settings = settings::get_settings(pool, &user_id).await?;

    let summary = settings.map(|s| summarize(&records, s.height, s.target_weight));
    let chart = chart_window(&records, range);

    Ok(Json(Dashboard {
        range,
        summary,
        chart,
    }))
}
