//! Reporting handlers for harvest statistics and data export

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use shared::models::sort_by_cultivation;

use crate::error::AppResult;
use crate::middleware::AuthUser;
use crate::services::reporting::{DashboardMetrics, ReportingService};
use crate::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarvestReportQuery {
    pub lot_id: Option<Uuid>,
    pub format: Option<String>, // "json" or "csv"
    /// "cultivation" orders entries by cultivation name
    pub sort: Option<String>,
}

/// Get dashboard metrics
pub async fn get_dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> AppResult<Json<DashboardMetrics>> {
    let service = ReportingService::new(state.store.clone());
    let metrics = service.get_dashboard_metrics(user.user_id).await?;
    Ok(Json(metrics))
}

/// Get harvest report, for all lots or one lot
pub async fn get_harvest_report(
    State(state): State<AppState>,
    Query(query): Query<HarvestReportQuery>,
) -> AppResult<impl IntoResponse> {
    let service = ReportingService::new(state.store.clone());
    let mut data = service.generate_harvest_report(query.lot_id).await?;

    if query.sort.as_deref() == Some("cultivation") {
        sort_by_cultivation(&mut data);
    }

    if query.format.as_deref() == Some("csv") {
        let csv = ReportingService::export_to_csv(&data)?;
        Ok((
            [
                (header::CONTENT_TYPE, "text/csv"),
                (header::CONTENT_DISPOSITION, "attachment; filename=\"harvest_report.csv\""),
            ],
            csv,
        )
            .into_response())
    } else {
        Ok(Json(data).into_response())
    }
}
