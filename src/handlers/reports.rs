use axum::{extract::State, response::Json};
use serde_json::Value;

use crate::error::ApiError;
use crate::reports::{CompletedSummary, DailyBucket, ReportService};
use crate::store::StoreError;
use crate::AppState;

/// Reporting-route policy: log the real store fault, return a fixed
/// domain-level message. These routes never echo store internals.
fn report_fault(context: &'static str) -> impl Fn(StoreError) -> ApiError {
    move |err| {
        tracing::error!("{}: {}", context, err);
        ApiError::internal_server_error(context)
    }
}

/// GET /resources/completed - completed sessions plus settled total
pub async fn completed(State(state): State<AppState>) -> Result<Json<CompletedSummary>, ApiError> {
    let summary = ReportService::new(state.store.clone())
        .completed_summary()
        .await
        .map_err(report_fault("failed to load completed records"))?;
    Ok(Json(summary))
}

/// GET /resources/open - sessions in progress, most recent entry first
pub async fn open(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let records = ReportService::new(state.store.clone())
        .open_vehicles()
        .await
        .map_err(report_fault("failed to load open records"))?;
    Ok(Json(Value::Array(records.into_iter().map(Value::Object).collect())))
}

/// GET /resources/daily-summary - rolling 7-day revenue report
pub async fn daily_summary(
    State(state): State<AppState>,
) -> Result<Json<Vec<DailyBucket>>, ApiError> {
    let report = ReportService::new(state.store.clone())
        .daily_report(chrono::Utc::now())
        .await
        .map_err(report_fault("failed to build the daily summary"))?;
    Ok(Json(report))
}
