//! Dashboard routes: period aggregates and prediction-vs-actual outcomes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json, Router,
    routing::get,
};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::{middleware::AuthUser, AppState};
use sakiewka_core::dashboard::{period_totals, prediction_outcome};
use sakiewka_db::{repositories::dashboard::DashboardError, DashboardRepository};

/// Creates the dashboard routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/wallets/{wallet_id}/dashboard", get(wallet_dashboard))
        .route(
            "/wallets/{wallet_id}/periods/{period_id}/dashboard",
            get(period_dashboard),
        )
}

/// GET /wallets/{wallet_id}/dashboard - Income/expense sums per period.
async fn wallet_dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(wallet_id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = crate::routes::require_member(&state, wallet_id, auth.user_id()).await {
        return response;
    }

    let dashboard_repo = DashboardRepository::new((*state.db).clone());

    match dashboard_repo.wallet_period_flows(wallet_id).await {
        Ok(flows) => {
            let periods: Vec<serde_json::Value> = flows
                .into_iter()
                .map(|p| {
                    json!({
                        "period_id": p.period_id,
                        "period_name": p.period_name,
                        "incomes_total": p.totals.incomes_total.to_string(),
                        "expenses_total": p.totals.expenses_total.to_string(),
                        "balance": p.totals.balance.to_string()
                    })
                })
                .collect();

            (
                StatusCode::OK,
                Json(json!({
                    "wallet_id": wallet_id,
                    "periods": periods
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to build wallet dashboard");
            map_dashboard_error(&e)
        }
    }
}

/// GET /wallets/{wallet_id}/periods/{period_id}/dashboard - Period aggregates.
///
/// Returns income and expense totals, the per-category breakdown, and the
/// prediction-vs-actual outcome for every predicted expense category.
async fn period_dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((wallet_id, period_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    if let Err(response) = crate::routes::require_member(&state, wallet_id, auth.user_id()).await {
        return response;
    }

    let dashboard_repo = DashboardRepository::new((*state.db).clone());

    let flows = match dashboard_repo.category_flows(wallet_id, period_id).await {
        Ok(flows) => flows,
        Err(e) => {
            error!(error = %e, "Failed to load period flows");
            return map_dashboard_error(&e);
        }
    };

    let inputs = match dashboard_repo.prediction_inputs(wallet_id, period_id).await {
        Ok(inputs) => inputs,
        Err(e) => {
            error!(error = %e, "Failed to load prediction inputs");
            return map_dashboard_error(&e);
        }
    };

    let totals = period_totals(&flows);

    let categories: Vec<serde_json::Value> = flows
        .iter()
        .map(|f| {
            json!({
                "category_id": f.category_id,
                "category_name": f.category_name,
                "kind": f.kind,
                "total": f.total.to_string()
            })
        })
        .collect();

    let predictions: Vec<serde_json::Value> = inputs
        .into_iter()
        .map(prediction_outcome)
        .map(|o| {
            json!({
                "category_id": o.category_id,
                "category_name": o.category_name,
                "predicted": o.predicted.to_string(),
                "actual": o.actual.to_string(),
                "variance": o.variance.to_string(),
                "utilization_percent": o.utilization_percent.to_string(),
                "status": o.status
            })
        })
        .collect();

    (
        StatusCode::OK,
        Json(json!({
            "wallet_id": wallet_id,
            "period_id": period_id,
            "incomes_total": totals.incomes_total.to_string(),
            "expenses_total": totals.expenses_total.to_string(),
            "balance": totals.balance.to_string(),
            "categories": categories,
            "predictions": predictions
        })),
    )
        .into_response()
}

/// Maps dashboard errors to HTTP responses.
fn map_dashboard_error(e: &DashboardError) -> axum::response::Response {
    match e {
        DashboardError::PeriodNotFound(_) => crate::routes::not_found("Period not found"),
        DashboardError::Database(_) => crate::routes::internal_error(),
    }
}
