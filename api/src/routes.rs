use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};
use signaldesk_core::entitlement::{resolve_entitlement, Entitlement};
use signaldesk_core::pnl::{aggregate_pnl, PortfolioPnl, Position};
use signaldesk_core::usage::{present_usage, UsageCounts, UsagePresentation};
use uuid::Uuid;

use crate::state::AppState;

type ApiError = (StatusCode, Json<Value>);

fn snapshot_pending() -> ApiError {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({ "error": "user record not fetched yet" })),
    )
}

pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Effective tier and quotas, resolved from the latest user snapshot
/// at request time. Never cached: expiration transitions show up on
/// the next request.
pub async fn entitlement(State(state): State<AppState>) -> Result<Json<Entitlement>, ApiError> {
    let snapshot = state.snapshot.read().await;
    let user = snapshot.user.as_ref().ok_or_else(snapshot_pending)?;
    Ok(Json(resolve_entitlement(user, Utc::now())))
}

/// Quota classification and expiration countdown for the badges.
pub async fn usage(State(state): State<AppState>) -> Result<Json<UsagePresentation>, ApiError> {
    let snapshot = state.snapshot.read().await;
    let user = snapshot.user.as_ref().ok_or_else(snapshot_pending)?;
    let now = Utc::now();
    let entitlement = resolve_entitlement(user, now);
    let counts = UsageCounts {
        ai_used: user.ai_uses_count,
        total_positions: snapshot.positions.len() as u32,
        active_positions: snapshot
            .positions
            .iter()
            .filter(|p| p.status.is_open())
            .count() as u32,
    };
    Ok(Json(present_usage(
        &entitlement,
        &counts,
        user.pro_expires_at,
        now,
    )))
}

/// Live portfolio P/L over the active positions.
pub async fn pnl(State(state): State<AppState>) -> Json<PortfolioPnl> {
    let snapshot = state.snapshot.read().await;
    let active: Vec<Position> = snapshot
        .positions
        .iter()
        .filter(|p| p.status.is_open())
        .cloned()
        .collect();
    Json(aggregate_pnl(&active, &snapshot.prices))
}

/// Payload for the shareable summary card.
pub async fn summary(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let snapshot = state.snapshot.read().await;
    let user = snapshot.user.as_ref().ok_or_else(snapshot_pending)?;
    let now = Utc::now();
    let entitlement = resolve_entitlement(user, now);
    let active: Vec<Position> = snapshot
        .positions
        .iter()
        .filter(|p| p.status.is_open())
        .cloned()
        .collect();
    let portfolio = aggregate_pnl(&active, &snapshot.prices);

    Ok(Json(json!({
        "shareId": Uuid::new_v4(),
        "generatedAt": now,
        "effectiveTier": entitlement.effective_tier,
        "positionCount": portfolio.position_count,
        "totalUnrealizedUSD": portfolio.total_unrealized_usd,
        "averagePercentage": portfolio.average_percent,
    })))
}
