//! HTTP endpoint handlers
//!
//! Every handler forwards one trigger into the controller event loop and
//! reports the post-action snapshot. Actions that are no-ops for the current
//! mode still answer 200 with the unchanged view; the only error cases are a
//! gone controller loop.

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, http::StatusCode, response::Json};
use tokio::sync::oneshot;
use tracing::error;

use crate::controller::{ControllerEvent, StatusSnapshot, UserAction};

use super::responses::{ActionResponse, DraftRequest, HealthResponse, PresetRequest, StatusResponse};
use super::ApiContext;

/// Forward a user action into the controller loop and wait for its snapshot.
async fn send_action(ctx: &ApiContext, action: UserAction) -> Result<StatusSnapshot, StatusCode> {
    let (reply, reply_rx) = oneshot::channel();
    ctx.events_tx
        .send(ControllerEvent::Action { action, reply })
        .await
        .map_err(|_| {
            error!("Controller loop is gone, rejecting action");
            StatusCode::SERVICE_UNAVAILABLE
        })?;
    reply_rx.await.map_err(|_| {
        error!("Controller dropped the reply channel");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Handle POST /dismiss - "Later" on the reminder card
pub async fn dismiss_handler(
    State(ctx): State<Arc<ApiContext>>,
) -> Result<Json<ActionResponse>, StatusCode> {
    let view = send_action(&ctx, UserAction::Dismiss).await?;
    Ok(Json(ActionResponse::applied(
        "Reminder dismissed until the next interval".to_string(),
        view,
    )))
}

/// Handle POST /drink - "I Drank Water" on the reminder card
pub async fn drink_handler(
    State(ctx): State<Arc<ApiContext>>,
) -> Result<Json<ActionResponse>, StatusCode> {
    let view = send_action(&ctx, UserAction::Drink).await?;
    Ok(Json(ActionResponse::applied(
        "Water intake recorded".to_string(),
        view,
    )))
}

/// Handle POST /close - close request from the startup screen
pub async fn close_handler(
    State(ctx): State<Arc<ApiContext>>,
) -> Result<Json<ActionResponse>, StatusCode> {
    let view = send_action(&ctx, UserAction::Close).await?;
    Ok(Json(ActionResponse::applied(
        "Display surface retracted".to_string(),
        view,
    )))
}

/// Handle POST /settings/open - enter the settings screen
pub async fn settings_open_handler(
    State(ctx): State<Arc<ApiContext>>,
) -> Result<Json<ActionResponse>, StatusCode> {
    let view = send_action(&ctx, UserAction::OpenSettings).await?;
    Ok(Json(ActionResponse::applied(
        "Settings opened".to_string(),
        view,
    )))
}

/// Handle PUT /settings/draft - update the unsaved interval draft
pub async fn settings_draft_handler(
    State(ctx): State<Arc<ApiContext>>,
    Json(body): Json<DraftRequest>,
) -> Result<Json<ActionResponse>, StatusCode> {
    let view = send_action(
        &ctx,
        UserAction::UpdateDraft {
            hours: body.hours,
            minutes: body.minutes,
            seconds: body.seconds,
        },
    )
    .await?;
    Ok(Json(ActionResponse::applied(
        "Draft updated".to_string(),
        view,
    )))
}

/// Handle POST /settings/preset - apply a quick preset to the draft
pub async fn settings_preset_handler(
    State(ctx): State<Arc<ApiContext>>,
    Json(body): Json<PresetRequest>,
) -> Result<Json<ActionResponse>, StatusCode> {
    let view = send_action(&ctx, UserAction::ApplyPreset { label: body.label }).await?;
    Ok(Json(ActionResponse::applied(
        "Preset applied".to_string(),
        view,
    )))
}

/// Handle POST /settings/save - persist the draft and leave settings
pub async fn settings_save_handler(
    State(ctx): State<Arc<ApiContext>>,
) -> Result<Json<ActionResponse>, StatusCode> {
    let view = send_action(&ctx, UserAction::SettingsSave).await?;
    Ok(Json(ActionResponse::applied(
        "Settings saved".to_string(),
        view,
    )))
}

/// Handle POST /settings/back - discard the draft and leave settings
pub async fn settings_back_handler(
    State(ctx): State<Arc<ApiContext>>,
) -> Result<Json<ActionResponse>, StatusCode> {
    let view = send_action(&ctx, UserAction::SettingsBack).await?;
    Ok(Json(ActionResponse::applied(
        "Settings closed without saving".to_string(),
        view,
    )))
}

/// Handle GET /status - current view mode and countdown
pub async fn status_handler(
    State(ctx): State<Arc<ApiContext>>,
) -> Result<Json<StatusResponse>, StatusCode> {
    let (reply, reply_rx) = oneshot::channel();
    ctx.events_tx
        .send(ControllerEvent::Query { reply })
        .await
        .map_err(|_| {
            error!("Controller loop is gone, rejecting status query");
            StatusCode::SERVICE_UNAVAILABLE
        })?;
    let view = reply_rx
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(StatusResponse {
        view,
        uptime: format_uptime(ctx.start_time.elapsed()),
        port: ctx.port,
        host: ctx.host.clone(),
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

fn format_uptime(elapsed: Duration) -> String {
    let hours = elapsed.as_secs() / 3600;
    let minutes = (elapsed.as_secs() % 3600) / 60;
    let seconds = elapsed.as_secs() % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}
