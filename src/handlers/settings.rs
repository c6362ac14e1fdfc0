// src/handlers/settings.rs

use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;

use crate::{
    error::AppError,
    models::settings::{Theme, ThemeRequest},
    state::SettingsStore,
    utils::gate::Admin,
};

/// Returns the site settings. Public, so the frontend can style itself before login.
pub async fn get_theme(State(settings): State<SettingsStore>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(settings.snapshot().await))
}

/// Switches the site theme.
/// Admin only.
pub async fn set_theme(
    State(settings): State<SettingsStore>,
    Admin(payload): Admin<ThemeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let theme = payload
        .theme
        .as_deref()
        .and_then(Theme::parse)
        .ok_or_else(|| AppError::BadRequest("invalid theme".to_string()))?;

    settings
        .update(|s| {
            s.theme = theme;
            Ok::<_, AppError>(())
        })
        .await?;

    tracing::info!("Theme set to {:?}", theme);

    Ok(Json(json!({ "ok": true })))
}
