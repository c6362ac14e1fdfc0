// src/handlers/auth.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use validator::Validate;

use crate::{
    error::AppError,
    models::user::{LoginRequest, RegisterRequest, Role, UserRecord},
    state::UserStore,
    utils::{
        body::JsonBody,
        hash::{check_password, hash_password},
    },
};

/// Authenticates a user.
///
/// There are no sessions: a successful login only reports the account's role,
/// and admin operations re-send the credentials with every request.
pub async fn login(
    State(users): State<UserStore>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(login), Some(password)) = (
        payload.login.filter(|l| !l.is_empty()),
        payload.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::BadRequest("login and password required".to_string()));
    };

    let role = users
        .read(|dir| {
            dir.get(&login)
                .filter(|user| check_password(&password, &user.password))
                .map(|user| user.role)
        })
        .await;

    let Some(role) = role else {
        tracing::info!("Failed login for {}", login);
        return Err(AppError::AuthError("invalid credentials".to_string()));
    };

    Ok(Json(json!({
        "ok": true,
        "role": role,
    })))
}

/// Registers a new student account.
///
/// Hashes the password using Argon2 before storing it.
/// Returns 201 Created.
pub async fn register(
    State(users): State<UserStore>,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let hashed_password = hash_password(&payload.password)?;

    users
        .update(|dir| {
            if dir.contains_key(&payload.login) {
                return Err(AppError::Conflict(format!(
                    "Login '{}' already exists",
                    payload.login
                )));
            }
            dir.insert(
                payload.login.clone(),
                UserRecord {
                    password: hashed_password,
                    role: Role::Student,
                },
            );
            Ok(())
        })
        .await?;

    tracing::info!("Registered user {}", payload.login);

    Ok((StatusCode::CREATED, Json(json!({ "ok": true }))))
}
