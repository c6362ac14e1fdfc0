// src/handlers/admin.rs

use std::collections::BTreeMap;

use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;
use validator::Validate;

use crate::{
    error::AppError,
    models::user::{DeleteUserRequest, Role, UpsertUserRequest, UserRecord, UserSummary},
    state::UserStore,
    utils::{
        gate::{Admin, NoPayload},
        hash::hash_password,
    },
};

/// Lists every account with its role. Passwords are never returned.
/// Admin only.
pub async fn list_users(
    State(users): State<UserStore>,
    Admin(_): Admin<NoPayload>,
) -> Result<impl IntoResponse, AppError> {
    let summaries: BTreeMap<String, UserSummary> = users
        .read(|dir| {
            dir.iter()
                .map(|(login, user)| (login.clone(), UserSummary { role: user.role }))
                .collect()
        })
        .await;

    Ok(Json(summaries))
}

/// Creates an account, resets its password, or changes its role.
///
/// * With a password: the account is (re)written with the new hash and role.
/// * Without one: only the role of an existing account changes.
///
/// Admin only.
pub async fn upsert_user(
    State(users): State<UserStore>,
    Admin(payload): Admin<UpsertUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let login = payload
        .login
        .filter(|l| !l.is_empty())
        .ok_or_else(|| AppError::BadRequest("login required".to_string()))?;

    let hashed_password = match payload.password.as_deref().filter(|p| !p.is_empty()) {
        Some(password) => Some(hash_password(password)?),
        None => None,
    };
    let role = payload.role;

    users
        .update(|dir| {
            match hashed_password {
                Some(password) => {
                    dir.insert(login.clone(), UserRecord { password, role });
                }
                None => {
                    let existing = dir.get_mut(&login).ok_or_else(|| {
                        AppError::BadRequest("password required for new user".to_string())
                    })?;
                    existing.role = role;
                }
            }
            Ok::<_, AppError>(())
        })
        .await?;

    tracing::info!("Saved user {} with role {:?}", login, role);

    Ok(Json(json!({ "ok": true })))
}

/// Deletes an account. The last remaining admin cannot be deleted.
/// Admin only.
pub async fn delete_user(
    State(users): State<UserStore>,
    Admin(payload): Admin<DeleteUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let not_found = || AppError::NotFound("user not found".to_string());
    let login = payload.login.filter(|l| !l.is_empty()).ok_or_else(not_found)?;

    users
        .update(|dir| {
            let user = dir.get(&login).ok_or_else(not_found)?;

            if user.role == Role::Admin {
                let admins = dir.values().filter(|u| u.role == Role::Admin).count();
                if admins <= 1 {
                    return Err(AppError::BadRequest(
                        "cannot delete the last admin".to_string(),
                    ));
                }
            }

            dir.remove(&login);
            Ok(())
        })
        .await?;

    tracing::info!("Deleted user {}", login);

    Ok(Json(json!({ "ok": true })))
}
