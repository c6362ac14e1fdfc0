// src/utils/gate.rs

use axum::extract::{FromRef, FromRequest, Request};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    error::AppError,
    models::user::{AdminCredentials, Role, UserDirectory},
    state::UserStore,
    utils::{body::JsonBody, hash::check_password},
};

pub const ADMIN_AUTH_REQUIRED: &str = "admin auth required";

/// Whether `creds` name an existing admin account with a matching password.
///
/// Pure: takes the directory as an argument so it can be checked without a
/// running server.
pub fn is_admin(creds: &AdminCredentials, users: &UserDirectory) -> bool {
    let (Some(login), Some(password)) = (&creds.admin_login, &creds.admin_password) else {
        return false;
    };
    if login.is_empty() || password.is_empty() {
        return false;
    }

    users
        .get(login)
        .is_some_and(|user| user.role == Role::Admin && check_password(password, &user.password))
}

/// Payload of admin operations that take no arguments.
#[derive(Debug, Default, Deserialize)]
pub struct NoPayload {}

/// Axum Extractor: Admin Authorization.
///
/// Reads the JSON body, checks the embedded `admin_login`/`admin_password`
/// against the user directory, and only then reads the operation's payload
/// from the same body. Rejects with 403 Forbidden when the check fails,
/// whatever the rest of the body holds.
#[derive(Debug)]
pub struct Admin<T>(pub T);

impl<S, T> FromRequest<S> for Admin<T>
where
    S: Send + Sync,
    UserStore: FromRef<S>,
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let JsonBody(body) = JsonBody::<Value>::from_request(req, state).await?;

        // Credentials of the wrong type authorize nothing.
        let credentials = AdminCredentials::deserialize(&body).unwrap_or_default();

        let users = UserStore::from_ref(state);
        let authorized = users.read(|dir| is_admin(&credentials, dir)).await;

        if !authorized {
            tracing::warn!(
                "Rejected admin request for login {:?}",
                credentials.admin_login.as_deref().unwrap_or("")
            );
            return Err(AppError::Forbidden(ADMIN_AUTH_REQUIRED.to_string()));
        }

        let payload = T::deserialize(body).map_err(|e| AppError::BadRequest(e.to_string()))?;

        Ok(Admin(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::user::UserRecord, utils::hash::hash_password};

    fn directory() -> UserDirectory {
        let mut users = UserDirectory::new();
        users.insert(
            "admin".into(),
            UserRecord {
                password: hash_password("admin123").unwrap(),
                role: Role::Admin,
            },
        );
        users.insert(
            "legacy".into(),
            UserRecord {
                password: "plain".into(),
                role: Role::Admin,
            },
        );
        users.insert(
            "ivan".into(),
            UserRecord {
                password: "ivanpass".into(),
                role: Role::Student,
            },
        );
        users
    }

    fn creds(login: Option<&str>, password: Option<&str>) -> AdminCredentials {
        AdminCredentials {
            admin_login: login.map(String::from),
            admin_password: password.map(String::from),
        }
    }

    #[test]
    fn admins_with_matching_password_pass() {
        let users = directory();

        assert!(is_admin(&creds(Some("admin"), Some("admin123")), &users));
        assert!(is_admin(&creds(Some("legacy"), Some("plain")), &users));
    }

    #[test]
    fn everything_else_is_rejected() {
        let users = directory();

        assert!(!is_admin(&creds(Some("admin"), Some("wrong")), &users));
        assert!(!is_admin(&creds(Some("ivan"), Some("ivanpass")), &users));
        assert!(!is_admin(&creds(Some("ghost"), Some("admin123")), &users));
        assert!(!is_admin(&creds(Some(""), Some("")), &users));
        assert!(!is_admin(&creds(None, Some("admin123")), &users));
        assert!(!is_admin(&creds(Some("admin"), None), &users));
    }
}
