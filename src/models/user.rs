// src/models/user.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use validator::Validate;

use super::lenient;

/// Account role. Unrecognized role strings load as `Student`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    #[serde(other)]
    Student,
}

/// A stored account, keyed by login in the user directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredUser")]
pub struct UserRecord {
    /// Argon2 PHC string, or a plaintext password on legacy records.
    pub password: String,
    pub role: Role,
}

/// On-disk shapes accepted for a user entry.
/// Old directories map a login straight to its password.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredUser {
    Record {
        #[serde(default, deserialize_with = "lenient::string")]
        password: String,
        #[serde(default, deserialize_with = "lenient_role")]
        role: Role,
    },
    Password(String),
}

impl From<StoredUser> for UserRecord {
    fn from(stored: StoredUser) -> Self {
        match stored {
            StoredUser::Record { password, role } => UserRecord { password, role },
            StoredUser::Password(password) => UserRecord {
                password,
                role: Role::Student,
            },
        }
    }
}

/// Any role value that is not a known role name loads as `Student`.
fn lenient_role<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Role, D::Error> {
    Ok(Role::deserialize(Value::deserialize(deserializer)?).unwrap_or_default())
}

/// The `users.json` document: login → record.
pub type UserDirectory = BTreeMap<String, UserRecord>;

/// Public projection of an account for the admin user list.
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub role: Role,
}

/// Admin credentials embedded in an admin request body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminCredentials {
    pub admin_login: Option<String>,
    pub admin_password: Option<String>,
}

/// DTO for user login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub login: Option<String>,
    pub password: Option<String>,
}

/// DTO for self-registration.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(
        min = 3,
        max = 50,
        message = "Login length must be between 3 and 50 characters."
    ))]
    pub login: String,
    #[validate(length(
        min = 4,
        max = 128,
        message = "Password length must be between 4 and 128 characters."
    ))]
    pub password: String,
}

/// DTO for an admin creating an account or changing its role.
#[derive(Debug, Deserialize, Validate)]
pub struct UpsertUserRequest {
    pub login: Option<String>,
    #[validate(length(max = 128))]
    pub password: Option<String>,
    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct DeleteUserRequest {
    pub login: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_plaintext_entries_load_as_students() {
        let raw = r#"{
            "ivan": "ivanpass",
            "root": {"password": "x", "role": "admin"},
            "odd": {"password": "y", "role": "teacher"},
            "bare": {},
            "nulls": {"password": null, "role": null}
        }"#;

        let users: UserDirectory = serde_json::from_str(raw).unwrap();

        assert_eq!(
            users["ivan"],
            UserRecord {
                password: "ivanpass".into(),
                role: Role::Student
            }
        );
        assert_eq!(users["root"].role, Role::Admin);
        assert_eq!(users["odd"].role, Role::Student);
        assert_eq!(users["bare"].password, "");
        assert_eq!(users["nulls"].password, "");
        assert_eq!(users["nulls"].role, Role::Student);
    }

    #[test]
    fn records_serialize_in_normalized_form() {
        let mut users = UserDirectory::new();
        users.insert(
            "ivan".into(),
            UserRecord {
                password: "p".into(),
                role: Role::Student,
            },
        );

        let value = serde_json::to_value(&users).unwrap();

        assert_eq!(
            value,
            serde_json::json!({"ivan": {"password": "p", "role": "student"}})
        );
    }
}
