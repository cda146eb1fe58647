use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::users::repo_types::User;

/// Request body for user registration. Fields missing from the JSON body
/// deserialize as empty strings and fail the blank-field check.
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// How a login was performed.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AuthMethod {
    #[default]
    Password,
    Provider,
}

/// Request body for identity-provider login, built from the profile the
/// provider popup returned.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProviderLoginRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub auth_method: AuthMethod,
}

/// Partial profile update; absent fields are left unchanged.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub photo: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
}

/// Public part of the user returned to the client. Responses are built
/// through this type so the password hash can never reach the wire, even
/// if the record grows new fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafeUser {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub photo: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
}

impl From<User> for SafeUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            photo: user.photo,
            phone: user.phone,
            bio: user.bio,
        }
    }
}

/// Simple message payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password_hash: "$argon2id$fake".into(),
            photo: None,
            phone: Some("555-0100".into()),
            bio: None,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn safe_user_never_carries_password() {
        let safe = SafeUser::from(sample_user());
        let json = serde_json::to_string(&safe).unwrap();
        assert!(json.contains("\"_id\""));
        assert!(json.contains("ada@example.com"));
        assert!(!json.contains("password"));
        assert!(!json.contains("argon2"));
    }

    #[test]
    fn user_record_skips_hash_when_serialized() {
        let json = serde_json::to_string(&sample_user()).unwrap();
        assert!(!json.contains("password_hash"));
    }

    #[test]
    fn auth_method_marker_is_lowercase() {
        let json = serde_json::to_string(&AuthMethod::Provider).unwrap();
        assert_eq!(json, "\"provider\"");
    }

    #[test]
    fn register_request_defaults_missing_fields_to_blank() {
        let req: RegisterRequest = serde_json::from_str(r#"{"email":"a@b.co"}"#).unwrap();
        assert!(req.name.is_empty());
        assert!(req.password.is_empty());
        assert_eq!(req.email, "a@b.co");
    }
}
