use serde::{Deserialize, Serialize};

/// A user identity record, as stored in the `users` table's JSON column.
///
/// This shape includes the password digest and must never be serialized
/// to a client — responses go through [`PublicUser`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier (24-char hex key).
    pub id: String,

    /// Unique handle, 3–30 chars, alphanumeric + underscore.
    pub username: String,

    /// Unique email, stored lowercased.
    pub email: String,

    /// Argon2id digest of the password.
    pub password_hash: String,

    /// Profile bio, at most 160 chars.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,

    /// Avatar URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,

    /// RFC 3339 creation timestamp.
    pub created_at: String,

    /// RFC 3339 last update timestamp.
    pub updated_at: String,
}

impl User {
    /// Client-facing projection. Drops the password digest.
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            bio: self.bio.clone(),
            avatar_url: self.avatar_url.clone(),
            created_at: self.created_at.clone(),
        }
    }
}

/// What clients see of a user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub created_at: String,
}

/// Validated registration input.
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub username: String,
    /// Already lowercased by the validation layer.
    pub email: String,
    pub password: String,
}

/// Validated login input.
#[derive(Debug, Clone)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// JWT claims: the caller's identity plus the standard time fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// Payload returned by register and login: a token plus the user.
#[derive(Debug, Serialize)]
pub struct AuthPayload {
    pub token: String,
    pub user: PublicUser,
}
