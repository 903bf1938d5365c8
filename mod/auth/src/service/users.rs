use chirp_core::{is_valid_id, new_id, now_rfc3339, Author, AuthorDirectory, ServiceError};
use chirp_sql::Value;

use crate::model::{AuthPayload, LoginInput, PublicUser, RegisterInput, User};
use crate::service::{credentials, AuthService};

impl AuthService {
    /// Register a new user and issue a token.
    ///
    /// Duplicate checks run before the insert so the offending field is
    /// named; the UNIQUE constraints remain the authoritative gate and a
    /// constraint violation translates to the same `Duplicate` error.
    pub fn register(&self, input: RegisterInput) -> Result<AuthPayload, ServiceError> {
        let rows = self
            .sql
            .query(
                "SELECT username, email FROM users WHERE username = ?1 OR email = ?2",
                &[
                    Value::Text(input.username.clone()),
                    Value::Text(input.email.clone()),
                ],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        if let Some(row) = rows.first() {
            if row.get_str("email") == Some(input.email.as_str()) {
                return Err(ServiceError::duplicate("email"));
            }
            return Err(ServiceError::duplicate("username"));
        }

        let now = now_rfc3339();
        let user = User {
            id: new_id(),
            username: input.username,
            email: input.email,
            password_hash: credentials::hash_password(&input.password)?,
            bio: None,
            avatar_url: None,
            created_at: now.clone(),
            updated_at: now.clone(),
        };

        let data = serde_json::to_string(&user)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        self.sql
            .exec(
                "INSERT INTO users (id, username, email, data, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                &[
                    Value::Text(user.id.clone()),
                    Value::Text(user.username.clone()),
                    Value::Text(user.email.clone()),
                    Value::Text(data),
                    Value::Text(now),
                ],
            )
            .map_err(|e| ServiceError::from_store(e.to_string()))?;

        tracing::info!(user_id = %user.id, username = %user.username, "user registered");

        let token = self.issue_token(&user)?;
        Ok(AuthPayload {
            token,
            user: user.public(),
        })
    }

    /// Log a user in.
    ///
    /// The failure message never reveals whether the email exists.
    pub fn login(&self, input: LoginInput) -> Result<AuthPayload, ServiceError> {
        let invalid =
            || ServiceError::Unauthenticated("Invalid email or password".to_string());

        let user = self.find_by_email(&input.email)?.ok_or_else(invalid)?;
        if !credentials::verify_password(&input.password, &user.password_hash) {
            return Err(invalid());
        }

        let token = self.issue_token(&user)?;
        Ok(AuthPayload {
            token,
            user: user.public(),
        })
    }

    /// Get a user's public profile by id.
    pub fn get_user(&self, id: &str) -> Result<PublicUser, ServiceError> {
        if !is_valid_id(id) {
            return Err(ServiceError::InvalidId("Invalid user ID".to_string()));
        }
        self.fetch_user(id)?
            .map(|u| u.public())
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))
    }

    pub(crate) fn fetch_user(&self, id: &str) -> Result<Option<User>, ServiceError> {
        let rows = self
            .sql
            .query(
                "SELECT data FROM users WHERE id = ?1",
                &[Value::Text(id.to_string())],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        let Some(row) = rows.first() else {
            return Ok(None);
        };
        let data = row
            .get_str("data")
            .ok_or_else(|| ServiceError::Internal("missing data column".to_string()))?;
        serde_json::from_str(data)
            .map(Some)
            .map_err(|e| ServiceError::Internal(e.to_string()))
    }

    pub(crate) fn find_by_email(&self, email: &str) -> Result<Option<User>, ServiceError> {
        let rows = self
            .sql
            .query(
                "SELECT data FROM users WHERE email = ?1",
                &[Value::Text(email.to_string())],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        let Some(row) = rows.first() else {
            return Ok(None);
        };
        let data = row
            .get_str("data")
            .ok_or_else(|| ServiceError::Internal("missing data column".to_string()))?;
        serde_json::from_str(data)
            .map(Some)
            .map_err(|e| ServiceError::Internal(e.to_string()))
    }
}

impl AuthorDirectory for AuthService {
    fn author(&self, id: &str) -> Result<Option<Author>, ServiceError> {
        Ok(self.fetch_user(id)?.map(|u| Author {
            id: u.id,
            username: u.username,
            avatar_url: u.avatar_url,
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chirp_sql::SqliteStore;

    use super::*;
    use crate::service::AuthConfig;

    fn test_service() -> Arc<AuthService> {
        let sql = Arc::new(SqliteStore::open_in_memory().unwrap());
        AuthService::new(sql, AuthConfig::default()).unwrap()
    }

    fn alice() -> RegisterInput {
        RegisterInput {
            username: "alice".into(),
            email: "alice@x.com".into(),
            password: "password123".into(),
        }
    }

    #[test]
    fn register_issues_token_and_user() {
        let svc = test_service();
        let payload = svc.register(alice()).unwrap();
        assert!(!payload.token.is_empty());
        assert_eq!(payload.user.username, "alice");
        assert_eq!(payload.user.email, "alice@x.com");

        let claims = svc.verify_token(&payload.token).unwrap();
        assert_eq!(claims.user_id, payload.user.id);
    }

    #[test]
    fn duplicate_email_rejected() {
        let svc = test_service();
        svc.register(alice()).unwrap();

        let err = svc
            .register(RegisterInput {
                username: "alice2".into(),
                ..alice()
            })
            .unwrap_err();
        assert_eq!(err.to_string(), "Email already exists");
        assert!(matches!(err, ServiceError::Duplicate(_)));
    }

    #[test]
    fn duplicate_username_rejected() {
        let svc = test_service();
        svc.register(alice()).unwrap();

        let err = svc
            .register(RegisterInput {
                email: "other@x.com".into(),
                ..alice()
            })
            .unwrap_err();
        assert_eq!(err.to_string(), "Username already exists");
        assert!(matches!(err, ServiceError::Duplicate(_)));
    }

    #[test]
    fn login_failures_do_not_reveal_account_existence() {
        let svc = test_service();
        svc.register(alice()).unwrap();

        let wrong_password = svc
            .login(LoginInput {
                email: "alice@x.com".into(),
                password: "password124".into(),
            })
            .unwrap_err();
        let unknown_email = svc
            .login(LoginInput {
                email: "nobody@x.com".into(),
                password: "password123".into(),
            })
            .unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert!(matches!(wrong_password, ServiceError::Unauthenticated(_)));
        assert!(matches!(unknown_email, ServiceError::Unauthenticated(_)));
    }

    #[test]
    fn login_succeeds_with_correct_credentials() {
        let svc = test_service();
        svc.register(alice()).unwrap();

        let payload = svc
            .login(LoginInput {
                email: "alice@x.com".into(),
                password: "password123".into(),
            })
            .unwrap();
        assert_eq!(payload.user.username, "alice");
    }

    #[test]
    fn get_user_checks_id_shape_then_existence() {
        let svc = test_service();
        let payload = svc.register(alice()).unwrap();

        assert!(matches!(
            svc.get_user("not-a-key").unwrap_err(),
            ServiceError::InvalidId(_)
        ));
        assert!(matches!(
            svc.get_user("0123456789abcdef01234567").unwrap_err(),
            ServiceError::NotFound(_)
        ));

        let user = svc.get_user(&payload.user.id).unwrap();
        assert_eq!(user.username, "alice");
    }

    #[test]
    fn public_projection_never_carries_the_digest() {
        let svc = test_service();
        let payload = svc.register(alice()).unwrap();
        let json = serde_json::to_value(&payload.user).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password").is_none());
    }

    #[test]
    fn author_directory_projection() {
        let svc = test_service();
        let payload = svc.register(alice()).unwrap();

        let author = svc.author(&payload.user.id).unwrap().unwrap();
        assert_eq!(author.username, "alice");
        let json = serde_json::to_value(&author).unwrap();
        assert!(json.get("email").is_none());

        assert!(svc.author("0123456789abcdef01234567").unwrap().is_none());
    }
}
