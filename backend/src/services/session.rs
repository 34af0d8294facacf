//! Session management for user accounts
//!
//! Orchestrates registration, login, logout, token refresh, password
//! change, profile updates and verified self-deletion against the
//! credential store and the token issuer.
//!
//! # Performance
//!
//! Password hashing and verification run on the blocking thread pool;
//! token operations use the pre-computed keys from AppState.

use crate::auth::{JwtService, PasswordService};
use crate::error::ApiError;
use crate::repositories::{NewUser, UserPatch, UserRecord, UserStore};
use blackboard_shared::types::{PublicUser, RegisterRequest, UserSummary};
use uuid::Uuid;

/// Tokens and profile returned by register and login
#[derive(Debug, Clone)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub user: PublicUser,
}

fn public_projection(user: &UserRecord) -> PublicUser {
    PublicUser {
        name: user.name.clone(),
        email: user.email.clone(),
        role: user.role.clone(),
        image: user.image.clone(),
        designation: user.designation.clone(),
    }
}

/// Session operations
pub struct SessionService;

impl SessionService {
    /// Register a new user
    ///
    /// The refresh token is issued first and persisted with the record,
    /// so a freshly registered user can refresh immediately.
    pub async fn register(
        store: &dyn UserStore,
        jwt: &JwtService,
        req: RegisterRequest,
    ) -> Result<SessionTokens, ApiError> {
        if store
            .email_exists(&req.email)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(ApiError::Conflict(
                "User with the same email already exists. Please choose a different email."
                    .to_string(),
            ));
        }

        // Hash password on the blocking thread pool (CPU-intensive)
        let password_hash = PasswordService::hash_async(req.password)
            .await
            .map_err(ApiError::Internal)?;

        let refresh_token = jwt
            .issue_refresh_token(&req.name, &req.email)
            .map_err(ApiError::Internal)?;

        let user = store
            .create(NewUser {
                name: req.name,
                email: req.email,
                password_hash,
                role: req.role,
                image: req.image,
                designation: req.designation,
                refresh_token: Some(refresh_token.clone()),
            })
            .await
            .map_err(ApiError::Internal)?;

        let access_token = jwt
            .issue_access_token(user.id, &user.email)
            .map_err(ApiError::Internal)?;

        Ok(SessionTokens {
            access_token,
            refresh_token,
            user: public_projection(&user),
        })
    }

    /// Login with email and password
    ///
    /// The stored refresh token is overwritten, invalidating any
    /// previously issued one. The failure message never reveals whether
    /// the email or the password was wrong.
    pub async fn login(
        store: &dyn UserStore,
        jwt: &JwtService,
        email: &str,
        password: &str,
    ) -> Result<SessionTokens, ApiError> {
        let user = store
            .find_by_email(email)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

        let valid = PasswordService::verify_async(password.to_string(), user.password_hash.clone())
            .await
            .map_err(ApiError::Internal)?;

        if !valid {
            return Err(ApiError::Unauthorized(
                "Invalid email or password".to_string(),
            ));
        }

        let access_token = jwt
            .issue_access_token(user.id, &user.email)
            .map_err(ApiError::Internal)?;
        let refresh_token = jwt
            .issue_refresh_token(&user.name, &user.email)
            .map_err(ApiError::Internal)?;

        store
            .set_refresh_token(email, Some(&refresh_token))
            .await
            .map_err(ApiError::Internal)?;

        Ok(SessionTokens {
            access_token,
            refresh_token,
            user: public_projection(&user),
        })
    }

    /// Clear the stored refresh token for an email
    ///
    /// Idempotent: repeating the call (or logging out an unknown email)
    /// yields the same end state.
    pub async fn logout(store: &dyn UserStore, email: &str) -> Result<(), ApiError> {
        store
            .set_refresh_token(email, None)
            .await
            .map_err(ApiError::Internal)
    }

    /// Mint a new access token from a presented refresh token
    ///
    /// The token must match a stored record, verify against the refresh
    /// secret, and decode to the same email as that record. The refresh
    /// token itself is not rotated here.
    pub async fn refresh_access_token(
        store: &dyn UserStore,
        jwt: &JwtService,
        refresh_token: &str,
    ) -> Result<String, ApiError> {
        let user = store
            .find_by_refresh_token(refresh_token)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::Forbidden("Forbidden access: User not found".to_string()))?;

        let claims = jwt.verify_refresh_token(refresh_token).map_err(|_| {
            ApiError::Forbidden("Forbidden access: Invalid refresh token".to_string())
        })?;

        if claims.email != user.email {
            return Err(ApiError::Forbidden(
                "Forbidden access: Invalid refresh token".to_string(),
            ));
        }

        jwt.issue_access_token(user.id, &user.email)
            .map_err(ApiError::Internal)
    }

    /// Replace a user's password after verifying the old one
    pub async fn change_password(
        store: &dyn UserStore,
        jwt: &JwtService,
        user_id: Uuid,
        old_password: &str,
        new_password: &str,
    ) -> Result<(String, PublicUser), ApiError> {
        let user = store
            .find_by_id(user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        let valid =
            PasswordService::verify_async(old_password.to_string(), user.password_hash.clone())
                .await
                .map_err(ApiError::Internal)?;

        if !valid {
            return Err(ApiError::Unauthorized("Invalid old password".to_string()));
        }

        let new_hash = PasswordService::hash_async(new_password.to_string())
            .await
            .map_err(ApiError::Internal)?;

        let updated = store
            .set_password_hash(user_id, &new_hash)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        let access_token = jwt
            .issue_access_token(updated.id, &updated.email)
            .map_err(ApiError::Internal)?;

        Ok((access_token, public_projection(&updated)))
    }

    /// Patch profile fields; omitted fields retain their stored values
    pub async fn update_profile(
        store: &dyn UserStore,
        user_id: Uuid,
        patch: UserPatch,
    ) -> Result<PublicUser, ApiError> {
        let updated = store
            .apply_patch(user_id, patch)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        Ok(public_projection(&updated))
    }

    /// Fetch the public projection of a single user
    pub async fn profile(store: &dyn UserStore, user_id: Uuid) -> Result<PublicUser, ApiError> {
        let user = store
            .find_by_id(user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        Ok(public_projection(&user))
    }

    /// Delete a user after verifying email and password
    pub async fn delete_account(
        store: &dyn UserStore,
        email: &str,
        password: &str,
    ) -> Result<(), ApiError> {
        let user = store
            .find_by_email(email)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        let valid = PasswordService::verify_async(password.to_string(), user.password_hash.clone())
            .await
            .map_err(ApiError::Internal)?;

        if !valid {
            return Err(ApiError::Unauthorized("Invalid password".to_string()));
        }

        store.delete(user.id).await.map_err(ApiError::Internal)
    }

    /// List all users as public summaries
    pub async fn list_users(store: &dyn UserStore) -> Result<Vec<UserSummary>, ApiError> {
        let users = store.list().await.map_err(ApiError::Internal)?;

        Ok(users
            .into_iter()
            .map(|u| UserSummary {
                id: u.id,
                name: u.name,
                email: u.email,
                image: u.image,
                designation: u.designation,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemoryUserStore;

    fn jwt() -> JwtService {
        JwtService::new("test-access-secret", "test-refresh-secret", 3600, 604800)
    }

    fn register_request(email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: "A".to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: "admin".to_string(),
            image: None,
            designation: None,
        }
    }

    #[tokio::test]
    async fn test_register_stores_verifiable_hash() {
        let store = MemoryUserStore::new();
        let jwt = jwt();

        SessionService::register(&store, &jwt, register_request("a@x.com", "secret1"))
            .await
            .unwrap();

        let user = store.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_ne!(user.password_hash, "secret1");
        assert!(PasswordService::verify("secret1", &user.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_register_never_returns_password() {
        let store = MemoryUserStore::new();
        let jwt = jwt();

        let session =
            SessionService::register(&store, &jwt, register_request("a@x.com", "secret1"))
                .await
                .unwrap();

        let json = serde_json::to_string(&session.user).unwrap();
        assert!(!json.contains("secret1"));
        assert!(!json.contains("password"));
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts() {
        let store = MemoryUserStore::new();
        let jwt = jwt();

        SessionService::register(&store, &jwt, register_request("a@x.com", "secret1"))
            .await
            .unwrap();
        let err = SessionService::register(&store, &jwt, register_request("a@x.com", "secret2"))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_login_token_identity_matches_user() {
        let store = MemoryUserStore::new();
        let jwt = jwt();

        SessionService::register(&store, &jwt, register_request("a@x.com", "secret1"))
            .await
            .unwrap();
        let session = SessionService::login(&store, &jwt, "a@x.com", "secret1")
            .await
            .unwrap();

        let user = store.find_by_email("a@x.com").await.unwrap().unwrap();
        let claims = jwt.verify_access_token(&session.access_token).unwrap();
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.email, user.email);
    }

    #[tokio::test]
    async fn test_login_rotates_refresh_token() {
        let store = MemoryUserStore::new();
        let jwt = jwt();

        let registered =
            SessionService::register(&store, &jwt, register_request("a@x.com", "secret1"))
                .await
                .unwrap();
        let session = SessionService::login(&store, &jwt, "a@x.com", "secret1")
            .await
            .unwrap();

        let stored = store
            .find_by_email("a@x.com")
            .await
            .unwrap()
            .unwrap()
            .refresh_token;
        assert_eq!(stored.as_deref(), Some(session.refresh_token.as_str()));

        // The token issued at registration no longer matches any record.
        assert!(store
            .find_by_refresh_token(&registered.refresh_token)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_unauthorized_and_no_op() {
        let store = MemoryUserStore::new();
        let jwt = jwt();

        SessionService::register(&store, &jwt, register_request("a@x.com", "secret1"))
            .await
            .unwrap();
        let before = store.find_by_email("a@x.com").await.unwrap().unwrap();

        let err = SessionService::login(&store, &jwt, "a@x.com", "wrong")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));

        let after = store.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(before.password_hash, after.password_hash);
        assert_eq!(before.refresh_token, after.refresh_token);
    }

    #[tokio::test]
    async fn test_login_unknown_email_same_message_as_bad_password() {
        let store = MemoryUserStore::new();
        let jwt = jwt();

        SessionService::register(&store, &jwt, register_request("a@x.com", "secret1"))
            .await
            .unwrap();

        let unknown = SessionService::login(&store, &jwt, "b@x.com", "secret1")
            .await
            .unwrap_err();
        let bad_password = SessionService::login(&store, &jwt, "a@x.com", "wrong")
            .await
            .unwrap_err();

        assert_eq!(unknown.to_string(), bad_password.to_string());
    }

    #[tokio::test]
    async fn test_refresh_after_logout_is_forbidden() {
        let store = MemoryUserStore::new();
        let jwt = jwt();

        SessionService::register(&store, &jwt, register_request("a@x.com", "secret1"))
            .await
            .unwrap();
        let session = SessionService::login(&store, &jwt, "a@x.com", "secret1")
            .await
            .unwrap();

        SessionService::logout(&store, "a@x.com").await.unwrap();

        let err = SessionService::refresh_access_token(&store, &jwt, &session.refresh_token)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_logout_is_idempotent() {
        let store = MemoryUserStore::new();
        let jwt = jwt();

        SessionService::register(&store, &jwt, register_request("a@x.com", "secret1"))
            .await
            .unwrap();

        SessionService::logout(&store, "a@x.com").await.unwrap();
        SessionService::logout(&store, "a@x.com").await.unwrap();

        let user = store.find_by_email("a@x.com").await.unwrap().unwrap();
        assert!(user.refresh_token.is_none());
    }

    #[tokio::test]
    async fn test_refresh_returns_valid_access_token() {
        let store = MemoryUserStore::new();
        let jwt = jwt();

        let session =
            SessionService::register(&store, &jwt, register_request("a@x.com", "secret1"))
                .await
                .unwrap();

        let access = SessionService::refresh_access_token(&store, &jwt, &session.refresh_token)
            .await
            .unwrap();

        let user = store.find_by_email("a@x.com").await.unwrap().unwrap();
        let claims = jwt.verify_access_token(&access).unwrap();
        assert_eq!(claims.sub, user.id.to_string());

        // Refresh does not rotate the stored refresh token.
        let stored = store
            .find_by_email("a@x.com")
            .await
            .unwrap()
            .unwrap()
            .refresh_token;
        assert_eq!(stored.as_deref(), Some(session.refresh_token.as_str()));
    }

    #[tokio::test]
    async fn test_refresh_with_unknown_token_is_forbidden() {
        let store = MemoryUserStore::new();
        let jwt = jwt();

        // Well-formed token that no stored record holds.
        let stray = jwt.issue_refresh_token("A", "a@x.com").unwrap();
        let err = SessionService::refresh_access_token(&store, &jwt, &stray)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_change_password_with_wrong_old_password() {
        let store = MemoryUserStore::new();
        let jwt = jwt();

        SessionService::register(&store, &jwt, register_request("a@x.com", "secret1"))
            .await
            .unwrap();
        let user = store.find_by_email("a@x.com").await.unwrap().unwrap();

        let err = SessionService::change_password(&store, &jwt, user.id, "wrong", "newsecret")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));

        // The stored hash is unchanged.
        let after = store.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(user.password_hash, after.password_hash);
    }

    #[tokio::test]
    async fn test_change_password_success() {
        let store = MemoryUserStore::new();
        let jwt = jwt();

        SessionService::register(&store, &jwt, register_request("a@x.com", "secret1"))
            .await
            .unwrap();
        let user = store.find_by_email("a@x.com").await.unwrap().unwrap();

        let (access, _) =
            SessionService::change_password(&store, &jwt, user.id, "secret1", "newsecret")
                .await
                .unwrap();
        assert!(jwt.verify_access_token(&access).is_ok());

        // Old password no longer logs in; the new one does.
        assert!(SessionService::login(&store, &jwt, "a@x.com", "secret1")
            .await
            .is_err());
        assert!(SessionService::login(&store, &jwt, "a@x.com", "newsecret")
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_change_password_unknown_user_is_not_found() {
        let store = MemoryUserStore::new();
        let jwt = jwt();

        let err =
            SessionService::change_password(&store, &jwt, Uuid::new_v4(), "secret1", "newsecret")
                .await
                .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_profile_name_only_retains_other_fields() {
        let store = MemoryUserStore::new();
        let jwt = jwt();

        let mut req = register_request("a@x.com", "secret1");
        req.image = Some("https://example.com/a.png".to_string());
        req.designation = Some("Principal".to_string());
        SessionService::register(&store, &jwt, req).await.unwrap();
        let user = store.find_by_email("a@x.com").await.unwrap().unwrap();

        let updated = SessionService::update_profile(
            &store,
            user.id,
            UserPatch {
                name: Some("B".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.name, "B");
        assert_eq!(updated.image.as_deref(), Some("https://example.com/a.png"));
        assert_eq!(updated.designation.as_deref(), Some("Principal"));
    }

    #[tokio::test]
    async fn test_delete_account_requires_matching_password() {
        let store = MemoryUserStore::new();
        let jwt = jwt();

        SessionService::register(&store, &jwt, register_request("a@x.com", "secret1"))
            .await
            .unwrap();

        let err = SessionService::delete_account(&store, "a@x.com", "wrong")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));

        SessionService::delete_account(&store, "a@x.com", "secret1")
            .await
            .unwrap();
        assert!(store.find_by_email("a@x.com").await.unwrap().is_none());

        let err = SessionService::delete_account(&store, "a@x.com", "secret1")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_users_excludes_sensitive_fields() {
        let store = MemoryUserStore::new();
        let jwt = jwt();

        SessionService::register(&store, &jwt, register_request("a@x.com", "secret1"))
            .await
            .unwrap();

        let users = SessionService::list_users(&store).await.unwrap();
        assert_eq!(users.len(), 1);

        let json = serde_json::to_string(&users).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("refreshToken"));
    }

    /// Full lifecycle: register, failed login, login, logout, stale refresh.
    #[tokio::test]
    async fn test_session_lifecycle_scenario() {
        let store = MemoryUserStore::new();
        let jwt = jwt();

        SessionService::register(&store, &jwt, register_request("a@x.com", "secret1"))
            .await
            .unwrap();
        let hash = store
            .find_by_email("a@x.com")
            .await
            .unwrap()
            .unwrap()
            .password_hash;
        assert_ne!(hash, "secret1");

        assert!(matches!(
            SessionService::login(&store, &jwt, "a@x.com", "wrong").await,
            Err(ApiError::Unauthorized(_))
        ));

        let session = SessionService::login(&store, &jwt, "a@x.com", "secret1")
            .await
            .unwrap();
        assert!(jwt.verify_access_token(&session.access_token).is_ok());

        SessionService::logout(&store, "a@x.com").await.unwrap();

        assert!(matches!(
            SessionService::refresh_access_token(&store, &jwt, &session.refresh_token).await,
            Err(ApiError::Forbidden(_))
        ));
    }
}
