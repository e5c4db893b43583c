use arena_core::{ApiError, AuthPayload, Identity, SessionData, StorageError, Transport};
use log::info;
use thiserror::Error;

use crate::{ArenaContext, FormError, LoginForm, RegistrationForm};

/// Logs users in and out, keeping the session in sync with the server.
pub struct Auth<T> {
    context: ArenaContext<T>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Invalid(#[from] FormError),
    /// Username or password is incorrect
    #[error("Invalid username or password")]
    InvalidCredentials,
    /// The server refused the request, with its message
    #[error("{0}")]
    Rejected(String),
    /// The server answered without a credential or identity
    #[error("The server sent an unexpected response")]
    MalformedResponse,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl<T> Auth<T>
where
    T: Transport,
{
    pub fn new(context: &ArenaContext<T>) -> Self {
        Self {
            context: context.clone(),
        }
    }

    /// Logs in, persisting the new session
    pub async fn login(&self, form: &LoginForm) -> Result<Identity, AuthError> {
        let credentials = form.validate()?;

        let payload = self
            .context
            .client
            .login(&credentials)
            .await
            .map_err(|e| match e {
                ApiError::Unauthorized => AuthError::InvalidCredentials,
                e => AuthError::Rejected(e.user_message("Could not log in")),
            })?;

        self.accept(payload)
    }

    /// Creates an account and logs into it
    pub async fn register(&self, form: &RegistrationForm) -> Result<Identity, AuthError> {
        let new_user = form.validate()?;

        let payload = self
            .context
            .client
            .register(&new_user)
            .await
            .map_err(|e| AuthError::Rejected(e.user_message("Could not create the account")))?;

        self.accept(payload)
    }

    /// Fetches the identity again, replacing the stored one
    pub async fn refresh(&self) -> Result<Identity, AuthError> {
        let user = self
            .context
            .client
            .me()
            .await
            .map_err(|e| AuthError::Rejected(e.user_message("Could not fetch your profile")))?;

        self.context.session.replace_identity(user.clone())?;

        Ok(user)
    }

    pub fn logout(&self) {
        info!("Logging out");
        self.context.session.logout();
    }

    pub fn identity(&self) -> Option<Identity> {
        self.context.session.identity()
    }

    pub fn is_authenticated(&self) -> bool {
        self.context.session.is_authenticated()
    }

    fn accept(&self, payload: AuthPayload) -> Result<Identity, AuthError> {
        let user = match payload.user {
            Some(user) if !payload.access_token.is_empty() => user,
            _ => return Err(AuthError::MalformedResponse),
        };

        self.context.session.establish(SessionData {
            token: payload.access_token,
            user: user.clone(),
        })?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arena_core::{
        testing::ScriptedTransport, Body, Config, MemoryStorage, Method, Storage, TOKEN_KEY,
        USER_KEY,
    };
    use serde_json::json;

    use super::*;
    use crate::{test_support::identity, Arena};

    fn logged_out() -> (Arena<ScriptedTransport>, ScriptedTransport, Arc<MemoryStorage>) {
        let transport = ScriptedTransport::new();
        let storage = Arc::new(MemoryStorage::new());
        let (arena, _) = Arena::new(transport.clone(), storage.clone(), Config::default());

        (arena, transport, storage)
    }

    fn login_form() -> LoginForm {
        LoginForm {
            username: "musketeer".to_string(),
            password: "Volley123".to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_persists_session() {
        let (arena, transport, storage) = logged_out();
        transport.respond(
            Method::Post,
            "login",
            200,
            json!({ "access_token": "jwt", "token_type": "bearer", "user": identity() }),
        );

        let user = arena.auth.login(&login_form()).await.unwrap();

        assert_eq!(user, identity());
        assert!(arena.auth.is_authenticated());
        assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("jwt"));

        let stored = storage.get(USER_KEY).unwrap().unwrap();
        let stored: Identity = serde_json::from_str(&stored).unwrap();
        assert_eq!(stored, identity());
        assert!(matches!(transport.requests()[0].body, Body::Form(_)));
    }

    #[tokio::test]
    async fn test_wrong_password() {
        let (arena, transport, storage) = logged_out();
        transport.respond(
            Method::Post,
            "login",
            401,
            json!({ "detail": "Incorrect username or password" }),
        );

        let error = arena.auth.login(&login_form()).await.unwrap_err();

        assert!(matches!(error, AuthError::InvalidCredentials));
        assert!(!arena.auth.is_authenticated());
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_payload_stays_logged_out() {
        let (arena, transport, storage) = logged_out();
        transport.respond(
            Method::Post,
            "login",
            200,
            json!({ "access_token": "", "user": identity() }),
        );

        let error = arena.auth.login(&login_form()).await.unwrap_err();

        assert!(matches!(error, AuthError::MalformedResponse));
        assert!(!arena.auth.is_authenticated());
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_register_sends_confirmation() {
        let (arena, transport, _) = logged_out();
        transport.respond(
            Method::Post,
            "register",
            201,
            json!({ "access_token": "jwt", "token_type": "bearer", "user": identity() }),
        );

        let form = RegistrationForm {
            username: "musketeer".to_string(),
            email: "musketeer@arena.gg".to_string(),
            password: "Volley123".to_string(),
            confirm_password: "Volley123".to_string(),
        };

        arena.auth.register(&form).await.unwrap();

        let body = match &transport.requests()[0].body {
            Body::Json(value) => value.clone(),
            other => panic!("expected json body, got {:?}", other),
        };
        assert_eq!(body["confirm_password"], "Volley123");
        assert!(arena.auth.is_authenticated());
    }

    #[tokio::test]
    async fn test_register_rejected_by_server() {
        let (arena, transport, _) = logged_out();
        transport.respond(
            Method::Post,
            "register",
            400,
            json!({ "detail": "Username is already taken" }),
        );

        let form = RegistrationForm {
            username: "musketeer".to_string(),
            email: "musketeer@arena.gg".to_string(),
            password: "Volley123".to_string(),
            confirm_password: "Volley123".to_string(),
        };

        let error = arena.auth.register(&form).await.unwrap_err();

        assert_eq!(error.to_string(), "Username is already taken");
    }

    #[tokio::test]
    async fn test_invalid_form_sends_nothing() {
        let (arena, transport, _) = logged_out();

        let error = arena.auth.login(&LoginForm::default()).await.unwrap_err();

        assert!(matches!(error, AuthError::Invalid(FormError::MissingFields)));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_replaces_identity() {
        let (arena, transport, storage, _) = crate::test_support::arena();

        let mut updated = identity();
        updated.clash_tag = Some("#NEWTAG".to_string());
        transport.respond(Method::Get, "users/me", 200, json!(updated));

        arena.auth.refresh().await.unwrap();

        assert_eq!(arena.auth.identity(), Some(updated));
        assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("token"));
    }

    #[tokio::test]
    async fn test_logout() {
        let (arena, _, storage, _) = crate::test_support::arena();

        arena.auth.logout();

        assert!(!arena.auth.is_authenticated());
        assert!(storage.is_empty());
    }
}
