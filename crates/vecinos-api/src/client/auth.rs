//! Login, registration and current-user endpoints.

use vecinos_core::{Credential, ProviderId, Session};

use super::VecinosClient;
use crate::error::ApiError;
use crate::types::{
    LoginRequest, LoginResponse, RegisterRequest, RegisteredUser, UserProfile, UserSummary,
};

/// Outcome of a successful login.
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub session: Session,
    pub user: Option<UserSummary>,
}

impl VecinosClient {
    /// `POST auth/login`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Status`] when the API rejects the credentials; the
    ///   server's message is kept.
    /// - [`ApiError::MissingToken`] if a 2xx body has no usable token.
    /// - [`ApiError::Http`] / [`ApiError::Deserialize`] on transport or shape errors.
    pub async fn login(&self, email: &str, password: &str) -> Result<SignedIn, ApiError> {
        let url = self.build_url("auth/login", &[])?;
        tracing::debug!(%url, "logging in");

        let response = self
            .client
            .post(url.clone())
            .json(&LoginRequest { email, password })
            .send()
            .await?;
        let response = Self::ensure_success(response, &url, false).await?;
        let body: LoginResponse = Self::decode(response, "auth/login").await?;

        let credential = body
            .token
            .as_deref()
            .and_then(Credential::new)
            .ok_or(ApiError::MissingToken)?;
        let user_id = body.user.as_ref().map(|u| ProviderId::from(&u.id));

        Ok(SignedIn {
            session: Session::new(credential, user_id),
            user: body.user,
        })
    }

    /// `POST auth/register`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Status`] when the API rejects the registration (e.g. the
    ///   email is taken); the server's message is kept.
    /// - [`ApiError::Http`] / [`ApiError::Deserialize`] on transport or shape errors.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<RegisteredUser, ApiError> {
        let url = self.build_url("auth/register", &[])?;
        tracing::debug!(%url, "registering user");

        let response = self
            .client
            .post(url.clone())
            .json(&RegisterRequest {
                nombre: name,
                email,
                password,
            })
            .send()
            .await?;
        let response = Self::ensure_success(response, &url, false).await?;
        Self::decode(response, "auth/register").await
    }

    /// `GET users/me` for the holder of `credential`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Unauthenticated`] if the token is rejected.
    /// - [`ApiError::Status`] on any other non-2xx status.
    /// - [`ApiError::Http`] / [`ApiError::Deserialize`] on transport or shape errors.
    pub async fn current_user(&self, credential: &Credential) -> Result<UserProfile, ApiError> {
        let url = self.build_url("users/me", &[])?;
        let response = self
            .client
            .get(url.clone())
            .bearer_auth(credential.token())
            .send()
            .await?;
        let response = Self::ensure_success(response, &url, true).await?;
        Self::decode(response, "users/me").await
    }

    /// Validates a stored token and resolves the session's own user id.
    ///
    /// # Errors
    ///
    /// Same as [`VecinosClient::current_user`].
    pub async fn resume_session(&self, credential: Credential) -> Result<Session, ApiError> {
        let profile = self.current_user(&credential).await?;
        Ok(Session::new(credential, Some(ProviderId::from(profile.id))))
    }
}
