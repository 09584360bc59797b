//! Profile update endpoint.

use vecinos_core::Credential;

use super::VecinosClient;
use crate::error::ApiError;
use crate::profile::ProfileUpdate;

impl VecinosClient {
    /// `PUT users/me` with the full editable profile.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Unauthenticated`] if the token is rejected.
    /// - [`ApiError::Status`] on any other non-2xx status.
    /// - [`ApiError::Http`] on transport failure.
    pub async fn update_profile(
        &self,
        credential: &Credential,
        update: &ProfileUpdate,
    ) -> Result<(), ApiError> {
        let url = self.build_url("users/me", &[])?;
        tracing::debug!(
            %url,
            specialties = update.specialties.len(),
            "updating profile"
        );

        let response = self
            .client
            .put(url.clone())
            .bearer_auth(credential.token())
            .json(update)
            .send()
            .await?;
        Self::ensure_success(response, &url, true).await?;
        Ok(())
    }
}
