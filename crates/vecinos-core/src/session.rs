//! Authenticated session context handed to the search workflow.

use crate::provider::ProviderId;

/// Bearer token issued by the auth service.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wraps a token, returning `None` for a blank one.
    #[must_use]
    pub fn new(token: &str) -> Option<Self> {
        let token = token.trim();
        (!token.is_empty()).then(|| Self(token.to_owned()))
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential([redacted])")
    }
}

/// Credential plus the identity of the signed-in user.
///
/// Owned by the auth collaborator and passed explicitly to whoever needs it;
/// the search workflow only reads it.
#[derive(Debug, Clone)]
pub struct Session {
    pub credential: Credential,
    /// Own id, used to drop the user from their own search results.
    pub user_id: Option<ProviderId>,
}

impl Session {
    #[must_use]
    pub fn new(credential: Credential, user_id: Option<ProviderId>) -> Self {
        Self {
            credential,
            user_id,
        }
    }
}
