#![forbid(unsafe_code)]

use crate::ServiceError;
use lt_core::ids::UserId;

/// The authenticated-identity collaborator. The real implementation
/// lives in the session glue; operations only ask who is calling.
pub trait IdentityProvider {
    fn current_user(&self) -> Option<UserId>;
}

/// Always-present identity, for tests and single-user embeddings.
#[derive(Clone, Debug)]
pub struct FixedIdentity {
    user: UserId,
}

impl FixedIdentity {
    pub fn new(user: UserId) -> Self {
        Self { user }
    }
}

impl IdentityProvider for FixedIdentity {
    fn current_user(&self) -> Option<UserId> {
        Some(self.user.clone())
    }
}

/// No session. Every operation fails with `Unauthenticated`.
#[derive(Clone, Copy, Debug)]
pub struct Anonymous;

impl IdentityProvider for Anonymous {
    fn current_user(&self) -> Option<UserId> {
        None
    }
}

pub(crate) fn require_user(identity: &dyn IdentityProvider) -> Result<UserId, ServiceError> {
    identity.current_user().ok_or(ServiceError::Unauthenticated)
}
