use async_trait::async_trait;

use crate::error::DecisionError;

use super::CheckResource;

/// `check(subject, action, resource) -> allowed`.
///
/// `Ok(false)` is a business denial. `Err` means no decision was obtained
/// (transport, credentials, timeout, malformed reply).
#[async_trait]
pub trait PolicyDecider: Send + Sync {
    fn name(&self) -> &str;

    async fn check(
        &self,
        subject: &str,
        action: &str,
        resource: &CheckResource,
    ) -> Result<bool, DecisionError>;
}
