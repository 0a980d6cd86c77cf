use thiserror::Error;

use crate::provision::ProvisionStage;

/// Failure reported by the provisioning surface of the decision service.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("admin api unreachable")]
    Transport(#[source] anyhow::Error),

    #[error("admin api returned unexpected status {status}: {body_snippet}")]
    HttpStatus { status: u16, body_snippet: String },

    #[error("item already exists: {key}")]
    Conflict { key: String },

    #[error("item rejected: {reason}")]
    Rejected { reason: String },
}

#[derive(Debug, Error)]
#[error("provisioning failed at stage `{stage}` on item `{item_key}`")]
pub struct ProvisionError {
    pub stage: ProvisionStage,
    pub item_key: String,
    #[source]
    pub cause: AdminError,
}
