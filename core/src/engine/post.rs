use crate::error::PipelineError;
use crate::gate::ComplianceGate;
use crate::types::{Identity, Response};

/// Compliance stage. Runs strictly after generation.
pub(crate) async fn post_run(
    gate: &ComplianceGate,
    identity: &Identity,
    response: Response,
) -> Result<Response, PipelineError> {
    Ok(gate.enforce(identity, response).await?)
}
