use crate::error::PipelineError;
use crate::gate::{Authorization, AuthorizationGate};
use crate::types::Query;

pub(crate) struct PreRun {
    pub authorization: Authorization,
}

/// Authorization stage. Runs strictly before generation.
pub(crate) async fn pre_run(gate: &AuthorizationGate, query: &Query) -> Result<PreRun, PipelineError> {
    let authorization = gate.authorize(&query.context, query).await?;
    Ok(PreRun { authorization })
}
