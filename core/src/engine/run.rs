use std::sync::Arc;
use std::time::Instant;

use tracing::Instrument;

use crate::error::PipelineError;
use crate::gate::{Authorization, AuthorizationGate, ComplianceGate};
use crate::generator::ContentGenerator;
use crate::types::Query;

use super::post::post_run;
use super::pre::pre_run;
use super::types::{PipelineOutcome, RunWithQueryArgs, AUTHORIZATION_MODE_KEY};

/// classify and authorize, then generate, then classify and enforce.
/// A denial short-circuits before the generator is called.
pub async fn run_with_query(args: RunWithQueryArgs) -> Result<PipelineOutcome, PipelineError> {
    let RunWithQueryArgs {
        query,
        run_id,
        auth_gate,
        compliance_gate,
        generator,
    } = args;

    let span = tracing::info_span!(
        target: "finguard.pipeline",
        "run",
        run_id = %run_id,
        user_id = %query.context.user_id,
        tier = %query.context.tier,
    );

    async move {
        let started = Instant::now();
        tracing::info!(target: "finguard.pipeline", "run.start");

        let pre = pre_run(&auth_gate, &query).await.inspect_err(|e| {
            tracing::error!(target: "finguard.pipeline", error = %e, "run.failed stage=authorization");
        })?;

        let degraded = match pre.authorization {
            Authorization::Allowed => false,
            Authorization::AllowedDegraded => true,
            Authorization::Denied { reason } => {
                tracing::info!(
                    target: "finguard.pipeline",
                    duration_ms = started.elapsed().as_millis() as u64,
                    "run.denied"
                );
                return Ok(PipelineOutcome::Denied { reason });
            }
        };

        let mut response = generator
            .generate(&query.question, &query.context)
            .await
            .inspect_err(|e| {
                tracing::error!(
                    target: "finguard.pipeline",
                    generator = %generator.name(),
                    error = %e,
                    "run.failed stage=generation"
                );
            })?;
        if degraded {
            response.insert_metadata(AUTHORIZATION_MODE_KEY, "degraded");
        }

        let response = post_run(&compliance_gate, &query.context, response)
            .await
            .inspect_err(|e| {
                tracing::error!(target: "finguard.pipeline", error = %e, "run.failed stage=compliance");
            })?;

        tracing::info!(
            target: "finguard.pipeline",
            includes_advice = response.includes_advice,
            disclaimer_added = response.disclaimer_added,
            duration_ms = started.elapsed().as_millis() as u64,
            "run.end"
        );
        Ok(PipelineOutcome::Answered { response })
    }
    .instrument(span)
    .await
}

/// Composed request pipeline. Cheap to clone; requests share no mutable state.
#[derive(Clone)]
pub struct AdvisorPipeline {
    auth_gate: Arc<AuthorizationGate>,
    compliance_gate: Arc<ComplianceGate>,
    generator: Arc<dyn ContentGenerator>,
}

impl AdvisorPipeline {
    pub fn new(
        auth_gate: Arc<AuthorizationGate>,
        compliance_gate: Arc<ComplianceGate>,
        generator: Arc<dyn ContentGenerator>,
    ) -> Self {
        Self {
            auth_gate,
            compliance_gate,
            generator,
        }
    }

    pub fn generator_name(&self) -> &str {
        self.generator.name()
    }

    pub fn decision_backend_name(&self) -> &str {
        self.auth_gate.backend().name()
    }

    pub async fn ask(&self, query: Query) -> Result<PipelineOutcome, PipelineError> {
        run_with_query(RunWithQueryArgs {
            query,
            run_id: uuid::Uuid::new_v4().to_string(),
            auth_gate: self.auth_gate.clone(),
            compliance_gate: self.compliance_gate.clone(),
            generator: self.generator.clone(),
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::KeywordClassifier;
    use crate::decision::{DecisionBackend, FixedDecider};
    use crate::gate::COMPLIANCE_MODE_KEY;
    use crate::generator::CannedGenerator;
    use crate::types::Identity;

    fn pipeline(backend: DecisionBackend, generator: Arc<CannedGenerator>) -> AdvisorPipeline {
        AdvisorPipeline::new(
            Arc::new(AuthorizationGate::new(
                backend.clone(),
                Arc::new(KeywordClassifier::query_default()),
                true,
            )),
            Arc::new(ComplianceGate::new(
                backend,
                Arc::new(KeywordClassifier::response_default()),
                true,
            )),
            generator,
        )
    }

    #[tokio::test]
    async fn degraded_answers_are_marked_on_both_gates() {
        let generator = Arc::new(CannedGenerator::new("Consider bonds."));
        let outcome = pipeline(DecisionBackend::Degraded, generator)
            .ask(Query::new("should i buy bonds?", Identity::example_restricted()))
            .await
            .unwrap();
        let response = outcome.response().unwrap();
        assert_eq!(response.metadata_value(AUTHORIZATION_MODE_KEY), Some("degraded"));
        assert_eq!(response.metadata_value(COMPLIANCE_MODE_KEY), Some("degraded"));
        assert!(response.disclaimer_added);
    }

    #[tokio::test]
    async fn generation_failure_is_reported_after_authorization() {
        let decider = Arc::new(FixedDecider::allow());
        let generator = Arc::new(CannedGenerator::new(""));
        let err = pipeline(DecisionBackend::live(decider.clone()), generator)
            .ask(Query::new("hi", Identity::example_premium()))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Generation(_)));
        assert_eq!(decider.call_count(), 1);
    }
}
