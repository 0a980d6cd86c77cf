use std::sync::Arc;

use anyhow::Result;

use finguard_core::api as core_api;
use finguard_core::config::{AppConfig, DecisionProvider, GeneratorProvider};

use crate::decision::PermitDecider;
use crate::generator::CommandGenerator;
use crate::provision::PermitAdmin;

/// Chooses live or degraded decisions once, at composition time.
/// A permit provider without an api key falls back to degraded mode.
pub fn build_decision_backend(cfg: &AppConfig) -> Result<core_api::DecisionBackend> {
    match &cfg.decision.provider {
        DecisionProvider::Permit(p) if p.api_key.trim().is_empty() => {
            tracing::warn!(
                target: "finguard.degraded",
                pdp_url = %p.pdp_url,
                "no decision-service api key configured; running in degraded mode"
            );
            Ok(core_api::DecisionBackend::Degraded)
        }
        DecisionProvider::Permit(p) => Ok(core_api::DecisionBackend::live(Arc::new(
            PermitDecider::new(p)?,
        ))),
        DecisionProvider::Fixed(f) => Ok(core_api::DecisionBackend::live(Arc::new(
            core_api::FixedDecider::answering(f.allow),
        ))),
        DecisionProvider::Degraded => {
            tracing::warn!(
                target: "finguard.degraded",
                "decision provider set to degraded"
            );
            Ok(core_api::DecisionBackend::Degraded)
        }
    }
}

pub fn build_query_classifier(cfg: &AppConfig) -> Arc<dyn core_api::AdviceClassifier> {
    Arc::new(
        core_api::KeywordClassifier::query_default()
            .with_keywords(cfg.classifier.extra_query_keywords.iter()),
    )
}

pub fn build_response_classifier(cfg: &AppConfig) -> Arc<dyn core_api::AdviceClassifier> {
    Arc::new(
        core_api::KeywordClassifier::response_default()
            .with_keywords(cfg.classifier.extra_response_keywords.iter()),
    )
}

pub fn build_generator(cfg: &AppConfig) -> Arc<dyn core_api::ContentGenerator> {
    match &cfg.generator.provider {
        GeneratorProvider::Command(c) => Arc::new(CommandGenerator::new(c)),
        GeneratorProvider::Canned(c) => Arc::new(core_api::CannedGenerator::new(c.answer.clone())),
    }
}

/// `dry_run` keeps provisioning in memory; nothing is sent to the service.
pub fn build_admin(cfg: &AppConfig, dry_run: bool) -> Result<Arc<dyn core_api::PolicyAdmin>> {
    if dry_run {
        return Ok(Arc::new(core_api::InMemoryPolicyAdmin::new()));
    }
    Ok(Arc::new(PermitAdmin::new(&cfg.admin)?))
}
