//! Builds the request pipeline and provisioner from configuration for the CLI and HTTP server.
use std::sync::Arc;

use anyhow::Result;

use finguard_core::api as core_api;
use finguard_core::config::AppConfig;

use crate::factory;

pub struct Services {
    pub pipeline: core_api::AdvisorPipeline,
    pub backend: core_api::DecisionBackend,
}

pub fn build_services(cfg: &AppConfig) -> Result<Services> {
    let backend = factory::build_decision_backend(cfg)?;
    let auth_gate = core_api::AuthorizationGate::new(
        backend.clone(),
        factory::build_query_classifier(cfg),
        cfg.degraded.authorization_fail_open,
    );
    let compliance_gate = core_api::ComplianceGate::new(
        backend.clone(),
        factory::build_response_classifier(cfg),
        cfg.degraded.compliance_always_disclaim,
    );
    let generator = factory::build_generator(cfg);

    tracing::info!(
        target: "finguard.pipeline",
        decision = %backend.name(),
        generator = %generator.name(),
        authorization_fail_open = cfg.degraded.authorization_fail_open,
        compliance_always_disclaim = cfg.degraded.compliance_always_disclaim,
        "services ready"
    );

    Ok(Services {
        pipeline: core_api::AdvisorPipeline::new(
            Arc::new(auth_gate),
            Arc::new(compliance_gate),
            generator,
        ),
        backend,
    })
}

pub fn build_provisioner(cfg: &AppConfig, dry_run: bool) -> Result<core_api::Provisioner> {
    let admin = factory::build_admin(cfg, dry_run)?;
    tracing::info!(target: "finguard.provision", admin = %admin.name(), dry_run, "provisioner ready");
    Ok(core_api::Provisioner::new(admin))
}
