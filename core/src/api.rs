//! Stable re-exports for consumers (`cli`, `plugins`, and external crates).
//!
//! Prefer importing from `finguard_core::api` instead of reaching into internal modules.

pub use crate::classifier::{
    classify_query, classify_response, AdviceClassifier, KeywordClassifier,
};
pub use crate::config::{
    AdminConfig, AppConfig, DecisionProvider, DegradedConfig, GeneratorProvider, HttpServerConfig,
    LoggingConfig,
};
pub use crate::decision::{
    AdviceRequest, CheckResource, DecisionBackend, FixedDecider, PolicyDecider, ResourceRequest,
    ResponseContentRequest,
};
pub use crate::engine::{run_with_query, AdvisorPipeline, PipelineOutcome, RunWithQueryArgs};
pub use crate::error::{
    AdminError, ConfigError, DecisionError, GenerationError, PipelineError, PolicyCheckError,
    ProvisionError, SecurityError, ValidationError,
};
pub use crate::gate::{Authorization, AuthorizationGate, ComplianceGate, DISCLAIMER};
pub use crate::generator::{CannedGenerator, ContentGenerator};
pub use crate::model::{keys, PolicyModel, Tier, ValidatedModel};
pub use crate::provision::{
    InMemoryPolicyAdmin, PolicyAdmin, ProvisionStage, ProvisionSummary, Provisioner,
};
pub use crate::types::{ClearanceLevel, Identity, Query, Response};
