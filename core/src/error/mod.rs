mod config_error;
mod decision_error;
mod pipeline_error;
mod provision_error;
mod validation_error;

pub use config_error::ConfigError;
pub use decision_error::{DecisionError, PolicyCheckError, SecurityError};
pub use pipeline_error::{GenerationError, PipelineError};
pub use provision_error::{AdminError, ProvisionError};
pub use validation_error::ValidationError;
