mod post;
mod pre;
mod run;
mod types;

pub use run::{run_with_query, AdvisorPipeline};
pub use types::{PipelineOutcome, RunWithQueryArgs, AUTHORIZATION_MODE_KEY};
