use finguard_core::api::{AppConfig, Identity, PipelineOutcome, Query};
use finguard_plugins::services::build_services;

use crate::commands::cli::AskArgs;
use crate::error::CliError;

/// Exit code for a denied request.
pub const EXIT_DENIED: i32 = 2;

pub fn identity_from_args(args: &AskArgs) -> Result<Identity, CliError> {
    if let Some(id) = args.as_example.as_deref() {
        return Identity::example(id)
            .ok_or_else(|| CliError::Usage(format!("no example identity named `{id}`")));
    }
    let Some(user_id) = args.user_id.as_deref().filter(|u| !u.trim().is_empty()) else {
        return Err(CliError::Usage(
            "either --as <example> or --user-id is required".into(),
        ));
    };
    Ok(Identity::new(user_id, args.tier.into())
        .with_clearance(args.clearance.into())
        .opted_in(args.opted_in))
}

pub async fn handle_ask(args: AskArgs, cfg: &AppConfig) -> Result<i32, CliError> {
    let identity = identity_from_args(&args)?;
    let services = build_services(cfg)?;

    let outcome = services
        .pipeline
        .ask(Query::new(args.question.clone(), identity))
        .await?;

    if args.json {
        let json = serde_json::to_string_pretty(&outcome)
            .map_err(|e| CliError::Command(e.to_string()))?;
        println!("{json}");
    } else {
        match &outcome {
            PipelineOutcome::Answered { response } => println!("{}", response.answer),
            PipelineOutcome::Denied { reason } => println!("Denied: {reason}"),
        }
    }

    Ok(if outcome.is_denied() { EXIT_DENIED } else { 0 })
}
