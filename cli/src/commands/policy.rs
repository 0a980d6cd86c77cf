use std::path::Path;

use finguard_core::api::{AppConfig, PolicyModel, ValidatedModel};
use finguard_plugins::services::build_provisioner;

use crate::commands::cli::{ModelArgs, ProvisionArgs};
use crate::error::CliError;

pub fn load_model(path: Option<&Path>) -> Result<PolicyModel, CliError> {
    let Some(path) = path else {
        return Ok(PolicyModel::financial_advisor());
    };
    let s = std::fs::read_to_string(path)
        .map_err(|e| CliError::Command(format!("cannot read {}: {e}", path.display())))?;
    PolicyModel::from_toml_str(&s)
        .map_err(|e| CliError::Command(format!("cannot parse {}: {e}", path.display())))
}

fn load_validated(args: &ModelArgs) -> Result<ValidatedModel, CliError> {
    Ok(load_model(args.model.as_deref())?.validate()?)
}

pub fn handle_validate(args: ModelArgs) -> Result<i32, CliError> {
    let model = load_validated(&args)?;
    println!(
        "model ok: {} resources, {} user attributes, {} condition sets, {} rules, {} roles",
        model.resources.len(),
        model.user_attributes.len(),
        model.user_sets.len() + model.resource_sets.len(),
        model.condition_set_rules.len(),
        model.roles.len()
    );
    Ok(0)
}

pub fn handle_model(args: ModelArgs) -> Result<i32, CliError> {
    let model = load_model(args.model.as_deref())?;
    let toml = model
        .to_toml_string()
        .map_err(|e| CliError::Command(e.to_string()))?;
    print!("{toml}");
    Ok(0)
}

pub async fn handle_provision(args: ProvisionArgs, cfg: &AppConfig) -> Result<i32, CliError> {
    let model = load_validated(&args.model)?;
    let provisioner = build_provisioner(cfg, args.dry_run)?;
    let summary = provisioner.apply(&model).await?;

    for (stage, count) in &summary.per_stage {
        println!("{stage:<20} {count}");
    }
    println!(
        "{}created {}, already present {}",
        if args.dry_run { "[dry run] " } else { "" },
        summary.created,
        summary.already_present
    );
    Ok(0)
}
