use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use finguard_core::api::{ClearanceLevel, Tier};

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Policy-gated AI financial advice")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (defaults to ./finguard.toml, then ~/.finguard/config.toml)
    #[arg(long, global = true, env = "FINGUARD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level filter, e.g. `info` or `finguard=debug`
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierArg {
    OptedInUser,
    RestrictedUser,
    PremiumUser,
}

impl From<TierArg> for Tier {
    fn from(t: TierArg) -> Self {
        match t {
            TierArg::OptedInUser => Tier::OptedInUser,
            TierArg::RestrictedUser => Tier::RestrictedUser,
            TierArg::PremiumUser => Tier::PremiumUser,
        }
    }
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearanceArg {
    Low,
    High,
}

impl From<ClearanceArg> for ClearanceLevel {
    fn from(c: ClearanceArg) -> Self {
        match c {
            ClearanceArg::Low => ClearanceLevel::Low,
            ClearanceArg::High => ClearanceLevel::High,
        }
    }
}

#[derive(ClapArgs, Debug, Clone)]
pub struct AskArgs {
    /// The question to ask
    pub question: String,

    /// Use a built-in example identity (user@example.com, restricted@example.com)
    #[arg(long = "as", value_name = "USER_ID", conflicts_with = "user_id")]
    pub as_example: Option<String>,

    #[arg(long)]
    pub user_id: Option<String>,

    #[arg(long, value_enum, default_value_t = TierArg::RestrictedUser)]
    pub tier: TierArg,

    #[arg(long, value_enum, default_value_t = ClearanceArg::Low)]
    pub clearance: ClearanceArg,

    #[arg(long, default_value_t = false)]
    pub opted_in: bool,

    /// Print the outcome as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ModelArgs {
    /// Policy model TOML file; the built-in financial advisor model when omitted
    #[arg(long)]
    pub model: Option<PathBuf>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ProvisionArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Apply against an in-memory admin instead of the decision service
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long)]
    pub host: Option<String>,

    #[arg(long)]
    pub port: Option<u16>,

    #[arg(long)]
    pub session_id: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run one question through the gated pipeline
    Ask(AskArgs),
    /// Apply the policy model to the decision service
    Provision(ProvisionArgs),
    /// Check a policy model for dangling references
    Validate(ModelArgs),
    /// Print the policy model as TOML
    Model(ModelArgs),
    /// Serve the pipeline over HTTP
    Serve(ServeArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ask_with_example_identity() {
        let args = Args::try_parse_from([
            "finguard",
            "ask",
            "should I buy bonds?",
            "--as",
            "restricted@example.com",
        ])
        .unwrap();
        let Commands::Ask(ask) = args.command else {
            panic!("expected ask");
        };
        assert_eq!(ask.as_example.as_deref(), Some("restricted@example.com"));
        assert_eq!(ask.tier, TierArg::RestrictedUser);
    }

    #[test]
    fn as_conflicts_with_user_id() {
        let res = Args::try_parse_from([
            "finguard", "ask", "q", "--as", "a@example.com", "--user-id", "b",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn provision_flags() {
        let args = Args::try_parse_from([
            "finguard",
            "--config",
            "x.toml",
            "provision",
            "--dry-run",
            "--model",
            "m.toml",
        ])
        .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("x.toml")));
        let Commands::Provision(p) = args.command else {
            panic!("expected provision");
        };
        assert!(p.dry_run);
        assert_eq!(p.model.model, Some(PathBuf::from("m.toml")));
    }
}
