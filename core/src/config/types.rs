use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub decision: DecisionConfig,

    #[serde(default)]
    pub admin: AdminConfig,

    #[serde(default)]
    pub degraded: DegradedConfig,

    #[serde(default)]
    pub classifier: ClassifierConfig,

    #[serde(default)]
    pub generator: GeneratorConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub http_server: HttpServerConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.decision.provider {
            DecisionProvider::Permit(p) => {
                if p.pdp_url.trim().is_empty() {
                    return Err(ConfigError::Validation("decision.pdp_url is empty".into()));
                }
                if p.timeout_ms == 0 {
                    return Err(ConfigError::Validation(
                        "decision.timeout_ms must be greater than 0".into(),
                    ));
                }
            }
            DecisionProvider::Fixed(_) | DecisionProvider::Degraded => {}
        }
        if self.admin.api_url.trim().is_empty() {
            return Err(ConfigError::Validation("admin.api_url is empty".into()));
        }
        if self.admin.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "admin.timeout_ms must be greater than 0".into(),
            ));
        }
        match &self.generator.provider {
            GeneratorProvider::Command(c) => {
                if c.program.trim().is_empty() {
                    return Err(ConfigError::Validation("generator.program is empty".into()));
                }
                if c.timeout_ms == 0 {
                    return Err(ConfigError::Validation(
                        "generator.timeout_ms must be greater than 0".into(),
                    ));
                }
            }
            GeneratorProvider::Canned(_) => {}
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionConfig {
    #[serde(flatten)]
    pub provider: DecisionProvider,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            provider: DecisionProvider::Permit(PermitDecisionConfig::default()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "provider")]
pub enum DecisionProvider {
    #[serde(rename = "permit")]
    Permit(PermitDecisionConfig),
    #[serde(rename = "fixed")]
    Fixed(FixedDecisionConfig),
    #[serde(rename = "degraded")]
    Degraded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermitDecisionConfig {
    #[serde(default = "default_pdp_url")]
    pub pdp_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_decision_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_tenant")]
    pub tenant: String,
}

impl Default for PermitDecisionConfig {
    fn default() -> Self {
        Self {
            pdp_url: default_pdp_url(),
            api_key: String::new(),
            timeout_ms: default_decision_timeout_ms(),
            tenant: default_tenant(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixedDecisionConfig {
    #[serde(default)]
    pub allow: bool,
}

fn default_pdp_url() -> String {
    "http://localhost:7766".to_string()
}

fn default_decision_timeout_ms() -> u64 {
    5_000
}

fn default_tenant() -> String {
    "default".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    #[serde(default = "default_admin_url")]
    pub api_url: String,
    /// Falls back to the decision api key when empty.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_scope")]
    pub project: String,
    #[serde(default = "default_scope")]
    pub environment: String,
    #[serde(default = "default_admin_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_admin_url() -> String {
    "https://api.permit.io".to_string()
}

fn default_scope() -> String {
    "default".to_string()
}

fn default_admin_timeout_ms() -> u64 {
    10_000
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            api_url: default_admin_url(),
            api_key: String::new(),
            project: default_scope(),
            environment: default_scope(),
            timeout_ms: default_admin_timeout_ms(),
        }
    }
}

/// Fallbacks used when no decision service is configured.
///
/// The defaults are deliberately asymmetric: authorization fails open while
/// compliance over-discloses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegradedConfig {
    #[serde(default = "default_true")]
    pub authorization_fail_open: bool,
    #[serde(default = "default_true")]
    pub compliance_always_disclaim: bool,
}

fn default_true() -> bool {
    true
}

impl Default for DegradedConfig {
    fn default() -> Self {
        Self {
            authorization_fail_open: true,
            compliance_always_disclaim: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default)]
    pub extra_query_keywords: Vec<String>,
    #[serde(default)]
    pub extra_response_keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(flatten)]
    pub provider: GeneratorProvider,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            provider: GeneratorProvider::Canned(CannedGeneratorConfig::default()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "provider")]
pub enum GeneratorProvider {
    #[serde(rename = "command")]
    Command(CommandGeneratorConfig),
    #[serde(rename = "canned")]
    Canned(CannedGeneratorConfig),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandGeneratorConfig {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default = "default_generator_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_generator_timeout_ms() -> u64 {
    120_000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CannedGeneratorConfig {
    #[serde(default = "default_canned_answer")]
    pub answer: String,
}

fn default_canned_answer() -> String {
    "For beginners, consider diversifying across low-cost index funds and keeping an \
     emergency fund before taking on individual stock risk."
        .to_string()
}

impl Default for CannedGeneratorConfig {
    fn default() -> Self {
        Self {
            answer: default_canned_answer(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Directory-qualified file name; rolled daily when set.
    #[serde(default)]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}
