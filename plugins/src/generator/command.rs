use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use finguard_core::api as core_api;
use finguard_core::config::CommandGeneratorConfig;

const STDERR_TAIL_CHARS: usize = 512;

/// Runs an external program per request. The prompt is passed as the last
/// argument and stdout is the answer. The caller's id and tier are exported
/// as `FINGUARD_USER_ID` and `FINGUARD_TIER`.
pub struct CommandGenerator {
    program: String,
    args: Vec<String>,
    timeout_ms: u64,
}

impl CommandGenerator {
    pub fn new(cfg: &CommandGeneratorConfig) -> Self {
        Self {
            program: cfg.program.clone(),
            args: cfg.args.clone(),
            timeout_ms: cfg.timeout_ms,
        }
    }
}

fn tail(s: &str, max_chars: usize) -> String {
    let count = s.chars().count();
    s.chars().skip(count.saturating_sub(max_chars)).collect()
}

#[async_trait]
impl core_api::ContentGenerator for CommandGenerator {
    fn name(&self) -> &str {
        "command"
    }

    async fn generate(
        &self,
        prompt: &str,
        context: &core_api::Identity,
    ) -> Result<core_api::Response, core_api::GenerationError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg(prompt)
            .env("FINGUARD_USER_ID", &context.user_id)
            .env("FINGUARD_TIER", context.tier.as_str())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        tracing::debug!(
            target: "finguard.pipeline",
            program = %self.program,
            args = ?self.args,
            "spawning generator"
        );

        let output = cmd.output();
        let output = match tokio::time::timeout(Duration::from_millis(self.timeout_ms), output).await
        {
            Ok(res) => res.map_err(|source| core_api::GenerationError::Spawn {
                program: self.program.clone(),
                source,
            })?,
            Err(_) => {
                return Err(core_api::GenerationError::Timeout {
                    timeout_ms: self.timeout_ms,
                })
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(core_api::GenerationError::UnexpectedExit {
                code: output.status.code().unwrap_or(-1),
                stderr_tail: tail(stderr.trim_end(), STDERR_TAIL_CHARS),
            });
        }

        let answer = String::from_utf8(output.stdout).map_err(core_api::GenerationError::Decode)?;
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(core_api::GenerationError::Empty);
        }
        Ok(core_api::Response::new(answer))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use finguard_core::api::ContentGenerator;

    fn generator(program: &str, args: &[&str], timeout_ms: u64) -> CommandGenerator {
        CommandGenerator::new(&CommandGeneratorConfig {
            program: program.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            timeout_ms,
        })
    }

    #[tokio::test]
    async fn prompt_is_last_argument_and_stdout_is_the_answer() {
        let g = generator("echo", &["answer:"], 5_000);
        let r = g
            .generate("what now?", &core_api::Identity::example_premium())
            .await
            .unwrap();
        assert_eq!(r.answer, "answer: what now?");
        assert!(!r.disclaimer_added);
    }

    #[tokio::test]
    async fn identity_is_exported_to_the_child() {
        let g = generator("sh", &["-c", "echo \"$FINGUARD_USER_ID/$FINGUARD_TIER\"", "sh"], 5_000);
        let r = g
            .generate("ignored", &core_api::Identity::example_restricted())
            .await
            .unwrap();
        assert_eq!(r.answer, "restricted@example.com/restricted_user");
    }

    #[tokio::test]
    async fn nonzero_exit_carries_stderr() {
        let g = generator("sh", &["-c", "echo boom >&2; exit 3", "sh"], 5_000);
        let err = g
            .generate("q", &core_api::Identity::example_premium())
            .await
            .unwrap_err();
        match err {
            core_api::GenerationError::UnexpectedExit { code, stderr_tail } => {
                assert_eq!(code, 3);
                assert_eq!(stderr_tail, "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn slow_generator_times_out() {
        let g = generator("sleep", &["5"], 50);
        let err = g
            .generate("1", &core_api::Identity::example_premium())
            .await
            .unwrap_err();
        assert!(matches!(err, core_api::GenerationError::Timeout { timeout_ms: 50 }));
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let g = generator("finguard-no-such-generator", &[], 1_000);
        let err = g
            .generate("q", &core_api::Identity::example_premium())
            .await
            .unwrap_err();
        assert!(matches!(err, core_api::GenerationError::Spawn { .. }));
    }
}
