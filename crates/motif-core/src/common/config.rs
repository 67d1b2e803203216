use super::constants::DEFAULT_TIMEOUT_SECONDS;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// What a successful run does with a non-empty stderr stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StderrPolicy {
    #[default]
    Warn,
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InvocationSettings {
    pub timeout_seconds: u64,
    pub scratch_root: Option<PathBuf>,
    pub stderr_policy: StderrPolicy,
}

impl Default for InvocationSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            scratch_root: None,
            stderr_policy: StderrPolicy::Warn,
        }
    }
}

impl InvocationSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    pub fn with_scratch_root(mut self, scratch_root: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(scratch_root.into());
        self
    }

    pub fn with_stderr_policy(mut self, stderr_policy: StderrPolicy) -> Self {
        self.stderr_policy = stderr_policy;
        self
    }
}
