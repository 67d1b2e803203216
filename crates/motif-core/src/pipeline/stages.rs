//! Run-scoped values handed from one pipeline state to the next.
//!
//! Each state consumes the previous context and returns the next one, so a
//! state can only see what the states before it produced.

use super::invoker::{CommandLine, ProcessOutput};
use crate::common::StderrPolicy;
use crate::common::constants::STREAM_SENTINEL;
use crate::domain::{Graph, MotifError, MotifResult};
use crate::parameters::{ParameterSet, ParameterValue};
use std::path::PathBuf;
use tempfile::TempPath;

/// Where an input or output parameter sends its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Stream,
    Temporary,
    Path(PathBuf),
}

impl Route {
    pub fn of(value: Option<&ParameterValue>) -> Self {
        match value.and_then(ParameterValue::as_str) {
            Some(STREAM_SENTINEL) => Self::Stream,
            None | Some("") => Self::Temporary,
            Some(path) => Self::Path(PathBuf::from(path)),
        }
    }
}

pub(crate) struct ValidatedRun<'g> {
    pub(crate) graph: &'g dyn Graph,
    pub(crate) parameters: ParameterSet,
}

pub(crate) enum StagedInput {
    Stream(String),
    File {
        path: PathBuf,
        _guard: Option<TempPath>,
    },
}

pub(crate) struct InputStagedRun {
    pub(crate) parameters: ParameterSet,
    pub(crate) input: StagedInput,
}

pub(crate) enum StagedOutput {
    Stream,
    File { result_path: PathBuf },
}

pub(crate) struct OutputStagedRun {
    pub(crate) parameters: ParameterSet,
    pub(crate) input: StagedInput,
    pub(crate) output: StagedOutput,
}

pub(crate) struct AssembledRun {
    pub(crate) input: StagedInput,
    pub(crate) output: StagedOutput,
    pub(crate) command: CommandLine,
}

pub(crate) struct InvokedRun {
    pub(crate) output: StagedOutput,
    pub(crate) process: ProcessOutput,
}

impl StagedInput {
    pub(crate) fn temporary(path: TempPath) -> Self {
        Self::File {
            path: path.to_path_buf(),
            _guard: Some(path),
        }
    }

    pub(crate) fn caller(path: PathBuf) -> Self {
        Self::File { path, _guard: None }
    }

    pub(crate) fn is_stream(&self) -> bool {
        matches!(self, Self::Stream(_))
    }

    pub(crate) fn stdin_text(&self) -> Option<String> {
        match self {
            Self::Stream(text) => Some(text.clone()),
            Self::File { .. } => None,
        }
    }
}

/// Argument vector for `parameters`.
///
/// Positional forms come first in ascending position (ties keep registration
/// order), then every named or flag form in registration order. Parameters
/// whose names appear in `skipped` are left out entirely.
pub fn assemble_arguments(parameters: &ParameterSet, skipped: &[&str]) -> Vec<String> {
    let included = parameters
        .iter()
        .filter(|parameter| !skipped.contains(&parameter.name()));
    let (mut positional, named): (Vec<_>, Vec<_>) =
        included.partition(|parameter| parameter.position().is_some());
    positional.sort_by_key(|parameter| parameter.position());

    positional
        .into_iter()
        .chain(named)
        .flat_map(|parameter| parameter.parameter_form())
        .collect()
}

/// Applies the exit policy: any non-zero status fails the run whatever the
/// output looks like, and stderr on success is governed by `stderr_policy`.
pub(crate) fn check_exit(
    command: &CommandLine,
    process: &ProcessOutput,
    stderr_policy: StderrPolicy,
) -> MotifResult<()> {
    let program = command.program.display();
    let stderr = process.stderr.trim();
    match process.exit_code {
        Some(0) => {}
        Some(code) => {
            return Err(MotifError::process(
                "PROCESS.EXIT_STATUS",
                format!("'{}' exited with status {}: {}", program, code, stderr),
            ));
        }
        None => {
            return Err(MotifError::process(
                "PROCESS.SIGNAL",
                format!("'{}' was terminated by a signal: {}", program, stderr),
            ));
        }
    }

    if !stderr.is_empty() {
        match stderr_policy {
            StderrPolicy::Warn => {
                tracing::warn!(program = %program, stderr, "counter wrote to stderr");
            }
            StderrPolicy::Fail => {
                return Err(MotifError::process(
                    "PROCESS.STDERR",
                    format!("'{}' exited cleanly but wrote to stderr: {}", program, stderr),
                ));
            }
        }
    }
    Ok(())
}
