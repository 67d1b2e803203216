use super::CliError;
use anyhow::Context;
use motif_core::common::InvocationSettings;
use motif_core::domain::{EdgeListGraph, MotifError, ResultTable};
use motif_core::parameters::ParameterValue;
use motif_core::pipeline::MotifCounter;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// `--config` document. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct CliConfig {
    /// Explicit binary per counter command.
    pub(super) binaries: BTreeMap<String, PathBuf>,
    /// Searched before `PATH` when a binary is not configured.
    pub(super) search_dirs: Vec<PathBuf>,
    /// Parameter values per counter command, keyed by name or alias.
    pub(super) parameters: BTreeMap<String, BTreeMap<String, serde_json::Value>>,
    #[serde(flatten)]
    pub(super) settings: InvocationSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(super) enum OutputFormat {
    Table,
    Json,
}

pub(super) fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // A second initialization within one process keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub(super) fn load_config(path: Option<&Path>) -> Result<CliConfig, CliError> {
    let Some(path) = path else {
        return Ok(CliConfig::default());
    };
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read config '{}'", path.display()))?;
    let config: CliConfig = serde_json::from_str(&source)
        .with_context(|| format!("failed to parse config '{}'", path.display()))?;
    tracing::debug!(config = %path.display(), "loaded configuration");
    Ok(config)
}

/// Reads a graph file: `.json` documents carry their own direction, edge
/// lists take `directed` from the command line.
pub(super) fn load_graph(path: &Path, directed: bool) -> Result<EdgeListGraph, CliError> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read graph '{}'", path.display()))?;
    let is_json = path
        .extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("json"));
    let graph = if is_json {
        EdgeListGraph::parse_json(&source)?
    } else {
        EdgeListGraph::parse_edge_list(&source, directed)?
    };
    Ok(graph)
}

pub(super) fn parse_assignment(raw: &str) -> Result<(&str, &str), CliError> {
    raw.split_once('=')
        .map(|(key, value)| (key.trim(), value))
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| {
            CliError::Usage(format!(
                "parameter assignment '{}' must have the form KEY=VALUE",
                raw
            ))
        })
}

/// Applies configured values, then `KEY=VALUE` assignments from the command line.
pub(super) fn apply_parameters(
    counter: &mut MotifCounter,
    configured: Option<&BTreeMap<String, serde_json::Value>>,
    assignments: &[String],
) -> Result<(), CliError> {
    for (key, value) in configured.into_iter().flatten() {
        let parameter = counter.parameter_mut(key)?;
        let value = match value {
            serde_json::Value::String(text) => parameter.parse_value(text)?,
            other => json_parameter_value(other).ok_or_else(|| {
                CliError::Usage(format!(
                    "configured value of parameter '{}' must be a string, number or boolean",
                    key
                ))
            })?,
        };
        parameter.set_value(value)?;
    }
    for assignment in assignments {
        let (key, raw) = parse_assignment(assignment)?;
        let parameter = counter.parameter_mut(key)?;
        let value = parameter.parse_value(raw)?;
        parameter.set_value(value)?;
    }
    Ok(())
}

/// Strings are left to [`Parameter::parse_value`](motif_core::parameters::Parameter::parse_value).
fn json_parameter_value(value: &serde_json::Value) -> Option<ParameterValue> {
    match value {
        serde_json::Value::Bool(flag) => Some(ParameterValue::Flag(*flag)),
        serde_json::Value::Number(number) => number
            .as_i64()
            .map(ParameterValue::Integer)
            .or_else(|| number.as_f64().map(ParameterValue::Real)),
        _ => None,
    }
}

pub(super) fn format_table(table: &ResultTable, format: OutputFormat) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => Ok(table.render_text()),
        OutputFormat::Json => {
            let mut rendered =
                serde_json::to_string_pretty(table).context("failed to serialize result table")?;
            rendered.push('\n');
            Ok(rendered)
        }
    }
}

pub(super) fn emit(text: &str, output: Option<&Path>) -> Result<(), CliError> {
    match output {
        Some(path) => {
            fs::write(path, text).map_err(|source| {
                MotifError::io_system(
                    "IO.CLI_OUTPUT_WRITE",
                    format!("failed to write '{}': {}", path.display(), source),
                )
            })?;
            tracing::info!(output = %path.display(), "wrote result");
        }
        None => print!("{}", text),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{CliConfig, json_parameter_value, parse_assignment};
    use motif_core::common::StderrPolicy;
    use motif_core::parameters::ParameterValue;
    use std::path::PathBuf;

    #[test]
    fn config_sections_are_optional_and_settings_are_flattened() {
        let config: CliConfig = serde_json::from_str(
            r#"
            {
              "binaries": { "netmode": "/opt/netmode/NetMODE" },
              "parameters": { "netmode": { "motif_size": 4, "c": 100 } },
              "timeout_seconds": 30,
              "stderr_policy": "fail"
            }
            "#,
        )
        .expect("config should deserialize");

        assert_eq!(
            config.binaries.get("netmode"),
            Some(&PathBuf::from("/opt/netmode/NetMODE"))
        );
        assert!(config.search_dirs.is_empty());
        assert_eq!(config.settings.timeout_seconds, 30);
        assert_eq!(config.settings.stderr_policy, StderrPolicy::Fail);
        assert_eq!(config.parameters["netmode"].len(), 2);
    }

    #[test]
    fn assignments_split_on_first_equals_sign() {
        let (key, value) = parse_assignment("w=a=b").expect("assignment should split");
        assert_eq!((key, value), ("w", "a=b"));
        assert!(parse_assignment("motif_size").is_err());
        assert!(parse_assignment("=3").is_err());
    }

    #[test]
    fn json_scalars_map_to_parameter_values() {
        assert_eq!(
            json_parameter_value(&serde_json::json!(4)),
            Some(ParameterValue::Integer(4))
        );
        assert_eq!(
            json_parameter_value(&serde_json::json!(0.5)),
            Some(ParameterValue::Real(0.5))
        );
        assert_eq!(
            json_parameter_value(&serde_json::json!(true)),
            Some(ParameterValue::Flag(true))
        );
        assert_eq!(json_parameter_value(&serde_json::json!([1])), None);
        assert_eq!(json_parameter_value(&serde_json::json!("4")), None);
    }
}
