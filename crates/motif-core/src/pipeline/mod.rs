//! The adapter: one counting program wired to its parameters and strategies.
//!
//! `count` runs a fixed sequence of states: validate, stage input, stage
//! output, assemble arguments, invoke, parse. The run's scratch directory is
//! removed on every exit path.

pub mod invoker;
mod scratch;
pub mod stages;

pub use invoker::{CommandLine, Invoker, ProcessOutput, SubprocessInvoker};
pub use stages::{Route, assemble_arguments};

use crate::common::InvocationSettings;
use crate::domain::{Graph, MotifError, MotifResult, ResultTable};
use crate::parameters::{Parameter, ParameterSet, ParameterValue};
use crate::transform::{InputTransformer, OutputTransformer};
use scratch::ScratchSpace;
use stages::{
    AssembledRun, InputStagedRun, InvokedRun, OutputStagedRun, StagedInput, StagedOutput,
    ValidatedRun, check_exit,
};
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

const INPUT_FILE_PREFIX: &str = "input-";
const OUTPUT_FILE_NAME: &str = "output";

#[derive(Clone)]
pub struct MotifCounter {
    program: String,
    binary: PathBuf,
    parameters: ParameterSet,
    input_key: String,
    output_key: String,
    input_transformer: Arc<dyn InputTransformer>,
    output_transformer: Arc<dyn OutputTransformer>,
    invoker: Arc<dyn Invoker>,
    settings: InvocationSettings,
    result_suffix: Option<String>,
}

impl std::fmt::Debug for MotifCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MotifCounter")
            .field("program", &self.program)
            .field("binary", &self.binary)
            .field("parameters", &self.parameters)
            .field("input_key", &self.input_key)
            .field("output_key", &self.output_key)
            .field("settings", &self.settings)
            .field("result_suffix", &self.result_suffix)
            .finish_non_exhaustive()
    }
}

pub struct MotifCounterBuilder {
    program: String,
    binary: PathBuf,
    input: Option<Parameter>,
    output: Option<Parameter>,
    parameters: Vec<Parameter>,
    input_transformer: Option<Arc<dyn InputTransformer>>,
    output_transformer: Option<Arc<dyn OutputTransformer>>,
    invoker: Arc<dyn Invoker>,
    settings: InvocationSettings,
    result_suffix: Option<String>,
}

impl MotifCounter {
    /// Starts an adapter for the program at `binary`.
    ///
    /// The binary is resolved first, so a missing program is reported before
    /// any parameter is built.
    pub fn builder(
        program: impl Into<String>,
        binary: impl AsRef<Path>,
    ) -> MotifResult<MotifCounterBuilder> {
        let program = program.into();
        let binary = resolve_binary(&program, binary.as_ref())?;
        Ok(MotifCounterBuilder {
            program,
            binary,
            input: None,
            output: None,
            parameters: Vec::new(),
            input_transformer: None,
            output_transformer: None,
            invoker: Arc::new(SubprocessInvoker),
            settings: InvocationSettings::default(),
            result_suffix: None,
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    pub fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }

    pub fn parameter(&self, key: &str) -> MotifResult<&Parameter> {
        self.parameters.get(key)
    }

    pub fn set_parameter(
        &mut self,
        key: &str,
        value: impl Into<ParameterValue>,
    ) -> MotifResult<()> {
        self.parameters.set_value(key, value)
    }

    pub fn parameter_mut(&mut self, key: &str) -> MotifResult<&mut Parameter> {
        self.parameters.get_mut(key)
    }

    pub fn settings(&self) -> &InvocationSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: InvocationSettings) {
        self.settings = settings;
    }

    pub fn input_transformer(&self) -> &dyn InputTransformer {
        self.input_transformer.as_ref()
    }

    pub fn output_transformer(&self) -> &dyn OutputTransformer {
        self.output_transformer.as_ref()
    }

    /// Runs the program once on `graph` and parses its report.
    pub fn count(&self, graph: &dyn Graph) -> MotifResult<ResultTable> {
        let started = Instant::now();
        let validated = self.validate(graph)?;
        let scratch = ScratchSpace::create(self.settings.scratch_root.as_deref())?;
        let outcome = self.run_in(&scratch, validated);
        scratch.close();

        match &outcome {
            Ok(table) => tracing::info!(
                program = %self.program,
                rows = table.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "motif count finished"
            ),
            Err(error) => tracing::debug!(program = %self.program, %error, "motif count failed"),
        }
        outcome
    }

    fn run_in(
        &self,
        scratch: &ScratchSpace,
        validated: ValidatedRun<'_>,
    ) -> MotifResult<ResultTable> {
        let staged = self.stage_input(scratch, validated)?;
        let staged = self.stage_output(scratch, staged)?;
        let assembled = self.assemble(scratch, staged);
        let invoked = self.invoke(assembled)?;
        self.parse_output(invoked)
    }

    fn validate<'g>(&self, graph: &'g dyn Graph) -> MotifResult<ValidatedRun<'g>> {
        tracing::debug!(program = %self.program, "validating parameters");
        self.parameters.validate_all()?;
        Ok(ValidatedRun {
            graph,
            parameters: self.parameters.clone(),
        })
    }

    fn stage_input(
        &self,
        scratch: &ScratchSpace,
        run: ValidatedRun<'_>,
    ) -> MotifResult<InputStagedRun> {
        let ValidatedRun {
            graph,
            mut parameters,
        } = run;
        let route = Route::of(parameters.get(&self.input_key)?.value());
        tracing::debug!(program = %self.program, ?route, "staging input");
        let input = match route {
            Route::Stream => StagedInput::Stream(self.input_transformer.render(graph)?.to_text()),
            Route::Temporary => {
                let path = scratch.temp_file(INPUT_FILE_PREFIX)?;
                self.input_transformer.to_file(graph, &path)?;
                parameters.set_value(&self.input_key, path_value(&path))?;
                StagedInput::temporary(path)
            }
            Route::Path(path) => {
                let path = caller_path(&path)?;
                self.input_transformer.to_file(graph, &path)?;
                parameters.set_value(&self.input_key, path_value(&path))?;
                StagedInput::caller(path)
            }
        };
        if let StagedInput::File { path, .. } = &input {
            tracing::debug!(program = %self.program, input = %path.display(), "wrote input file");
        }
        Ok(InputStagedRun { parameters, input })
    }

    fn stage_output(
        &self,
        scratch: &ScratchSpace,
        run: InputStagedRun,
    ) -> MotifResult<OutputStagedRun> {
        let InputStagedRun {
            mut parameters,
            input,
        } = run;
        let route = Route::of(parameters.get(&self.output_key)?.value());
        tracing::debug!(program = %self.program, ?route, "staging output");
        let output = match route {
            Route::Stream => StagedOutput::Stream,
            Route::Temporary => {
                let path = scratch.reserve(OUTPUT_FILE_NAME);
                parameters.set_value(&self.output_key, path_value(&path))?;
                StagedOutput::File {
                    result_path: self.result_path(&path),
                }
            }
            Route::Path(path) => {
                let path = caller_path(&path)?;
                parameters.set_value(&self.output_key, path_value(&path))?;
                let result_path = self.result_path(&path);
                remove_stale_result(&result_path)?;
                StagedOutput::File { result_path }
            }
        };
        Ok(OutputStagedRun {
            parameters,
            input,
            output,
        })
    }

    fn assemble(&self, scratch: &ScratchSpace, run: OutputStagedRun) -> AssembledRun {
        let OutputStagedRun {
            parameters,
            input,
            output,
        } = run;
        let mut skipped = Vec::new();
        if input.is_stream() {
            skipped.push(self.input_key.as_str());
        }
        if matches!(output, StagedOutput::Stream) {
            skipped.push(self.output_key.as_str());
        }
        let command = CommandLine {
            program: self.binary.clone(),
            arguments: assemble_arguments(&parameters, &skipped),
            working_dir: scratch.path().to_path_buf(),
            stdin: input.stdin_text(),
        };
        tracing::debug!(command = %command.render(), "assembled command line");
        AssembledRun {
            input,
            output,
            command,
        }
    }

    fn invoke(&self, run: AssembledRun) -> MotifResult<InvokedRun> {
        let AssembledRun {
            input,
            output,
            command,
        } = run;
        let process = self.invoker.invoke(&command, self.settings.timeout())?;
        // Temporary input is only needed while the child runs.
        drop(input);
        tracing::debug!(
            program = %self.program,
            exit_code = ?process.exit_code,
            elapsed_ms = process.elapsed.as_millis() as u64,
            "counter process exited"
        );
        check_exit(&command, &process, self.settings.stderr_policy)?;
        Ok(InvokedRun { output, process })
    }

    fn parse_output(&self, run: InvokedRun) -> MotifResult<ResultTable> {
        match run.output {
            StagedOutput::Stream => self.output_transformer.parse(&run.process.stdout),
            StagedOutput::File { result_path } => {
                if !result_path.is_file() {
                    return Err(MotifError::process(
                        "PROCESS.OUTPUT_MISSING",
                        format!(
                            "'{}' exited cleanly but did not write '{}'",
                            self.binary.display(),
                            result_path.display()
                        ),
                    ));
                }
                self.output_transformer.parse_file(&result_path)
            }
        }
    }

    fn result_path(&self, output_path: &Path) -> PathBuf {
        match &self.result_suffix {
            Some(suffix) => {
                let mut joined = OsString::from(output_path.as_os_str());
                joined.push(suffix);
                PathBuf::from(joined)
            }
            None => output_path.to_path_buf(),
        }
    }
}

impl MotifCounterBuilder {
    /// Parameter carrying the input route: `"-"` streams via stdin, empty
    /// asks for a temporary file, anything else is a caller path.
    pub fn input_parameter(mut self, parameter: Parameter) -> Self {
        self.input = Some(parameter);
        self
    }

    /// Parameter carrying the output route, read like the input one.
    pub fn output_parameter(mut self, parameter: Parameter) -> Self {
        self.output = Some(parameter);
        self
    }

    pub fn parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn parameters(mut self, parameters: impl IntoIterator<Item = Parameter>) -> Self {
        self.parameters.extend(parameters);
        self
    }

    pub fn input_transformer(mut self, transformer: Arc<dyn InputTransformer>) -> Self {
        self.input_transformer = Some(transformer);
        self
    }

    pub fn output_transformer(mut self, transformer: Arc<dyn OutputTransformer>) -> Self {
        self.output_transformer = Some(transformer);
        self
    }

    pub fn invoker(mut self, invoker: Arc<dyn Invoker>) -> Self {
        self.invoker = invoker;
        self
    }

    pub fn settings(mut self, settings: InvocationSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Suffix the program appends to the output argument when naming its report.
    pub fn result_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.result_suffix = Some(suffix.into());
        self
    }

    pub fn build(self) -> MotifResult<MotifCounter> {
        let incomplete = |part: &str| {
            MotifError::adapter(
                "ADAPTER.INCOMPLETE",
                format!("adapter for {} is missing its {}", self.program, part),
            )
        };
        let input = self.input.clone().ok_or_else(|| incomplete("input parameter"))?;
        let output = self.output.clone().ok_or_else(|| incomplete("output parameter"))?;
        let input_transformer = self
            .input_transformer
            .clone()
            .ok_or_else(|| incomplete("input transformer"))?;
        let output_transformer = self
            .output_transformer
            .clone()
            .ok_or_else(|| incomplete("output transformer"))?;

        let input_key = input.name().to_string();
        let output_key = output.name().to_string();
        let mut parameters = ParameterSet::new();
        parameters.add(input)?;
        parameters.add(output)?;
        for parameter in self.parameters {
            parameters.add(parameter)?;
        }

        Ok(MotifCounter {
            program: self.program,
            binary: self.binary,
            parameters,
            input_key,
            output_key,
            input_transformer,
            output_transformer,
            invoker: self.invoker,
            settings: self.settings,
            result_suffix: self.result_suffix,
        })
    }
}

fn resolve_binary(program: &str, binary: &Path) -> MotifResult<PathBuf> {
    let resolved = binary.canonicalize().map_err(|source| {
        MotifError::adapter(
            "ADAPTER.BINARY_NOT_FOUND",
            format!(
                "{} binary not found at '{}': {}",
                program,
                binary.display(),
                source
            ),
        )
    })?;
    if !resolved.is_file() {
        return Err(MotifError::adapter(
            "ADAPTER.BINARY_NOT_FOUND",
            format!("{} binary '{}' is not a file", program, resolved.display()),
        ));
    }
    Ok(resolved)
}

/// Anchors a caller path at the caller's working directory, since the child
/// runs inside the scratch directory.
fn caller_path(path: &Path) -> MotifResult<PathBuf> {
    std::path::absolute(path).map_err(|source| {
        MotifError::io_system(
            "IO.CALLER_PATH",
            format!("failed to resolve '{}': {}", path.display(), source),
        )
    })
}

/// A report left by an earlier run must not pass for this run's output.
fn remove_stale_result(result_path: &Path) -> MotifResult<()> {
    match fs::remove_file(result_path) {
        Ok(()) => {
            tracing::debug!(result = %result_path.display(), "removed previous result file");
            Ok(())
        }
        Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
        Err(source) => Err(MotifError::io_system(
            "IO.OUTPUT_PREPARE",
            format!(
                "failed to remove previous result '{}': {}",
                result_path.display(),
                source
            ),
        )),
    }
}

fn path_value(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::{CommandLine, Invoker, MotifCounter, ProcessOutput};
    use crate::common::constants::STREAM_SENTINEL;
    use crate::domain::{EdgeListGraph, MotifErrorCategory, MotifResult, Record, ResultTable};
    use crate::parameters::validators::is_le;
    use crate::parameters::{Parameter, ParameterValue};
    use crate::transform::{EdgeListTransformer, OutputTransformer};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tempfile::{NamedTempFile, TempDir};

    /// Answers every invocation with canned stdout and records what it was asked to run.
    #[derive(Default)]
    struct RecordingInvoker {
        stdout: String,
        seen: Mutex<Vec<CommandLine>>,
    }

    impl Invoker for RecordingInvoker {
        fn invoke(&self, command: &CommandLine, _timeout: Duration) -> MotifResult<ProcessOutput> {
            self.seen
                .lock()
                .expect("recording lock should not be poisoned")
                .push(command.clone());
            Ok(ProcessOutput {
                exit_code: Some(0),
                stdout: self.stdout.clone(),
                stderr: String::new(),
                elapsed: Duration::ZERO,
            })
        }
    }

    struct LineCount;

    impl OutputTransformer for LineCount {
        fn grammar(&self) -> &'static str {
            "line-count"
        }

        fn parse(&self, raw: &str) -> MotifResult<ResultTable> {
            let mut table = ResultTable::new();
            table.push(Record::new().with("lines", raw.lines().count() as i64))?;
            Ok(table)
        }
    }

    fn adapter(
        binary: &NamedTempFile,
        invoker: Arc<RecordingInvoker>,
        input: &str,
        output: &str,
    ) -> MotifCounter {
        MotifCounter::builder("fake", binary.path())
            .expect("binary should resolve")
            .input_parameter(
                Parameter::file_path("i")
                    .alias("fake_in")
                    .default_value(input)
                    .build()
                    .expect("input parameter should build"),
            )
            .output_parameter(
                Parameter::file_path("o")
                    .alias("fake_out")
                    .default_value(output)
                    .build()
                    .expect("output parameter should build"),
            )
            .parameter(
                Parameter::integer("s")
                    .alias("motif_size")
                    .default_value(3)
                    .validator(is_le(8))
                    .build()
                    .expect("size parameter should build"),
            )
            .input_transformer(Arc::new(EdgeListTransformer::new("\t")))
            .output_transformer(Arc::new(LineCount))
            .invoker(invoker)
            .build()
            .expect("adapter should build")
    }

    fn triangle() -> EdgeListGraph {
        EdgeListGraph::directed().with_edges([("a", "b"), ("b", "c"), ("c", "a")])
    }

    #[test]
    fn missing_binary_is_adapter_error() {
        let error = MotifCounter::builder("fake", "/no/such/binary")
            .err()
            .expect("missing binary should fail");
        assert_eq!(error.category(), MotifErrorCategory::AdapterError);
        assert_eq!(error.placeholder(), "ADAPTER.BINARY_NOT_FOUND");
    }

    #[test]
    fn duplicate_alias_across_io_and_algorithm_parameters_is_rejected() {
        let binary = NamedTempFile::new().expect("fake binary should be created");
        let error = MotifCounter::builder("fake", binary.path())
            .expect("binary should resolve")
            .input_parameter(
                Parameter::file_path("i")
                    .alias("shared")
                    .build()
                    .expect("input should build"),
            )
            .output_parameter(
                Parameter::file_path("o")
                    .alias("shared")
                    .build()
                    .expect("output should build"),
            )
            .input_transformer(Arc::new(EdgeListTransformer::new("\t")))
            .output_transformer(Arc::new(LineCount))
            .build()
            .err()
            .expect("alias collision should fail");
        assert_eq!(error.placeholder(), "ADAPTER.DUPLICATE_PARAMETER");
    }

    #[test]
    fn streamed_io_pipes_rendering_and_skips_io_arguments() {
        let binary = NamedTempFile::new().expect("fake binary should be created");
        let invoker = Arc::new(RecordingInvoker {
            stdout: "one\ntwo\n".to_string(),
            ..RecordingInvoker::default()
        });
        let counter = adapter(&binary, invoker.clone(), STREAM_SENTINEL, STREAM_SENTINEL);

        let table = counter.count(&triangle()).expect("run should succeed");
        assert_eq!(table.rows()[0].get("lines").and_then(|v| v.as_i64()), Some(2));

        let seen = invoker.seen.lock().expect("recording lock should not be poisoned");
        assert_eq!(seen[0].arguments, vec!["-s", "3"]);
        assert_eq!(seen[0].stdin.as_deref(), Some("1\t2\n2\t3\n3\t1\n"));
    }

    #[test]
    fn temporary_input_is_passed_by_path_and_removed_afterwards() {
        let binary = NamedTempFile::new().expect("fake binary should be created");
        let invoker = Arc::new(RecordingInvoker {
            stdout: "x\n".to_string(),
            ..RecordingInvoker::default()
        });
        let counter = adapter(&binary, invoker.clone(), "", STREAM_SENTINEL);

        counter.count(&triangle()).expect("run should succeed");

        let seen = invoker.seen.lock().expect("recording lock should not be poisoned");
        assert_eq!(seen[0].arguments[0], "-i");
        let input_path = std::path::PathBuf::from(&seen[0].arguments[1]);
        assert!(input_path.starts_with(&seen[0].working_dir));
        assert!(!input_path.exists());
        assert!(!seen[0].working_dir.exists());
        assert_eq!(
            counter.parameter("i").expect("input is registered").value(),
            Some(&ParameterValue::from("")),
            "run-time paths must not leak into the adapter's parameters"
        );
    }

    #[test]
    fn caller_input_file_is_written_and_kept() {
        let binary = NamedTempFile::new().expect("fake binary should be created");
        let temp = TempDir::new().expect("tempdir should be created");
        let input_path = temp.path().join("graph.txt");
        let invoker = Arc::new(RecordingInvoker {
            stdout: "x\n".to_string(),
            ..RecordingInvoker::default()
        });
        let counter = adapter(
            &binary,
            invoker,
            input_path.to_str().expect("temp path should be utf-8"),
            STREAM_SENTINEL,
        );

        counter.count(&triangle()).expect("run should succeed");
        assert_eq!(
            std::fs::read_to_string(&input_path).expect("caller input should remain"),
            "1\t2\n2\t3\n3\t1\n"
        );
    }

    #[test]
    fn missing_output_file_after_clean_exit_is_process_error() {
        let binary = NamedTempFile::new().expect("fake binary should be created");
        let counter = adapter(&binary, Arc::new(RecordingInvoker::default()), STREAM_SENTINEL, "");
        let error = counter.count(&triangle()).expect_err("no report should fail");
        assert_eq!(error.category(), MotifErrorCategory::ProcessError);
        assert_eq!(error.placeholder(), "PROCESS.OUTPUT_MISSING");
    }

    #[test]
    fn rejected_assignment_does_not_reach_command_line() {
        let binary = NamedTempFile::new().expect("fake binary should be created");
        let invoker = Arc::new(RecordingInvoker::default());
        let mut counter = adapter(&binary, invoker.clone(), STREAM_SENTINEL, STREAM_SENTINEL);
        counter
            .set_parameter("motif_size", 12)
            .expect_err("12 is out of range");
        counter
            .parameter_mut("s")
            .expect("size is registered")
            .set_value(4)
            .expect("4 is in range");
        counter.count(&triangle()).expect("valid run should succeed");
        assert_eq!(
            invoker.seen.lock().expect("recording lock should not be poisoned")[0].arguments,
            vec!["-s", "4"]
        );
    }
}
