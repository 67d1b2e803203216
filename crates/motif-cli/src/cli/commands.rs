use super::CliError;
use super::discovery::{find_binary, search_dirs};
use super::dispatch::{CounterCommandSpec, counter_command_spec, known_counter_commands};
use super::helpers::*;
use motif_core::common::AdjacencyMatrix;
use motif_core::counters::{NETMODE_ADJACENCY_GRAMMAR, output_grammar};
use motif_core::domain::{Graph, MotifError};
use motif_core::transform::InputTransformer;
use std::path::PathBuf;

#[derive(clap::Args)]
pub(super) struct CountArgs {
    /// Counter to run (mfinder, netmode, fanmod, pgd)
    counter: String,

    /// Graph file: an edge list, or a `.json` graph document
    #[arg(long, value_name = "FILE")]
    graph: PathBuf,

    /// Counter binary; overrides the config file and discovery
    #[arg(long, value_name = "PATH")]
    binary: Option<PathBuf>,

    /// Parameter assignment by name or alias, repeatable
    #[arg(long = "param", value_name = "KEY=VALUE")]
    params: Vec<String>,

    /// Seconds before the counter is killed
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Read an edge list graph as undirected
    #[arg(long)]
    undirected: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Write the table here instead of stdout
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,
}

#[derive(clap::Args)]
pub(super) struct ParamsArgs {
    /// Counter to describe
    counter: String,
}

#[derive(clap::Args)]
pub(super) struct ParseArgs {
    /// Report grammar: a counter name or `netmode-adjacency`
    grammar: String,

    /// Report file to parse
    file: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Write the table here instead of stdout
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,
}

#[derive(clap::Args)]
pub(super) struct RenderArgs {
    /// Counter whose input format is written
    counter: String,

    /// Graph file: an edge list, or a `.json` graph document
    #[arg(long, value_name = "FILE")]
    graph: PathBuf,

    /// Destination of the rendered input
    #[arg(long, value_name = "FILE")]
    output: PathBuf,

    /// Read an edge list graph as undirected
    #[arg(long)]
    undirected: bool,
}

#[derive(clap::Args)]
pub(super) struct MotifArgs {
    /// Motif id, the row-major bits of the adjacency matrix
    #[arg(long)]
    id: u64,

    /// Number of nodes in the motif
    #[arg(long)]
    size: usize,
}

pub(super) fn run_count_command(args: CountArgs, config: &CliConfig) -> Result<i32, CliError> {
    let spec = resolve_counter(&args.counter)?;
    let binary = resolve_binary(spec, args.binary, config)?;
    let graph = load_graph(&args.graph, !args.undirected)?;

    let mut counter = spec.kind.build(&binary)?;
    let mut settings = config.settings.clone();
    if let Some(timeout) = args.timeout {
        settings = settings.with_timeout(timeout);
    }
    counter.set_settings(settings);
    apply_parameters(&mut counter, config.parameters.get(spec.command), &args.params)?;

    tracing::info!(
        counter = spec.command,
        binary = %binary.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "counting motifs"
    );
    let table = counter.count(&graph)?;
    emit(&format_table(&table, args.format)?, args.output.as_deref())?;
    Ok(0)
}

pub(super) fn run_params_command(args: ParamsArgs) -> Result<i32, CliError> {
    let spec = resolve_counter(&args.counter)?;
    let described = spec
        .kind
        .parameters()?
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>();
    println!("{}", described.join("\n\n"));
    Ok(0)
}

pub(super) fn run_parse_command(args: ParseArgs) -> Result<i32, CliError> {
    let grammar = output_grammar(&args.grammar).map_err(|_| {
        CliError::Usage(format!(
            "unknown grammar '{}'; expected one of {}, {}",
            args.grammar,
            known_counter_commands(),
            NETMODE_ADJACENCY_GRAMMAR
        ))
    })?;
    let table = grammar.parse_file(&args.file)?;
    emit(&format_table(&table, args.format)?, args.output.as_deref())?;
    Ok(0)
}

pub(super) fn run_render_command(args: RenderArgs) -> Result<i32, CliError> {
    let spec = resolve_counter(&args.counter)?;
    let graph = load_graph(&args.graph, !args.undirected)?;
    spec.kind.input_transformer().to_file(&graph, &args.output)?;
    tracing::info!(
        counter = spec.command,
        output = %args.output.display(),
        "rendered counter input"
    );
    Ok(0)
}

pub(super) fn run_motif_command(args: MotifArgs) -> Result<i32, CliError> {
    let matrix = AdjacencyMatrix::from_motif_id(args.id, args.size)?;
    print!("{}", matrix);
    Ok(0)
}

fn resolve_counter(name: &str) -> Result<CounterCommandSpec, CliError> {
    counter_command_spec(name).ok_or_else(|| {
        CliError::Usage(format!(
            "unknown counter '{}'; expected one of {}",
            name,
            known_counter_commands()
        ))
    })
}

fn resolve_binary(
    spec: CounterCommandSpec,
    explicit: Option<PathBuf>,
    config: &CliConfig,
) -> Result<PathBuf, CliError> {
    if let Some(binary) = explicit.or_else(|| config.binaries.get(spec.command).cloned()) {
        return Ok(binary);
    }
    let dirs = search_dirs(&config.search_dirs);
    find_binary(spec.binary_patterns, &dirs)?.ok_or_else(|| {
        CliError::Compute(MotifError::adapter(
            "ADAPTER.BINARY_NOT_FOUND",
            format!(
                "no {} binary found; pass --binary or set binaries.{} in the config file",
                spec.kind.default_binary_name(),
                spec.command
            ),
        ))
    })
}
