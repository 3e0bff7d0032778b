//! Command-line front end: one subcommand per demo feature.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

use crate::city::{MapError, Province, load_city_data};
use crate::generator::{GraphError, RandomSimpleGraphGenerator, SamplingStrategy};
use crate::graph::SimpleGraph;
use crate::map::{CityMap, DeckSpec, MapStyle};
use crate::render::{self, GraphStyle, RenderError};

const DEFAULT_NODES: usize = 5;
const DEFAULT_EDGES: usize = 5;

#[derive(Debug, Parser, Clone)]
#[command(name = "graph-demo", about = "Random graphs and city connectivity maps.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Generate a random simple graph.
    Graph(GraphCommand),
    /// Build the city connectivity map for a province.
    Map(MapCommand),
}

#[derive(Debug, Args, Clone)]
pub struct GraphCommand {
    /// Number of nodes.
    #[arg(long, default_value_t = DEFAULT_NODES)]
    pub nodes: usize,

    /// Number of edges.
    #[arg(long, default_value_t = DEFAULT_EDGES)]
    pub edges: usize,

    /// Seed for reproducible output.
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, value_enum, default_value_t = StrategyArg::Rejection)]
    pub strategy: StrategyArg,

    /// Write Graphviz DOT to this path.
    #[arg(long)]
    pub dot: Option<PathBuf>,

    /// Render a PNG with Graphviz (DOT is written next to it unless `--dot` is set).
    #[arg(long)]
    pub png: Option<PathBuf>,

    /// Open the rendered PNG in the default viewer.
    #[arg(long, requires = "png")]
    pub open: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    Rejection,
    CandidatePool,
    Auto,
}

impl From<StrategyArg> for SamplingStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Rejection => Self::Rejection,
            StrategyArg::CandidatePool => Self::CandidatePool,
            StrategyArg::Auto => Self::Auto,
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct MapCommand {
    #[arg(long, default_value = "West Java")]
    pub province: Province,

    /// City data JSON (defaults to the province's data file).
    #[arg(long)]
    pub data: Option<PathBuf>,

    #[arg(long)]
    pub cities_csv: Option<PathBuf>,

    #[arg(long)]
    pub connections_csv: Option<PathBuf>,

    /// Write the deck layer description as JSON.
    #[arg(long)]
    pub deck: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to create `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error(transparent)]
    Map(#[from] MapError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Result of running a command, rendered by [`render_summary`].
#[derive(Debug, Clone)]
pub enum Summary {
    Graph(SimpleGraph),
    Map(CityMap),
}

/// Executes the command described by `cli`.
///
/// # Errors
/// Returns [`CliError`] when generation, loading, or file output fails.
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<Summary, CliError> {
    let span = Span::current();
    match cli.command {
        Command::Graph(command) => {
            span.record("command", "graph");
            run_graph(command).map(Summary::Graph)
        }
        Command::Map(command) => {
            span.record("command", "map");
            run_map(command).map(Summary::Map)
        }
    }
}

#[instrument(
    name = "cli.graph",
    err,
    skip(command),
    fields(nodes = command.nodes, edges = command.edges, seed = field::Empty),
)]
pub(crate) fn run_graph(command: GraphCommand) -> Result<SimpleGraph, CliError> {
    let strategy = SamplingStrategy::from(command.strategy);
    let graph = match command.seed {
        Some(seed) => {
            Span::current().record("seed", seed);
            RandomSimpleGraphGenerator::seeded(seed)
                .with_strategy(strategy)
                .generate(command.nodes, command.edges)?
        }
        None => RandomSimpleGraphGenerator::new()
            .with_strategy(strategy)
            .generate(command.nodes, command.edges)?,
    };

    let style = GraphStyle::default();
    let dot_path = command
        .dot
        .or_else(|| command.png.as_ref().map(|png| png.with_extension("dot")));
    if let Some(dot_path) = &dot_path {
        render::save_dot(&graph, &style, dot_path)?;
    }
    if let (Some(dot_path), Some(png)) = (&dot_path, &command.png) {
        render::render_png(dot_path, png)?;
        if command.open {
            render::open_image(png)?;
        }
    }

    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        isolated = graph.isolated_nodes().count(),
        "graph command completed"
    );
    Ok(graph)
}

#[instrument(
    name = "cli.map",
    err,
    skip(command),
    fields(province = command.province.name(), data = field::Empty),
)]
pub(crate) fn run_map(command: MapCommand) -> Result<CityMap, CliError> {
    let data_path = command
        .data
        .unwrap_or_else(|| PathBuf::from(command.province.default_data_file()));
    Span::current().record("data", field::display(data_path.display()));

    let data = load_city_data(&data_path)?;
    let map = CityMap::from_data(&data);

    if let Some(path) = &command.cities_csv {
        map.write_cities_csv(create_output(path)?)?;
    }
    if let Some(path) = &command.connections_csv {
        map.write_connections_csv(create_output(path)?)?;
    }
    if let Some(path) = &command.deck {
        let spec = DeckSpec::for_map(&map, &MapStyle::for_province(command.province));
        let mut writer = create_output(path)?;
        spec.write_json(&mut writer)?;
        writer.flush().map_err(|source| CliError::Io {
            path: path.clone(),
            source,
        })?;
    }

    info!(
        cities = map.cities.len(),
        connections = map.connections.len(),
        skipped = map.skipped,
        "map command completed"
    );
    Ok(map)
}

fn create_output(path: &Path) -> Result<BufWriter<File>, CliError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Writes a plain-text summary of `summary` to `writer`.
///
/// Graphs print `nodes: N` and `edges: M`, then one tab-separated edge per
/// line; maps print city and connection counts, plus `skipped: K` when any
/// connection named an unknown city.
///
/// # Errors
/// Returns [`io::Error`] if writing fails.
pub fn render_summary(summary: &Summary, mut writer: impl Write) -> io::Result<()> {
    match summary {
        Summary::Graph(graph) => {
            writeln!(writer, "nodes: {}", graph.node_count())?;
            writeln!(writer, "edges: {}", graph.edge_count())?;
            for edge in graph.edges() {
                writeln!(writer, "{}\t{}", edge.low(), edge.high())?;
            }
        }
        Summary::Map(map) => {
            writeln!(writer, "cities: {}", map.cities.len())?;
            writeln!(writer, "connections: {}", map.connections.len())?;
            if map.skipped > 0 {
                writeln!(writer, "skipped: {}", map.skipped)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case(&["graph-demo", "graph"], DEFAULT_NODES, DEFAULT_EDGES, None)]
    #[case(&["graph-demo", "graph", "--nodes", "7", "--edges", "3", "--seed", "9"], 7, 3, Some(9))]
    fn graph_arguments_parse(
        #[case] args: &[&str],
        #[case] nodes: usize,
        #[case] edges: usize,
        #[case] seed: Option<u64>,
    ) {
        let cli = Cli::try_parse_from(args).expect("arguments must parse");
        let Command::Graph(command) = cli.command else {
            panic!("expected graph command");
        };
        assert_eq!((command.nodes, command.edges, command.seed), (nodes, edges, seed));
        assert_eq!(command.strategy, StrategyArg::Rejection);
    }

    #[test]
    fn strategy_argument_uses_kebab_case() {
        let cli = Cli::try_parse_from(["graph-demo", "graph", "--strategy", "candidate-pool"])
            .expect("arguments must parse");
        let Command::Graph(command) = cli.command else {
            panic!("expected graph command");
        };
        assert_eq!(
            SamplingStrategy::from(command.strategy),
            SamplingStrategy::CandidatePool
        );
    }

    #[test]
    fn map_defaults_to_west_java() {
        let cli = Cli::try_parse_from(["graph-demo", "map"]).expect("arguments must parse");
        let Command::Map(command) = cli.command else {
            panic!("expected map command");
        };
        assert_eq!(command.province, Province::WestJava);
        assert!(command.data.is_none());
    }

    #[test]
    fn map_rejects_unknown_province() {
        assert!(Cli::try_parse_from(["graph-demo", "map", "--province", "Bali"]).is_err());
    }

    #[test]
    fn open_requires_png() {
        assert!(Cli::try_parse_from(["graph-demo", "graph", "--open"]).is_err());
    }

    #[test]
    fn render_summary_lists_edges() {
        let graph = RandomSimpleGraphGenerator::seeded(3)
            .generate(2, 1)
            .expect("valid request");
        let mut buffer = Vec::new();
        render_summary(&Summary::Graph(graph), &mut buffer).expect("write to vec");
        let text = String::from_utf8(buffer).expect("utf-8");
        assert_eq!(text, "nodes: 2\nedges: 1\n0\t1\n");
    }
}
