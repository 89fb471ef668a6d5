use std::{
    fs::File,
    io::BufWriter,
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use indicatif::ProgressIterator;
use meeting_paths::{
    graphs::{graph_factory::GraphFactory, road_graph::RoadGraph},
    search::{
        alt::{geographic::GeographicHeuristic, landmark::Landmarks},
        bidirectional::{BidirectionalSearch, QueueKind, SearchConfig},
        dijkstra::Dijkstra,
        path::{ShortestPathRequest, ShortestPathTestCase},
        DistanceHeuristic, PathFinding, TrivialHeuristic,
    },
    utility::{get_progressbar, get_progressspinner, random_requests},
};
use rand::{rngs::StdRng, SeedableRng};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum HeuristicKind {
    Trivial,
    Geographic,
    Landmarks,
}

/// Runs the concurrent bidirectional search on a graph, either for a single
/// pair of vertices or for a batch of random pairs, and compares the found
/// distances against Dijkstra.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Graph in `.fmi`, `.gr` or `.bincode` format
    #[arg(short, long)]
    graph: PathBuf,
    #[arg(short, long)]
    source: Option<u32>,
    #[arg(short, long)]
    target: Option<u32>,
    /// Number of random queries, used if no source and target are given
    #[arg(short, long, default_value_t = 100)]
    number_of_queries: u32,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    #[arg(long, value_enum, default_value_t = HeuristicKind::Trivial)]
    heuristic: HeuristicKind,
    /// Cost of one meter of beeline, used by the geographic heuristic
    #[arg(long, default_value_t = 1.0)]
    weight_per_meter: f64,
    #[arg(long, default_value_t = 16)]
    number_of_landmarks: u32,
    #[arg(long, value_enum, default_value_t = QueueKind::Keyed)]
    queue: QueueKind,
    #[arg(long, default_value_t = 1.0)]
    heuristic_scale: f64,
    /// Skip the comparison against Dijkstra
    #[arg(long)]
    no_reference: bool,
    /// Path where the test cases are written as json
    #[arg(short, long)]
    output: Option<PathBuf>,
    #[arg(long, default_value_t = Level::INFO)]
    log_level: Level,
}

fn build_heuristic<'a>(
    args: &Args,
    graph: &'a RoadGraph,
    rng: &mut StdRng,
) -> anyhow::Result<Box<dyn DistanceHeuristic + 'a>> {
    let heuristic: Box<dyn DistanceHeuristic + 'a> = match args.heuristic {
        HeuristicKind::Trivial => Box::new(TrivialHeuristic {}),
        HeuristicKind::Geographic => {
            if graph.coordinates().is_empty() {
                bail!("graph file has no coordinates for the geographic heuristic");
            }
            Box::new(GeographicHeuristic::new(
                graph.coordinates(),
                args.weight_per_meter,
            ))
        }
        HeuristicKind::Landmarks => {
            Box::new(Landmarks::random(graph, args.number_of_landmarks, rng))
        }
    };
    Ok(heuristic)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let spinner = get_progressspinner("Reading graph");
    let graph = GraphFactory::from_file(&args.graph)
        .with_context(|| format!("failed to read graph {:?}", args.graph))?;
    spinner.finish_and_clear();

    let mut rng = StdRng::seed_from_u64(args.seed);
    let heuristic = build_heuristic(&args, &graph, &mut rng)?;
    let config = SearchConfig {
        queue: args.queue,
        heuristic_scale: args.heuristic_scale,
    };
    let search = BidirectionalSearch::with_config(&graph, heuristic.as_ref(), config);
    let dijkstra = Dijkstra::new(&graph);

    let requests = match (args.source, args.target) {
        (Some(source), Some(target)) => vec![ShortestPathRequest { source, target }],
        (None, None) => random_requests(&graph, args.number_of_queries, &mut rng),
        _ => bail!("either both or none of source and target must be given"),
    };

    let mut test_cases = Vec::with_capacity(requests.len());
    for request in requests
        .iter()
        .progress_with(get_progressbar("Searching", requests.len() as u64))
    {
        let start = Instant::now();
        let report = search.search(request.source, request.target)?;
        let timing_in_seconds = start.elapsed().as_secs_f64();

        let exact_distance = if args.no_reference {
            None
        } else {
            dijkstra.shortest_path_distance(request.source, request.target)
        };

        test_cases.push(ShortestPathTestCase {
            request: *request,
            distance: report.path.as_ref().map(|path| path.distance),
            exact_distance,
            timing_in_seconds,
        });

        if requests.len() == 1 {
            match &report.path {
                Some(path) => println!(
                    "distance {} over {} vertices ({:?} / {:?})",
                    path.distance,
                    path.vertices.len(),
                    report.forward,
                    report.backward
                ),
                None => println!("no path from {} to {}", request.source, request.target),
            }
        }
    }

    let found = test_cases
        .iter()
        .filter(|test_case| test_case.distance.is_some())
        .count();
    let gaps: Vec<f64> = test_cases
        .iter()
        .filter_map(ShortestPathTestCase::gap)
        .collect();
    let average_time = test_cases
        .iter()
        .map(|test_case| test_case.timing_in_seconds)
        .sum::<f64>()
        / test_cases.len().max(1) as f64;

    info!(queries = test_cases.len(), found, "done");
    println!(
        "found {} of {} paths, took {:?} per query",
        found,
        test_cases.len(),
        Duration::from_secs_f64(average_time)
    );
    if !gaps.is_empty() {
        let average_gap = gaps.iter().sum::<f64>() / gaps.len() as f64;
        let maximum_gap = gaps.iter().copied().fold(0.0, f64::max);
        println!(
            "gap to dijkstra: average {:.4}%, maximum {:.4}%",
            average_gap * 100.0,
            maximum_gap * 100.0
        );
    }

    if let Some(output) = &args.output {
        let writer = BufWriter::new(
            File::create(output).with_context(|| format!("failed to create {:?}", output))?,
        );
        serde_json::to_writer(writer, &test_cases)?;
    }

    Ok(())
}
