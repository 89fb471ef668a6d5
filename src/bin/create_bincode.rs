use std::{path::PathBuf, time::Instant};

use clap::Parser;
use meeting_paths::graphs::graph_factory::GraphFactory;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Reading a .bincode file is way faster than a .fmi or .gr file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Infile in .fmi or .gr format
    #[arg(short, long)]
    infile: PathBuf,
    /// Outfile in .bincode format
    #[arg(short, long)]
    outfile: PathBuf,
    #[arg(long, default_value_t = Level::INFO)]
    log_level: Level,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let start = Instant::now();
    let graph = GraphFactory::from_file(&args.infile)?;
    println!("Reading graph took {:?}", start.elapsed());

    let start = Instant::now();
    GraphFactory::to_bincode_file(&graph, &args.outfile)?;
    println!("Writing bincode took {:?}", start.elapsed());

    Ok(())
}
