use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use edfwindow::{downsample_min_max, DataSource, EdfReader, MockSource};
use futures::executor::block_on;
use log::info;

#[derive(Parser, Debug)]
#[command(
    name = "edfwindow",
    version = env!("CARGO_PKG_VERSION"),
    about = "Print the channel catalog of an EDF/BDF file and the min/max envelope of a window",
    long_about = None,
)]
struct Cli {
    /// EDF or BDF file (ignored with --mock)
    #[arg(required_unless_present = "mock")]
    file: Option<PathBuf>,
    /// Channel id to read
    #[arg(short, long, default_value = "0")]
    channel: usize,
    /// Window start in seconds
    #[arg(short, long, default_value = "0")]
    start: f64,
    /// Window length in seconds
    #[arg(short, long, default_value = "10")]
    duration: f64,
    /// Number of display buckets
    #[arg(short, long, default_value = "80")]
    buckets: usize,
    /// Use the synthetic source instead of a file
    #[arg(long)]
    mock: bool,
    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let source: Box<dyn DataSource> = match (&cli.file, cli.mock) {
        (_, true) => Box::new(MockSource::new()),
        (Some(path), false) => Box::new(
            EdfReader::open(path).with_context(|| format!("failed to open {}", path.display()))?,
        ),
        (None, false) => bail!("no input file given"),
    };

    info!(
        "{} channels, {:.3} s total",
        source.channels().len(),
        source.duration_seconds()
    );
    for channel in source.channels() {
        println!(
            "{:>3}  {:<16} {:>9.3} Hz  {}",
            channel.id, channel.label, channel.sample_rate_hz, channel.unit
        );
    }

    let window = block_on(source.read_window(cli.channel, cli.start, cli.duration))
        .with_context(|| format!("failed to read channel {}", cli.channel))?;
    info!(
        "window [{:.3}, {:.3}) s: {} samples",
        window.start_seconds,
        window.start_seconds + window.duration_seconds,
        window.samples.len()
    );

    let envelope = downsample_min_max(&window.samples, cli.buckets);
    for (i, (lo, hi)) in envelope.mins.iter().zip(&envelope.maxs).enumerate() {
        println!("{i:>5}  {lo:>12.4}  {hi:>12.4}");
    }

    Ok(())
}
