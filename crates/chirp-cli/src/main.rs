use std::path::{Path, PathBuf};

use chirp_core::{render_assets, render_to_file, AssetTable, Effect, RenderSummary};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{self, eyre, WrapErr};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Command
    #[command(subcommand)]
    cmd: SubCmd,
}

#[derive(Subcommand, Debug)]
enum SubCmd {
    /// Render every asset of the table
    RenderAll(RenderAllCmd),
    /// Render a single clip
    Render(RenderCmd),
    /// Print the asset table
    List(ListCmd),
}

#[derive(Parser, Debug)]
struct RenderAllCmd {
    /// Output directory
    #[arg(short, long, default_value = "src/assets/sounds")]
    out_dir: PathBuf,

    /// Asset table (TOML); the built-in set is used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for the music loop noise
    #[arg(long)]
    seed: Option<u64>,

    /// Sample rate, overriding the table
    #[arg(short, long)]
    sample_rate: Option<u32>,
}

#[derive(Parser, Debug)]
struct RenderCmd {
    /// Effect: drop, merge or music-loop
    effect: Effect,

    /// Output .wav path
    output: PathBuf,

    /// Duration in seconds
    #[arg(short, long)]
    duration: Option<f64>,

    /// Volume in (0, 1]
    #[arg(short, long)]
    volume: Option<f64>,

    /// Sample rate
    #[arg(short, long)]
    sample_rate: Option<u32>,

    /// Seed for the music loop noise
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser, Debug)]
struct ListCmd {
    /// Asset table (TOML); the built-in set is used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn load_table(config: Option<&Path>) -> eyre::Result<AssetTable> {
    match config {
        Some(path) => AssetTable::load(path)
            .wrap_err_with(|| format!("could not load asset table {}", path.display())),
        None => Ok(AssetTable::default()),
    }
}

fn report(summary: &RenderSummary) {
    println!(
        "{}: {} samples at {} Hz, peak {}",
        summary.path.display(),
        summary.samples,
        summary.sample_rate,
        summary.peak
    );
}

fn run_render_all(cmd: RenderAllCmd) -> eyre::Result<()> {
    let mut table = load_table(cmd.config.as_deref())?;
    if let Some(sample_rate) = cmd.sample_rate {
        table.sample_rate = sample_rate;
    }

    let summaries = render_assets(&table, &cmd.out_dir, cmd.seed)
        .wrap_err_with(|| format!("could not render assets into {}", cmd.out_dir.display()))?;
    for summary in &summaries {
        report(summary);
    }

    Ok(())
}

fn run_render(cmd: RenderCmd) -> eyre::Result<()> {
    let defaults = AssetTable::default();
    let entry = defaults
        .entry_for(cmd.effect)
        .ok_or_else(|| eyre!("no defaults for effect {}", cmd.effect))?;

    let mut entry = entry.clone();
    if let Some(duration) = cmd.duration {
        entry.duration = duration;
    }
    if let Some(volume) = cmd.volume {
        entry.volume = volume;
    }
    let sample_rate = cmd.sample_rate.unwrap_or(defaults.sample_rate);

    let summary = render_to_file(entry.clip(sample_rate, cmd.seed), &cmd.output)
        .wrap_err_with(|| format!("could not render {}", cmd.effect))?;
    report(&summary);

    Ok(())
}

fn run_list(cmd: ListCmd) -> eyre::Result<()> {
    let table = load_table(cmd.config.as_deref())?;

    println!("sample rate: {} Hz", table.sample_rate);
    for entry in &table.assets {
        println!(
            "{:<12} {:<10} {:>6.2}s  volume {:.2}",
            entry.name,
            entry.effect.name(),
            entry.duration,
            entry.volume
        );
    }

    Ok(())
}

fn setup_logging() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("chirp_core=info".parse()?))
        .init();

    Ok(())
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    setup_logging()?;

    let args = Args::parse();

    match args.cmd {
        SubCmd::RenderAll(cmd) => run_render_all(cmd)?,
        SubCmd::Render(cmd) => run_render(cmd)?,
        SubCmd::List(cmd) => run_list(cmd)?,
    }

    Ok(())
}
