use std::{ffi::OsString, path::PathBuf, time::Instant};

use clap::Parser;
use color_eyre::eyre::{self, Context};
use frameloop::{
    chain::Chaining,
    frames::{self, Order},
    manifest::{Encode, EncodeCommands, Manifest},
    report::Report,
    sequence::{sequence, SequenceError},
    signature::Downscale,
};
use frameloop_common::{
    bin_common::{
        init::{init_eyre, init_logger, stdout_level},
        termination,
    },
    utils::fsutils::read_optional_file,
};

#[derive(Parser, Debug)]
#[command()]
/// Puts shuffled frames back in order by how similar they look, and writes an ffmpeg
/// concat playlist that loops seamlessly.
///
/// This uses rayon, so the `RAYON_NUM_THREADS` environment variable might be of interest.
struct Cli {
    #[command(flatten)]
    downscale_args: Downscale,

    #[command(flatten)]
    chaining_args: Chaining,

    #[command(flatten)]
    encode_args: Encode,

    /// Seed the initial shuffle of the frames, for reproducible orderings
    #[arg(long, conflicts_with = "no_shuffle")]
    seed: Option<u64>,

    /// Don't shuffle the frames before ordering them, use their path order
    #[arg(long)]
    no_shuffle: bool,

    /// Write a report of every chaining step to this file
    #[arg(long)]
    report: Option<PathBuf>,

    /// A file to additionally write the logs to
    #[arg(long)]
    logfile: Option<PathBuf>,

    /// Also log per-frame details
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Folder with the shuffled frames
    directory: PathBuf,
}

impl Cli {
    fn order(&self) -> Order {
        match (self.no_shuffle, self.seed) {
            (true, _) => Order::Sorted,
            (false, Some(seed)) => Order::Seeded(seed),
            (false, None) => Order::Shuffled,
        }
    }
}

fn cli_arguments() -> eyre::Result<Cli> {
    const ARGS_FILE: &str = ".framelooprc";
    let mut args: Vec<OsString> = std::env::args_os().collect();

    if args.len() == 1 {
        if let Some(flags) = read_optional_file(ARGS_FILE)
            .wrap_err_with(|| format!("Could not read config file at: {ARGS_FILE}"))?
        {
            args.extend(flags.split_whitespace().map(OsString::from));
        }
    }

    Ok(Cli::parse_from(args))
}

fn main() -> eyre::Result<()> {
    init_eyre()?;
    let cli = cli_arguments()?;
    init_logger(cli.logfile.as_deref(), stdout_level(cli.verbose))?;
    log::debug!("CLI arguments: {cli:#?}");

    let fps = cli.encode_args.frame_rate();
    eyre::ensure!(
        fps.is_finite() && fps > 0.0,
        "the frame rate must be positive, got {fps}"
    );

    let term_cookie =
        termination::Cookie::new().wrap_err("failed to create term cookie")?;

    log::info!("Finding frames in: {}", cli.directory.display());
    let paths = frames::discover(&cli.directory, cli.order()).wrap_err_with(|| {
        format!("failed to list the frames in: {}", cli.directory.display())
    })?;

    log::info!("Loading {} frames", paths.len());
    let before = Instant::now();
    let loaded = frames::load_signatures(paths, &cli.downscale_args);
    log::info!(
        "Loaded {} frames in {}, {} could not be read",
        loaded.frames.len(),
        humantime::Duration::from(before.elapsed()),
        loaded.excluded.len()
    );

    let before = Instant::now();
    let sequenced = match sequence(loaded.frames, &cli.chaining_args, || {
        term_cookie.is_terminating()
    }) {
        Ok(sequenced) => sequenced,
        Err(SequenceError::EmptyInput) => {
            log::error!("No valid frames found in: {}", cli.directory.display());
            return Ok(());
        }
    };
    let chain = &sequenced.chain;
    log::info!(
        "Chained {} frames in {}, starting with the outlier: {}",
        chain.len(),
        humantime::Duration::from(before.elapsed()),
        chain.ids[0].display()
    );
    log::info!(
        "Step distances: mean {:.0}, std dev {:.0}, max {:.0}, {} early exits",
        chain.stats.mean(),
        chain.stats.std_dev(),
        chain.stats.max().unwrap_or(0.0),
        chain.early_exits()
    );

    let list = cli.encode_args.list_path();
    Manifest::new(&chain.ids, fps)
        .save(list)
        .wrap_err("failed to save the playlist")?;
    log::info!("Wrote the playlist to: {}", list.display());

    if let Some(report) = &cli.report {
        Report::new(&sequenced, &loaded.excluded)
            .save(report)
            .wrap_err("failed to save the report")?;
        log::info!("Wrote the report to: {}", report.display());
    }

    let commands = EncodeCommands::new(&cli.encode_args);
    println!("{}", commands.concat);
    println!();
    println!("To blend in between the frames in a cpu heavy way (seamless loop):");
    println!("{}", commands.interpolate);

    Ok(())
}
