//! Binary entrypoint for the image carousel.
//!
//! Delegates all carousel logic to the library crate.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use humantime::format_duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{Level, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::Directive;

use image_carousel::config::Configuration;
use image_carousel::controller::CarouselController;
use image_carousel::events::CarouselEvent;
use image_carousel::indicators::{DotIndicators, IndicatorSet};
use image_carousel::pager::PagerModel;
use image_carousel::scheduler::TokioScheduler;
use image_carousel::tasks;
use image_carousel::tasks::commands::{InputEnd, forward_commands};

#[derive(Debug, Parser)]
#[command(
    name = "image-carousel",
    version,
    about = "Self-rotating image carousel"
)]
struct Args {
    /// Path to YAML config
    #[arg(value_name = "CONFIG")]
    config: PathBuf,
    /// Override the advance interval (ms)
    #[arg(long, value_name = "MILLIS")]
    interval_ms: Option<u64>,
    /// Print the page timeline for this many simulated seconds and exit
    #[arg(long = "dry-run", value_name = "SECONDS")]
    dry_run: Option<u64>,
    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

/// Logs each indicator change along with the image now on screen.
struct ConsoleIndicators {
    dots: DotIndicators,
    images: Vec<PathBuf>,
}

impl IndicatorSet for ConsoleIndicators {
    fn len(&self) -> usize {
        self.dots.len()
    }

    fn activate(&mut self, index: usize) {
        self.dots.activate(index);
        let image = self.images.get(index).map(|p| p.display().to_string());
        info!(
            index,
            dots = %self.dots.render(),
            image = image.as_deref().unwrap_or("?"),
            "showing"
        );
    }
}

fn init_tracing(verbosity: u8) -> Result<()> {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::from_default_env().add_directive(
        format!("image_carousel={level}")
            .parse::<Directive>()
            .context("invalid log directive")?,
    );
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let Args {
        config,
        interval_ms,
        dry_run,
        verbose,
    } = Args::parse();
    init_tracing(verbose)?;

    let mut cfg = Configuration::from_yaml_file(&config)
        .with_context(|| format!("failed to load configuration from {}", config.display()))?;
    if let Some(ms) = interval_ms {
        cfg.advance_interval_ms = ms;
    }
    let cfg = cfg.validated().context("invalid configuration values")?;
    tracing::debug!("Loaded configuration from {}:\n{:#?}", config.display(), cfg);

    if let Some(seconds) = dry_run {
        print_dry_run(&cfg, Duration::from_secs(seconds))?;
        return Ok(());
    }

    // Single queue: timers, stdin gestures and pause/resume all land here.
    let (events_tx, events_rx) = mpsc::unbounded_channel::<CarouselEvent>();
    let cancel = CancellationToken::new();

    let carousel = CarouselController::new(
        &cfg,
        PagerModel::starting_at(cfg.item_count(), cfg.initial_index),
        ConsoleIndicators {
            dots: DotIndicators::new(cfg.item_count()),
            images: cfg.images.clone(),
        },
        TokioScheduler::new(events_tx.clone()),
    )
    .context("failed to build carousel")?;

    {
        let cancel = cancel.clone();
        let events_tx = events_tx.clone();
        // Plain thread so a blocked stdin read cannot hold up runtime shutdown.
        std::thread::spawn(move || {
            match forward_commands(io::stdin().lock(), &events_tx) {
                Ok(InputEnd::Quit) => info!("quit requested; initiating shutdown"),
                Ok(InputEnd::Eof) => info!("stdin closed; initiating shutdown"),
                Ok(InputEnd::CarouselGone) => return,
                Err(err) => warn!("stdin watcher failed: {err}"),
            }
            cancel.cancel();
        });
    }

    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!("ctrl-c handler failed: {err}");
                return;
            }
            info!("ctrl-c received; initiating shutdown");
            cancel.cancel();
        });
    }

    let last = tasks::carousel::run(carousel, events_rx, cancel).await;
    info!(index = last.current_index, "carousel stopped");
    Ok(())
}

fn print_dry_run(cfg: &Configuration, span: Duration) -> Result<()> {
    let frames =
        tasks::simulate::dry_run(cfg, span).context("failed to simulate carousel")?;

    println!(
        "# carousel dry run\n# images: {}\n# interval: {}\n# span: {}\n",
        cfg.item_count(),
        format_duration(cfg.advance_interval()),
        format_duration(span)
    );
    for frame in &frames {
        let image = cfg
            .images
            .get(frame.index)
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        println!(
            "  {:>10}  {}  [{}] {}",
            format_duration(frame.at).to_string(),
            frame.indicators,
            frame.index,
            image
        );
    }
    Ok(())
}
