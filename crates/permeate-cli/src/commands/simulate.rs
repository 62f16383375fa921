use super::stats::{format_statistics, write_report};
use crate::cli::SimulateArgs;
use crate::config::PartialRunConfig;
use crate::error::Result;
use crate::ui::{CliProgressHandler, UiEvent};
use permeate::core::io::trajectory;
use permeate::engine::particles::Census;
use permeate::engine::progress::ProgressReporter;
use permeate::workflows;
use std::fmt::Write;
use tokio::sync::mpsc;
use tracing::{info, warn};

pub async fn run(args: SimulateArgs, ui_sender: mpsc::Sender<UiEvent>) -> Result<()> {
    let partial_config = PartialRunConfig::load(args.point.config.as_deref())?;
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_with_cli(&args.point, Some(&args))?;

    let progress_handler = CliProgressHandler::new(ui_sender);
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Starting particle simulation ({} ticks, {}x{} domain)...",
        config.options.ticks,
        config.domain.width(),
        config.domain.height()
    );
    info!("Invoking the core simulation workflow...");

    let result = tokio::task::block_in_place(|| {
        workflows::simulate::run(&config.filtration, config.domain, &config.options, &reporter)
    })?;

    info!(
        "Workflow finished with {} frame(s) recorded.",
        result.frames.len()
    );

    if let Some(path) = args.output.as_deref() {
        info!("Writing trajectory to {:?}", path);
        let rows = trajectory::write_to_path(&result.frames, path)?;
        println!(
            "✓ {} frame(s), {} row(s) written to: {}",
            result.frames.len(),
            rows,
            path.display()
        );
    }

    if result.census.is_empty() {
        warn!("Feed contains no particles; the simulation had nothing to move.");
        println!("Warning: the feed is empty, no particles were simulated.");
    } else {
        print!("{}", format_census(&result.census));
    }
    println!(
        "  Membrane rejections: {} | net crossings to permeate: {}",
        result.rejections, result.net_crossings
    );
    print!("{}", format_statistics(&config, &result.statistics));

    if let Some(path) = args.point.report.as_deref() {
        write_report(&config, &result.statistics, path)?;
    }

    Ok(())
}

fn format_census(census: &Census) -> String {
    let mut out = String::from("Particle census (feed | permeate):\n");
    for (species, counts) in census {
        let _ = writeln!(
            out,
            "    {:<5} {:>5} | {:<5} ({:.1} % through)",
            species.label(),
            counts.feed,
            counts.permeate,
            counts.permeate_fraction() * 100.0
        );
    }
    out
}
