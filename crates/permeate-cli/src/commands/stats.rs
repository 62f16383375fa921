use crate::cli::StatsArgs;
use crate::config::{AppConfig, PartialRunConfig};
use crate::error::Result;
use permeate::core::io::report::{self, OperatingPoint};
use permeate::core::transport::statistics::Statistics;
use std::fmt::Write;
use std::path::Path;
use tracing::info;

pub async fn run(args: StatsArgs) -> Result<()> {
    let partial_config = PartialRunConfig::load(args.point.config.as_deref())?;
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_with_cli(&args.point, None)?;

    let statistics = config.filtration.statistics(config.options.mode);
    print!("{}", format_statistics(&config, &statistics));

    if let Some(path) = args.point.report.as_deref() {
        write_report(&config, &statistics, path)?;
    }
    Ok(())
}

pub(crate) fn operating_point(config: &AppConfig) -> OperatingPoint {
    OperatingPoint {
        pressure_psi: config.filtration.pressure_psi(),
        pore_diameter_nm: config.filtration.pore_diameter_nm(),
        running: config.options.mode.is_running(),
    }
}

pub(crate) fn write_report(config: &AppConfig, statistics: &Statistics, path: &Path) -> Result<()> {
    info!("Writing statistics report to {:?}", path);
    report::write_to_path(operating_point(config), statistics, path)?;
    println!("✓ Report written to: {}", path.display());
    Ok(())
}

/// Renders the statistics panel shown after `stats` and `simulate`.
pub(crate) fn format_statistics(config: &AppConfig, statistics: &Statistics) -> String {
    let display = statistics.display();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} | {:.0} PSI | pore {:.1} nm",
        config.options.mode.status_label(),
        config.filtration.pressure_psi(),
        config.filtration.pore_diameter_nm()
    );
    let _ = writeln!(out, "  Feed TDS:          {} ppm", display.feed_tds);
    let _ = writeln!(
        out,
        "  Permeate TDS:      {} ppm{}",
        display.permeate_tds,
        if display.low_permeate_tds { "  (good)" } else { "" }
    );
    let _ = writeln!(out, "  Rejection:         {:.1} %", display.efficiency);
    let _ = writeln!(
        out,
        "  Hardness:          {} -> {} mg/L CaCO3{}",
        display.hardness_feed,
        display.hardness_permeate,
        if display.high_hardness { "  (high)" } else { "" }
    );
    let _ = writeln!(out, "  Specific energy:   {:.2} kWh/m³", display.energy);

    for ion in &statistics.ions {
        let _ = writeln!(
            out,
            "    {:<5} {:>8.1} ppm -> {:>8.2} ppm  (passage {:.3})",
            ion.species.label(),
            ion.feed_ppm,
            ion.permeate_ppm,
            ion.passage_factor
        );
    }
    out
}
