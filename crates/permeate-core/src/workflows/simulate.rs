use crate::core::models::domain::Domain;
use crate::core::models::particle::Frame;
use crate::core::transport::statistics::Statistics;
use crate::engine::config::FiltrationConfig;
use crate::engine::error::EngineError;
use crate::engine::particles::{Census, ParticleSystem};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::state::OperatingMode;
use tracing::{info, instrument};

// Progress is reported in roughly this many increments per run.
const PROGRESS_UPDATES: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationOptions {
    pub ticks: u64,
    /// Record a frame every this many ticks. Must be non-zero.
    pub frame_interval: u64,
    /// Seed for the random source; `None` draws one from the OS.
    pub seed: Option<u64>,
    pub mode: OperatingMode,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            ticks: 600,
            frame_interval: 10,
            seed: None,
            mode: OperatingMode::Running,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SimulationResult {
    /// Recorded frames, starting with tick 0 and always ending with the final tick.
    pub frames: Vec<Frame>,
    /// Where each species ended up.
    pub census: Census,
    /// Closed-form statistics for the same configuration and mode.
    pub statistics: Statistics,
    /// Total membrane rejections over the run.
    pub rejections: u64,
    /// Net number of feed-to-permeate crossings over the run.
    pub net_crossings: i64,
}

#[instrument(skip_all, name = "simulation_workflow", fields(ticks = options.ticks))]
pub fn run(
    config: &FiltrationConfig,
    domain: Domain,
    options: &SimulationOptions,
    reporter: &ProgressReporter,
) -> Result<SimulationResult, EngineError> {
    if options.frame_interval == 0 {
        return Err(EngineError::InvalidOptions(
            "frame interval must be at least 1 tick".to_string(),
        ));
    }

    // === Phase 1: Seeding ===
    reporter.report(Progress::PhaseStart {
        name: "Seeding Particles",
    });
    let mut system = match options.seed {
        Some(seed) => ParticleSystem::seeded(config, domain, seed),
        None => ParticleSystem::new(config, domain),
    };
    info!(
        particles = system.len(),
        membrane_x = domain.membrane_x(),
        mode = %options.mode,
        "Particle system seeded."
    );
    reporter.report(Progress::Message(format!(
        "{} particles in the feed, membrane at x = {:.1}",
        system.len(),
        domain.membrane_x()
    )));
    reporter.report(Progress::PhaseFinish);

    // === Phase 2: Time stepping ===
    reporter.report(Progress::PhaseStart {
        name: "Advancing Particles",
    });
    reporter.report(Progress::TaskStart {
        total: options.ticks,
    });

    let report_every = (options.ticks / PROGRESS_UPDATES).max(1);
    let mut frames = vec![system.snapshot()];
    let mut rejections = 0u64;
    let mut net_crossings = 0i64;
    let mut pending = 0u64;

    for _ in 0..options.ticks {
        let summary = system.step(config, options.mode);
        rejections += summary.rejected as u64;
        net_crossings += summary.crossed_to_permeate as i64 - summary.crossed_to_feed as i64;

        if system.tick() % options.frame_interval == 0 {
            frames.push(system.snapshot());
        }

        pending += 1;
        if pending == report_every {
            reporter.report(Progress::TaskIncrement { amount: pending });
            reporter.report(Progress::StatusUpdate {
                text: format!("{} rejected, {:+} net crossings", rejections, net_crossings),
            });
            pending = 0;
        }
    }
    if pending > 0 {
        reporter.report(Progress::TaskIncrement { amount: pending });
    }
    if frames.last().map(|f| f.tick) != Some(system.tick()) {
        frames.push(system.snapshot());
    }
    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::Message(format!(
        "{} membrane rejections, {:+} net crossings to permeate",
        rejections, net_crossings
    )));
    reporter.report(Progress::PhaseFinish);

    // === Phase 3: Statistics ===
    reporter.report(Progress::PhaseStart {
        name: "Computing Statistics",
    });
    let statistics = config.statistics(options.mode);
    let census = system.census();
    reporter.report(Progress::PhaseFinish);

    info!(
        frames = frames.len(),
        rejections,
        net_crossings,
        efficiency = statistics.efficiency,
        "Simulation complete."
    );

    Ok(SimulationResult {
        frames,
        census,
        statistics,
        rejections,
        net_crossings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::ion::IonSpecies;
    use std::sync::{Arc, Mutex};

    fn seeded_options(ticks: u64, frame_interval: u64) -> SimulationOptions {
        SimulationOptions {
            ticks,
            frame_interval,
            seed: Some(1234),
            mode: OperatingMode::Running,
        }
    }

    #[test]
    fn zero_frame_interval_is_rejected() {
        let result = run(
            &FiltrationConfig::default(),
            Domain::default(),
            &seeded_options(10, 0),
            &ProgressReporter::new(),
        );
        assert!(matches!(result, Err(EngineError::InvalidOptions(_))));
    }

    #[test]
    fn frames_include_initial_periodic_and_final_ticks() {
        let result = run(
            &FiltrationConfig::default(),
            Domain::default(),
            &seeded_options(25, 10),
            &ProgressReporter::new(),
        )
        .unwrap();

        let ticks: Vec<u64> = result.frames.iter().map(|f| f.tick).collect();
        assert_eq!(ticks, vec![0, 10, 20, 25]);
        assert!(result.frames.iter().all(|f| f.particles.len() == 48));
    }

    #[test]
    fn final_frame_is_not_duplicated_on_interval_boundary() {
        let result = run(
            &FiltrationConfig::default(),
            Domain::default(),
            &seeded_options(20, 10),
            &ProgressReporter::new(),
        )
        .unwrap();
        let ticks: Vec<u64> = result.frames.iter().map(|f| f.tick).collect();
        assert_eq!(ticks, vec![0, 10, 20]);
    }

    #[test]
    fn statistics_match_closed_form_model() {
        let config = FiltrationConfig::default();
        let result = run(
            &config,
            Domain::default(),
            &seeded_options(5, 1),
            &ProgressReporter::new(),
        )
        .unwrap();
        assert_eq!(result.statistics, config.statistics(OperatingMode::Running));
        assert_eq!(result.census[&IonSpecies::Sodium].total(), 15);
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let config = FiltrationConfig::default();
        let domain = Domain::new(200.0, 100.0).unwrap();
        let a = run(&config, domain, &seeded_options(300, 50), &ProgressReporter::new()).unwrap();
        let b = run(&config, domain, &seeded_options(300, 50), &ProgressReporter::new()).unwrap();
        assert_eq!(a.frames, b.frames);
        assert_eq!(a.rejections, b.rejections);
        assert_eq!(a.net_crossings, b.net_crossings);
    }

    #[test]
    fn progress_increments_sum_to_tick_count() {
        let total = Arc::new(Mutex::new(0u64));
        let phases = Arc::new(Mutex::new(Vec::new()));
        let (total_sink, phase_sink) = (Arc::clone(&total), Arc::clone(&phases));
        let reporter = ProgressReporter::with_callback(Box::new(move |event| match event {
            Progress::TaskIncrement { amount } => *total_sink.lock().unwrap() += amount,
            Progress::PhaseStart { name } => phase_sink.lock().unwrap().push(name),
            _ => {}
        }));

        run(
            &FiltrationConfig::default(),
            Domain::default(),
            &seeded_options(257, 10),
            &reporter,
        )
        .unwrap();

        assert_eq!(*total.lock().unwrap(), 257);
        assert_eq!(
            *phases.lock().unwrap(),
            vec![
                "Seeding Particles",
                "Advancing Particles",
                "Computing Statistics"
            ]
        );
    }

    #[test]
    fn messages_summarize_seeding_and_transport() {
        let messages = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&messages);
        let reporter = ProgressReporter::with_callback(Box::new(move |event| {
            if let Progress::Message(text) = event {
                sink.lock().unwrap().push(text);
            }
        }));

        let result = run(
            &FiltrationConfig::default(),
            Domain::default(),
            &seeded_options(40, 10),
            &reporter,
        )
        .unwrap();

        let messages = messages.lock().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], "48 particles in the feed, membrane at x = 400.0");
        assert_eq!(
            messages[1],
            format!(
                "{} membrane rejections, {:+} net crossings to permeate",
                result.rejections, result.net_crossings
            )
        );
    }

    #[test]
    fn idle_run_reports_zero_energy() {
        let options = SimulationOptions {
            mode: OperatingMode::Idle,
            ..seeded_options(10, 5)
        };
        let result = run(
            &FiltrationConfig::default(),
            Domain::default(),
            &options,
            &ProgressReporter::new(),
        )
        .unwrap();
        assert_eq!(result.statistics.energy, 0.0);
    }
}
