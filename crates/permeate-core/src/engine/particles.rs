use crate::core::models::domain::{Domain, Side};
use crate::core::models::ion::IonSpecies;
use crate::core::models::particle::{Frame, Particle, ParticleView};
use crate::core::models::solutes::SoluteProfile;
use crate::core::transport::constants::REFERENCE_PRESSURE_PSI;
use crate::engine::config::FiltrationConfig;
use crate::engine::state::OperatingMode;
use nalgebra::{Point2, Vector2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// One particle is seeded per this many ppm (rounded up).
pub const PPM_PER_PARTICLE: f64 = 10.0;
/// Particles are seeded at least this far to the left of the membrane.
pub const FEED_MARGIN: f64 = 20.0;
/// Width of the uniform distribution for initial velocity components.
pub const INITIAL_VELOCITY_SPAN: f64 = 0.5;
pub const PRESSURE_FORCE_SCALE: f64 = 0.2;
pub const PRESSURE_ACCELERATION_SCALE: f64 = 0.1;
/// Width of the uniform Brownian kick added to each velocity component per tick.
pub const JITTER_SPAN: f64 = 0.1;
pub const DAMPING: f64 = 0.95;
/// Distance from the membrane plane at which an approaching particle makes contact.
///
/// This is a drawing-surface distance while particle diameters share units with the pore
/// size; the two are compared directly, without a conversion factor.
pub const MEMBRANE_CONTACT_OFFSET: f64 = 5.0;
/// Fraction of the normal velocity kept (with reversed sign) by a rejected particle.
pub const RESTITUTION: f64 = 0.8;

/// Outcome of the membrane rule for one particle on one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembraneContact {
    /// Not approaching the membrane from the feed side.
    None,
    /// Approaching and small enough to pass; velocity untouched.
    Admitted,
    /// Approaching and too large; bounced back and clamped to the contact plane.
    Rejected,
}

/// Per-tick membrane activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub rejected: usize,
    pub crossed_to_permeate: usize,
    pub crossed_to_feed: usize,
}

/// Particle counts on each side of the membrane, per species.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SideCounts {
    pub feed: usize,
    pub permeate: usize,
}

impl SideCounts {
    pub fn total(&self) -> usize {
        self.feed + self.permeate
    }

    /// Fraction of particles currently on the permeate side, `0.0` when empty.
    pub fn permeate_fraction(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.permeate as f64 / total as f64,
        }
    }
}

pub type Census = BTreeMap<IonSpecies, SideCounts>;

/// Number of particles seeded for a concentration.
#[inline]
pub fn particle_count(ppm: f64) -> usize {
    (ppm / PPM_PER_PARTICLE).ceil().max(0.0) as usize
}

/// Seeds a fresh particle set in the feed half of `domain`.
///
/// Species are seeded in profile order, `ceil(ppm / 10)` particles each, at uniformly
/// random positions with `x` in `[0, membrane_x - 20)` and `y` in `[0, height)`, with each
/// velocity component uniform in `[-0.25, 0.25)`.
pub fn initialize(solutes: &SoluteProfile, domain: &Domain, rng: &mut impl Rng) -> Vec<Particle> {
    let feed_span = (domain.membrane_x() - FEED_MARGIN).max(0.0);
    let total: usize = solutes.iter().map(|(_, ppm)| particle_count(ppm)).sum();
    let mut particles = Vec::with_capacity(total);

    for (species, ppm) in solutes.iter() {
        for _ in 0..particle_count(ppm) {
            let position = Point2::new(
                rng.random::<f64>() * feed_span,
                rng.random::<f64>() * domain.height(),
            );
            let velocity = Vector2::new(
                (rng.random::<f64>() - 0.5) * INITIAL_VELOCITY_SPAN,
                (rng.random::<f64>() - 0.5) * INITIAL_VELOCITY_SPAN,
            );
            particles.push(Particle::new(species, position, velocity));
        }
    }

    debug!(
        count = particles.len(),
        width = domain.width(),
        height = domain.height(),
        "Seeded particle set."
    );
    particles
}

/// Applies the size-selective membrane rule to a single particle.
pub fn apply_membrane_rule(
    particle: &mut Particle,
    membrane_x: f64,
    pore_diameter: f64,
) -> MembraneContact {
    let radius = particle.radius();
    let x = particle.position.x;
    let approaching = x + radius > membrane_x - MEMBRANE_CONTACT_OFFSET
        && x < membrane_x
        && particle.velocity.x > 0.0;
    if !approaching {
        return MembraneContact::None;
    }

    if particle.effective_diameter < pore_diameter {
        MembraneContact::Admitted
    } else {
        particle.velocity.x *= -RESTITUTION;
        particle.position.x = membrane_x - MEMBRANE_CONTACT_OFFSET - radius;
        MembraneContact::Rejected
    }
}

/// Advances every particle by one tick, in place.
///
/// Order per particle: pressure drive (running only), Brownian jitter, damping,
/// integration, wall reflection, then the membrane rule. Everything except the pressure
/// drive also runs while idle.
pub fn step(
    particles: &mut [Particle],
    domain: &Domain,
    config: &FiltrationConfig,
    mode: OperatingMode,
    rng: &mut impl Rng,
) -> TickSummary {
    let membrane_x = domain.membrane_x();
    let drive = (config.pressure_psi() / REFERENCE_PRESSURE_PSI)
        * PRESSURE_FORCE_SCALE
        * PRESSURE_ACCELERATION_SCALE;
    let mut summary = TickSummary::default();

    for p in particles.iter_mut() {
        let side_before = domain.side_of(p.position.x);

        if mode.is_running() {
            p.velocity.x += drive;
        }

        p.velocity.x += (rng.random::<f64>() - 0.5) * JITTER_SPAN;
        p.velocity.y += (rng.random::<f64>() - 0.5) * JITTER_SPAN;

        p.velocity *= DAMPING;
        p.position += p.velocity;

        if p.position.y < 0.0 || p.position.y > domain.height() {
            p.velocity.y = -p.velocity.y;
        }
        if p.position.x < 0.0 {
            p.velocity.x = p.velocity.x.abs();
        }
        if p.position.x > domain.width() {
            p.velocity.x = -p.velocity.x.abs();
        }

        if apply_membrane_rule(p, membrane_x, config.pore_diameter_nm())
            == MembraneContact::Rejected
        {
            summary.rejected += 1;
        }

        match (side_before, domain.side_of(p.position.x)) {
            (Side::Feed, Side::Permeate) => summary.crossed_to_permeate += 1,
            (Side::Permeate, Side::Feed) => summary.crossed_to_feed += 1,
            _ => {}
        }
    }

    summary
}

/// A particle set bound to its domain and random source.
///
/// The random source is a type parameter so tests can inject a seeded generator; the host
/// calls [`ParticleSystem::step`] once per frame and owns all scheduling.
pub struct ParticleSystem<R: Rng = StdRng> {
    particles: Vec<Particle>,
    domain: Domain,
    seeded_from: SoluteProfile,
    rng: R,
    tick: u64,
}

impl ParticleSystem<StdRng> {
    pub fn new(config: &FiltrationConfig, domain: Domain) -> Self {
        Self::with_rng(config, domain, StdRng::from_os_rng())
    }

    pub fn seeded(config: &FiltrationConfig, domain: Domain, seed: u64) -> Self {
        Self::with_rng(config, domain, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> ParticleSystem<R> {
    pub fn with_rng(config: &FiltrationConfig, domain: Domain, rng: R) -> Self {
        let mut system = Self {
            particles: Vec::new(),
            domain,
            seeded_from: SoluteProfile::new(),
            rng,
            tick: 0,
        };
        system.initialize(config);
        system
    }

    /// Discards all particles and reseeds from `config`'s solute profile.
    pub fn initialize(&mut self, config: &FiltrationConfig) {
        self.particles = initialize(config.solutes(), &self.domain, &mut self.rng);
        self.seeded_from = config.solutes().clone();
        self.tick = 0;
    }

    pub fn step(&mut self, config: &FiltrationConfig, mode: OperatingMode) -> TickSummary {
        let summary = step(
            &mut self.particles,
            &self.domain,
            config,
            mode,
            &mut self.rng,
        );
        self.tick += 1;
        trace!(tick = self.tick, ?summary, "Advanced particle system.");
        summary
    }

    /// Takes a swapped-in configuration. Returns `true` if the particle set was reseeded.
    ///
    /// Only a changed solute profile reseeds; new pressure or pore values simply apply from
    /// the next tick on.
    pub fn apply_config(&mut self, config: &FiltrationConfig) -> bool {
        if config.solutes() == &self.seeded_from {
            return false;
        }
        debug!("Solute profile changed, reseeding particles.");
        self.initialize(config);
        true
    }

    /// Moves to a new domain size. Particle state is always discarded.
    pub fn resize(&mut self, domain: Domain, config: &FiltrationConfig) {
        debug!(
            width = domain.width(),
            height = domain.height(),
            "Domain resized, reseeding particles."
        );
        self.domain = domain;
        self.initialize(config);
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn snapshot(&self) -> Frame {
        Frame {
            tick: self.tick,
            membrane_x: self.domain.membrane_x(),
            particles: self
                .particles
                .iter()
                .map(|p| ParticleView {
                    species: p.species,
                    x: p.position.x,
                    y: p.position.y,
                    vx: p.velocity.x,
                    vy: p.velocity.y,
                    diameter: p.effective_diameter,
                    side: self.domain.side_of(p.position.x),
                })
                .collect(),
        }
    }

    pub fn census(&self) -> Census {
        let mut census = Census::new();
        for p in &self.particles {
            let counts = census.entry(p.species).or_default();
            match self.domain.side_of(p.position.x) {
                Side::Feed => counts.feed += 1,
                Side::Permeate => counts.permeate += 1,
            }
        }
        census
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::FiltrationConfigBuilder;

    fn config_with(pressure: f64, pore: f64, solutes: SoluteProfile) -> FiltrationConfig {
        FiltrationConfigBuilder::new()
            .pressure_psi(pressure)
            .pore_diameter_nm(pore)
            .solutes(solutes)
            .build()
            .unwrap()
    }

    fn small_domain() -> Domain {
        Domain::new(200.0, 100.0).unwrap()
    }

    #[test]
    fn particle_count_rounds_up() {
        assert_eq!(particle_count(0.0), 0);
        assert_eq!(particle_count(0.5), 1);
        assert_eq!(particle_count(150.0), 15);
        assert_eq!(particle_count(155.0), 16);
    }

    #[test]
    fn initialize_seeds_expected_count_per_species() {
        let config = FiltrationConfig::default();
        let system = ParticleSystem::seeded(&config, Domain::default(), 7);
        assert_eq!(system.len(), 15 + 5 + 8 + 20);

        let census = system.census();
        assert_eq!(census[&IonSpecies::Sodium].total(), 15);
        assert_eq!(census[&IonSpecies::Potassium].total(), 5);
        assert_eq!(census[&IonSpecies::Magnesium].total(), 8);
        assert_eq!(census[&IonSpecies::Chloride].total(), 20);
    }

    #[test]
    fn initialize_places_particles_in_feed_region_with_bounded_velocity() {
        let config = FiltrationConfig::default();
        let domain = Domain::default();
        let system = ParticleSystem::seeded(&config, domain, 11);
        let feed_limit = domain.membrane_x() - FEED_MARGIN;

        for p in system.particles() {
            assert!(p.position.x >= 0.0 && p.position.x < feed_limit);
            assert!(p.position.y >= 0.0 && p.position.y < domain.height());
            assert!(p.velocity.x.abs() <= 0.25);
            assert!(p.velocity.y.abs() <= 0.25);
            assert_eq!(p.effective_diameter, p.species.effective_diameter());
        }
    }

    #[test]
    fn initialize_seeds_in_species_order() {
        let config = FiltrationConfig::default();
        let system = ParticleSystem::seeded(&config, Domain::default(), 3);
        let species: Vec<_> = system.particles().iter().map(|p| p.species).collect();
        let mut sorted = species.clone();
        sorted.sort();
        assert_eq!(species, sorted);
    }

    #[test]
    fn narrow_domain_seeds_at_left_edge_without_panicking() {
        let config = FiltrationConfig::default();
        let system = ParticleSystem::seeded(&config, Domain::new(30.0, 10.0).unwrap(), 1);
        assert!(system.particles().iter().all(|p| p.position.x == 0.0));
    }

    #[test]
    fn empty_profile_yields_no_particles_and_step_is_noop() {
        let config = config_with(
            500.0,
            2.5,
            SoluteProfile::new().with(IonSpecies::Sodium, 0.0),
        );
        let mut system = ParticleSystem::seeded(&config, small_domain(), 5);
        assert!(system.is_empty());
        let summary = system.step(&config, OperatingMode::Running);
        assert_eq!(summary, TickSummary::default());
        assert_eq!(system.tick(), 1);
    }

    #[test]
    fn same_seed_reproduces_trajectory() {
        let config = FiltrationConfig::default();
        let mut a = ParticleSystem::seeded(&config, small_domain(), 42);
        let mut b = ParticleSystem::seeded(&config, small_domain(), 42);
        for _ in 0..200 {
            a.step(&config, OperatingMode::Running);
            b.step(&config, OperatingMode::Running);
        }
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn rejected_particle_bounces_and_is_clamped() {
        let mut p = Particle::new(
            IonSpecies::Magnesium,
            Point2::new(97.0, 50.0),
            Vector2::new(0.5, 0.0),
        );
        let contact = apply_membrane_rule(&mut p, 100.0, 2.5);
        assert_eq!(contact, MembraneContact::Rejected);
        assert!((p.velocity.x + 0.4).abs() < 1e-12);
        assert_eq!(p.position.x, 100.0 - 5.0 - 2.0);
    }

    #[test]
    fn admitted_particle_velocity_is_untouched() {
        let mut p = Particle::new(
            IonSpecies::Sodium,
            Point2::new(97.0, 50.0),
            Vector2::new(0.5, 0.1),
        );
        let before = p.clone();
        let contact = apply_membrane_rule(&mut p, 100.0, 2.5);
        assert_eq!(contact, MembraneContact::Admitted);
        assert_eq!(p, before);
    }

    #[test]
    fn ion_equal_to_pore_is_rejected() {
        let mut p = Particle::new(
            IonSpecies::Potassium,
            Point2::new(96.0, 50.0),
            Vector2::new(0.2, 0.0),
        );
        assert_eq!(
            apply_membrane_rule(&mut p, 100.0, 2.5),
            MembraneContact::Rejected
        );
    }

    #[test]
    fn membrane_rule_ignores_particles_moving_away_or_far() {
        let mut receding = Particle::new(
            IonSpecies::Chloride,
            Point2::new(97.0, 50.0),
            Vector2::new(-0.3, 0.0),
        );
        assert_eq!(
            apply_membrane_rule(&mut receding, 100.0, 1.0),
            MembraneContact::None
        );

        let mut far = Particle::new(
            IonSpecies::Chloride,
            Point2::new(60.0, 50.0),
            Vector2::new(0.3, 0.0),
        );
        assert_eq!(apply_membrane_rule(&mut far, 100.0, 1.0), MembraneContact::None);

        let mut permeate_side = Particle::new(
            IonSpecies::Chloride,
            Point2::new(101.0, 50.0),
            Vector2::new(0.3, 0.0),
        );
        assert_eq!(
            apply_membrane_rule(&mut permeate_side, 100.0, 1.0),
            MembraneContact::None
        );
    }

    #[test]
    fn oversized_ions_never_reach_permeate_side() {
        let config = config_with(1000.0, 0.5, FiltrationConfig::default().solutes().clone());
        let domain = small_domain();
        let mut system = ParticleSystem::seeded(&config, domain, 2024);
        let mut rejections = 0;

        for _ in 0..2000 {
            rejections += system.step(&config, OperatingMode::Running).rejected;
            for p in system.particles() {
                assert!(
                    p.position.x < domain.membrane_x(),
                    "{} crossed to x = {} at tick {}",
                    p.species,
                    p.position.x,
                    system.tick()
                );
            }
        }
        assert!(rejections > 0);
    }

    #[test]
    fn undersized_ions_reach_permeate_under_pressure() {
        let config = config_with(1000.0, 2.5, FiltrationConfig::default().solutes().clone());
        let mut system = ParticleSystem::seeded(&config, small_domain(), 99);
        for _ in 0..1500 {
            system.step(&config, OperatingMode::Running);
        }

        let census = system.census();
        assert!(census[&IonSpecies::Sodium].permeate > 0);
        assert_eq!(census[&IonSpecies::Potassium].permeate, 0);
        assert_eq!(census[&IonSpecies::Magnesium].permeate, 0);
        assert_eq!(census[&IonSpecies::Chloride].permeate, 0);
    }

    #[test]
    fn idle_step_skips_pressure_drive_only() {
        let config = config_with(1000.0, 2.5, SoluteProfile::new());
        let domain = small_domain();
        let at_rest = || {
            vec![Particle::new(
                IonSpecies::Chloride,
                Point2::new(50.0, 50.0),
                Vector2::zeros(),
            )]
        };
        let mut idle = at_rest();
        let mut running = at_rest();
        step(
            &mut idle,
            &domain,
            &config,
            OperatingMode::Idle,
            &mut StdRng::seed_from_u64(8),
        );
        step(
            &mut running,
            &domain,
            &config,
            OperatingMode::Running,
            &mut StdRng::seed_from_u64(8),
        );

        let expected_gap = 1000.0 / 1000.0 * 0.2 * 0.1 * DAMPING;
        let gap = running[0].velocity.x - idle[0].velocity.x;
        assert!((gap - expected_gap).abs() < 1e-12);
        assert_eq!(idle[0].velocity.y, running[0].velocity.y);
        assert!(idle[0].velocity.x.abs() <= JITTER_SPAN / 2.0 * DAMPING);
    }

    #[test]
    fn apply_config_reseeds_only_on_solute_change() {
        let config = FiltrationConfig::default();
        let mut system = ParticleSystem::seeded(&config, small_domain(), 10);
        for _ in 0..5 {
            system.step(&config, OperatingMode::Running);
        }

        let faster = config.to_builder().pressure_psi(900.0).build().unwrap();
        assert!(!system.apply_config(&faster));
        assert_eq!(system.tick(), 5);

        let saltier = config
            .to_builder()
            .solute(IonSpecies::Chloride, 400.0)
            .build()
            .unwrap();
        assert!(system.apply_config(&saltier));
        assert_eq!(system.tick(), 0);
        assert_eq!(system.len(), 15 + 5 + 8 + 40);
    }

    #[test]
    fn resize_reseeds_within_new_domain() {
        let config = FiltrationConfig::default();
        let mut system = ParticleSystem::seeded(&config, Domain::default(), 12);
        system.step(&config, OperatingMode::Running);

        let new_domain = Domain::new(120.0, 60.0).unwrap();
        system.resize(new_domain, &config);
        assert_eq!(system.tick(), 0);
        assert_eq!(system.domain().membrane_x(), 60.0);
        assert!(system.particles().iter().all(|p| p.position.x < 40.0));
    }

    #[test]
    fn snapshot_reports_membrane_and_sides() {
        let config = FiltrationConfig::default();
        let system = ParticleSystem::seeded(&config, Domain::default(), 4);
        let frame = system.snapshot();
        assert_eq!(frame.tick, 0);
        assert_eq!(frame.membrane_x, 400.0);
        assert_eq!(frame.particles.len(), system.len());
        assert!(frame.particles.iter().all(|v| v.side == Side::Feed));
    }

    #[test]
    fn side_counts_fraction_handles_empty() {
        assert_eq!(SideCounts::default().permeate_fraction(), 0.0);
        let counts = SideCounts {
            feed: 3,
            permeate: 1,
        };
        assert_eq!(counts.permeate_fraction(), 0.25);
    }
}
