use super::domain::Side;
use super::ion::IonSpecies;
use nalgebra::{Point2, Vector2};
use serde::Serialize;

/// A single dissolved ion moving through the feed/permeate domain.
///
/// `effective_diameter` and `mass` are copied from the species table at creation so the
/// integrator never has to look them up per tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Position in domain units.
    pub position: Point2<f64>,
    /// Displacement applied per tick.
    pub velocity: Vector2<f64>,
    pub species: IonSpecies,
    /// Effective diameter, in the same units as the pore diameter.
    pub effective_diameter: f64,
    pub mass: f64,
}

impl Particle {
    pub fn new(species: IonSpecies, position: Point2<f64>, velocity: Vector2<f64>) -> Self {
        let props = species.properties();
        Self {
            position,
            velocity,
            species,
            effective_diameter: props.effective_diameter,
            mass: props.mass,
        }
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.effective_diameter / 2.0
    }
}

/// What a renderer needs to draw one particle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParticleView {
    pub species: IonSpecies,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub diameter: f64,
    pub side: Side,
}

/// A snapshot of every particle at a given tick, plus the membrane plane position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub tick: u64,
    pub membrane_x: f64,
    pub particles: Vec<ParticleView>,
}
