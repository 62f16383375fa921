use super::constants::*;
use crate::core::models::ion::IonSpecies;
use crate::core::models::solutes::SoluteProfile;
use serde::Serialize;

/// Passage of one ion species through the membrane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct IonPassage {
    pub species: IonSpecies,
    pub feed_ppm: f64,
    /// Fraction of the feed concentration that reaches the permeate, in `[0, 1]`.
    pub passage_factor: f64,
    pub permeate_ppm: f64,
}

/// Water-quality summary derived from a configuration alone.
///
/// All fields keep full floating precision; use [`Statistics::display`] for the rounded
/// values shown on a panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Statistics {
    /// Feed total dissolved solids, ppm.
    pub feed_tds: f64,
    /// Permeate total dissolved solids, ppm.
    pub permeate_tds: f64,
    /// Salt rejection, percent in `[0, 100]`.
    pub efficiency: f64,
    /// Feed hardness, mg/L as CaCO3.
    pub hardness_feed: f64,
    /// Permeate hardness, mg/L as CaCO3.
    pub hardness_permeate: f64,
    /// Specific energy estimate, kWh/m³. Zero while idle.
    pub energy: f64,
    pub ions: Vec<IonPassage>,
}

/// Panel-ready statistics: integers for concentrations, fixed decimals for ratios.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct DisplayStatistics {
    pub feed_tds: u64,
    pub permeate_tds: u64,
    /// One decimal place.
    pub efficiency: f64,
    pub hardness_feed: u64,
    pub hardness_permeate: u64,
    /// Two decimal places.
    pub energy: f64,
    pub high_hardness: bool,
    pub low_permeate_tds: bool,
}

/// Fraction of an ion of `ion_diameter` that crosses a pore of `pore_diameter` at
/// `pressure_psi`.
///
/// A pore strictly wider than the ion lets it through almost freely. Otherwise only a
/// pressure-driven leak gets through, capped at [`MAX_LEAK_PASSAGE`] at the reference
/// pressure.
#[inline]
pub fn passage_factor(pressure_psi: f64, pore_diameter: f64, ion_diameter: f64) -> f64 {
    if pore_diameter > ion_diameter {
        OPEN_PORE_PASSAGE
    } else {
        (pressure_psi / REFERENCE_PRESSURE_PSI) * MAX_LEAK_PASSAGE
    }
}

/// Rejection percentage, clamped to `[0, 100]`. An empty feed rejects nothing.
#[inline]
pub fn rejection_efficiency(feed_tds: f64, permeate_tds: f64) -> f64 {
    if feed_tds <= 0.0 {
        return 0.0;
    }
    ((feed_tds - permeate_tds) / feed_tds * 100.0).clamp(0.0, 100.0)
}

#[inline]
pub fn specific_energy(pressure_psi: f64, running: bool) -> f64 {
    if running {
        (pressure_psi / REFERENCE_PRESSURE_PSI) * MAX_SPECIFIC_ENERGY
    } else {
        0.0
    }
}

/// Evaluates the transport model for one operating point.
///
/// Pure: identical inputs always yield identical output, and nothing is cached.
pub fn compute(
    pressure_psi: f64,
    pore_diameter: f64,
    solutes: &SoluteProfile,
    running: bool,
) -> Statistics {
    let feed_tds = solutes.total_ppm();

    let ions: Vec<IonPassage> = solutes
        .iter()
        .map(|(species, feed_ppm)| {
            let factor =
                passage_factor(pressure_psi, pore_diameter, species.effective_diameter());
            IonPassage {
                species,
                feed_ppm,
                passage_factor: factor,
                permeate_ppm: feed_ppm * factor,
            }
        })
        .collect();

    let permeate_tds: f64 = ions.iter().map(|ion| ion.permeate_ppm).sum();
    let (hard_feed_ppm, hard_permeate_ppm) = ions
        .iter()
        .filter(|ion| ion.species.contributes_to_hardness())
        .fold((0.0, 0.0), |(feed, permeate), ion| {
            (feed + ion.feed_ppm, permeate + ion.permeate_ppm)
        });

    Statistics {
        feed_tds,
        permeate_tds,
        efficiency: rejection_efficiency(feed_tds, permeate_tds),
        hardness_feed: hard_feed_ppm * HARDNESS_PER_MG_PPM,
        hardness_permeate: hard_permeate_ppm * HARDNESS_PER_MG_PPM,
        energy: specific_energy(pressure_psi, running),
        ions,
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

fn round_ppm(value: f64) -> u64 {
    value.max(0.0).round() as u64
}

impl Statistics {
    pub fn ion(&self, species: IonSpecies) -> Option<&IonPassage> {
        self.ions.iter().find(|ion| ion.species == species)
    }

    pub fn display(&self) -> DisplayStatistics {
        let permeate_tds = round_ppm(self.permeate_tds);
        let hardness_permeate = round_ppm(self.hardness_permeate);
        DisplayStatistics {
            feed_tds: round_ppm(self.feed_tds),
            permeate_tds,
            efficiency: round_to(self.efficiency, 1),
            hardness_feed: round_ppm(self.hardness_feed),
            hardness_permeate,
            energy: round_to(self.energy, 2),
            high_hardness: hardness_permeate > HIGH_HARDNESS_THRESHOLD,
            low_permeate_tds: permeate_tds < LOW_PERMEATE_TDS_THRESHOLD,
        }
    }
}
