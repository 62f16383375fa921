use phf::{Map, phf_map};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Static physical properties of a dissolved ion species.
///
/// Diameters share units with the membrane pore diameter (nanometers) so the two can be
/// compared directly when deciding whether an ion passes a pore.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeciesProperties {
    /// Effective hydrated diameter in nanometers.
    pub effective_diameter: f64,
    /// Relative particle mass.
    pub mass: f64,
    /// Formal charge in elementary charge units.
    pub charge: i8,
    /// Largest feed concentration accepted for this species, in ppm.
    pub max_concentration: f64,
}

/// The ion species tracked by the feed water model.
///
/// Declaration order is significant: it fixes the iteration order of solute profiles and
/// therefore the order in which particles are seeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IonSpecies {
    #[serde(rename = "Na")]
    Sodium,
    #[serde(rename = "K")]
    Potassium,
    #[serde(rename = "Mg")]
    Magnesium,
    #[serde(rename = "Cl")]
    Chloride,
}

const SODIUM: SpeciesProperties = SpeciesProperties {
    effective_diameter: 2.0,
    mass: 1.0,
    charge: 1,
    max_concentration: 500.0,
};
const POTASSIUM: SpeciesProperties = SpeciesProperties {
    effective_diameter: 2.5,
    mass: 1.2,
    charge: 1,
    max_concentration: 200.0,
};
const MAGNESIUM: SpeciesProperties = SpeciesProperties {
    effective_diameter: 4.0,
    mass: 2.0,
    charge: 2,
    max_concentration: 300.0,
};
const CHLORIDE: SpeciesProperties = SpeciesProperties {
    effective_diameter: 3.0,
    mass: 1.5,
    charge: -1,
    max_concentration: 800.0,
};

// Keys are lowercase; lookups normalize before probing.
static SPECIES_BY_NAME: Map<&'static str, IonSpecies> = phf_map! {
    "na" => IonSpecies::Sodium,
    "sodium" => IonSpecies::Sodium,
    "k" => IonSpecies::Potassium,
    "potassium" => IonSpecies::Potassium,
    "mg" => IonSpecies::Magnesium,
    "magnesium" => IonSpecies::Magnesium,
    "cl" => IonSpecies::Chloride,
    "chloride" => IonSpecies::Chloride,
};

impl IonSpecies {
    /// All species in declaration order.
    pub const ALL: [IonSpecies; 4] = [
        IonSpecies::Sodium,
        IonSpecies::Potassium,
        IonSpecies::Magnesium,
        IonSpecies::Chloride,
    ];

    pub fn properties(self) -> &'static SpeciesProperties {
        match self {
            IonSpecies::Sodium => &SODIUM,
            IonSpecies::Potassium => &POTASSIUM,
            IonSpecies::Magnesium => &MAGNESIUM,
            IonSpecies::Chloride => &CHLORIDE,
        }
    }

    #[inline]
    pub fn effective_diameter(self) -> f64 {
        self.properties().effective_diameter
    }

    #[inline]
    pub fn mass(self) -> f64 {
        self.properties().mass
    }

    #[inline]
    pub fn max_concentration_ppm(self) -> f64 {
        self.properties().max_concentration
    }

    pub fn symbol(self) -> &'static str {
        match self {
            IonSpecies::Sodium => "Na",
            IonSpecies::Potassium => "K",
            IonSpecies::Magnesium => "Mg",
            IonSpecies::Chloride => "Cl",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            IonSpecies::Sodium => "Sodium",
            IonSpecies::Potassium => "Potassium",
            IonSpecies::Magnesium => "Magnesium",
            IonSpecies::Chloride => "Chloride",
        }
    }

    /// Symbol with its charge marker, e.g. `Mg++`.
    pub fn label(self) -> String {
        let charge = self.properties().charge;
        let marker = if charge > 0 { "+" } else { "-" };
        format!("{}{}", self.symbol(), marker.repeat(charge.unsigned_abs() as usize))
    }

    /// Whether the species counts toward water hardness.
    pub fn contributes_to_hardness(self) -> bool {
        matches!(self, IonSpecies::Magnesium)
    }
}

impl fmt::Display for IonSpecies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error("Unknown ion species: '{0}'. Expected one of Na, K, Mg, Cl.")]
pub struct ParseIonSpeciesError(pub String);

impl FromStr for IonSpecies {
    type Err = ParseIonSpeciesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        SPECIES_BY_NAME
            .get(key.as_str())
            .copied()
            .ok_or_else(|| ParseIonSpeciesError(s.to_string()))
    }
}
