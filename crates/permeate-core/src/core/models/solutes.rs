use super::ion::IonSpecies;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Feed-water solute concentrations in ppm, keyed by species.
///
/// Iteration follows [`IonSpecies`] declaration order. A species that is not present
/// reads as `0.0` ppm.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SoluteProfile {
    concentrations: BTreeMap<IonSpecies, f64>,
}

impl SoluteProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, species: IonSpecies, ppm: f64) -> Self {
        self.set(species, ppm);
        self
    }

    pub fn set(&mut self, species: IonSpecies, ppm: f64) {
        self.concentrations.insert(species, ppm);
    }

    pub fn get(&self, species: IonSpecies) -> f64 {
        self.concentrations.get(&species).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, species: IonSpecies) -> bool {
        self.concentrations.contains_key(&species)
    }

    pub fn iter(&self) -> impl Iterator<Item = (IonSpecies, f64)> + '_ {
        self.concentrations.iter().map(|(&s, &ppm)| (s, ppm))
    }

    pub fn len(&self) -> usize {
        self.concentrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concentrations.is_empty()
    }

    /// Total dissolved solids: the plain sum of all concentrations.
    pub fn total_ppm(&self) -> f64 {
        self.concentrations.values().sum()
    }
}

impl FromIterator<(IonSpecies, f64)> for SoluteProfile {
    fn from_iter<T: IntoIterator<Item = (IonSpecies, f64)>>(iter: T) -> Self {
        Self {
            concentrations: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_species_reads_as_zero() {
        let profile = SoluteProfile::new().with(IonSpecies::Sodium, 10.0);
        assert_eq!(profile.get(IonSpecies::Magnesium), 0.0);
        assert!(!profile.contains(IonSpecies::Magnesium));
    }

    #[test]
    fn iteration_follows_species_order_regardless_of_insertion() {
        let profile: SoluteProfile = [
            (IonSpecies::Chloride, 200.0),
            (IonSpecies::Sodium, 150.0),
            (IonSpecies::Magnesium, 80.0),
            (IonSpecies::Potassium, 50.0),
        ]
        .into_iter()
        .collect();

        let order: Vec<_> = profile.iter().map(|(s, _)| s).collect();
        assert_eq!(order, IonSpecies::ALL.to_vec());
    }

    #[test]
    fn total_ppm_sums_all_entries() {
        let profile = SoluteProfile::new()
            .with(IonSpecies::Sodium, 150.0)
            .with(IonSpecies::Potassium, 50.0)
            .with(IonSpecies::Magnesium, 80.0)
            .with(IonSpecies::Chloride, 200.0);
        assert_eq!(profile.total_ppm(), 480.0);
    }

    #[test]
    fn set_overwrites_existing_value() {
        let mut profile = SoluteProfile::new().with(IonSpecies::Potassium, 50.0);
        profile.set(IonSpecies::Potassium, 75.0);
        assert_eq!(profile.get(IonSpecies::Potassium), 75.0);
        assert_eq!(profile.len(), 1);
    }
}
