//! Exhaustive enumeration of tank and booster counts
//!
//! Boosters add both range and weight, so range is not monotonic in any
//! single count. The search space is small and bounded by the balance
//! limits, so every combination is visited instead of inverting the model.

use crate::balance::{Balance, BoosterSpec, OxidizerSpec, TankSpec};
use crate::models::{Query, RawCandidate};

pub struct SearchEngine {
    fuel_tank: TankSpec,
    oxidizer: Option<OxidizerSpec>,
    booster: BoosterSpec,
    max_fuel_tanks: u32,
    max_oxidizer_tanks: u32,
    max_boosters: u32,
}

impl SearchEngine {
    pub fn new(balance: &Balance, query: &Query) -> Self {
        SearchEngine {
            fuel_tank: balance.fuel_tank,
            oxidizer: query
                .effective_oxidizer()
                .map(|oxidizer| *balance.oxidizers.get(oxidizer)),
            booster: balance.booster,
            max_fuel_tanks: balance.limits.max_fuel_tanks,
            max_oxidizer_tanks: balance.limits.max_oxidizer_tanks,
            max_boosters: balance.limits.max_boosters,
        }
    }

    /// Number of candidates [`SearchEngine::enumerate`] yields
    pub fn space_size(&self) -> usize {
        let oxidizer_steps = if self.oxidizer.is_some() {
            self.max_oxidizer_tanks as usize
        } else {
            1
        };
        self.max_fuel_tanks as usize * oxidizer_steps * (self.max_boosters as usize + 1)
    }

    /// Lazily yield every candidate, fuel-major then oxidizer then booster
    ///
    /// At least one fuel tank is always carried, and one oxidizer tank when
    /// the engine burns oxidizer.
    pub fn enumerate(&self) -> impl Iterator<Item = RawCandidate> + '_ {
        let oxidizer_counts: Vec<Option<u32>> = match self.oxidizer {
            Some(_) => (1..=self.max_oxidizer_tanks).map(Some).collect(),
            None => vec![None],
        };

        (1..=self.max_fuel_tanks).flat_map(move |fuel| {
            let oxidizer_counts = oxidizer_counts.clone();
            oxidizer_counts.into_iter().flat_map(move |oxidizer| {
                (0..=self.max_boosters).map(move |booster| self.candidate(fuel, oxidizer, booster))
            })
        })
    }

    fn candidate(&self, fuel: u32, oxidizer: Option<u32>, booster: u32) -> RawCandidate {
        let capacity = fuel as f64 * self.fuel_tank.capacity_kg;
        let fuel_mass = fuel as f64 * self.fuel_tank.mass_kg + capacity;

        let oxidizer_mass = match (self.oxidizer, oxidizer) {
            (Some(spec), Some(count)) => count as f64 * (spec.tank_mass_kg + spec.tank_capacity_kg),
            _ => 0.0,
        };

        let booster_mass = booster as f64 * self.booster.loaded_mass();

        RawCandidate {
            fuel_count: fuel,
            oxidizer_count: oxidizer,
            booster_count: booster,
            capacity,
            wet_weight: fuel_mass + oxidizer_mass + booster_mass,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EngineType, ModuleCounts, OxidizerType};

    fn query(engine: EngineType) -> Query {
        Query {
            engine,
            oxidizer: OxidizerType::Solid,
            distance_km: 10_000.0,
            allow_waste: false,
            modules: ModuleCounts::default(),
        }
    }

    #[test]
    fn steam_has_no_oxidizer_dimension() {
        let balance = Balance::default();
        let engine = SearchEngine::new(&balance, &query(EngineType::Steam));
        let candidates: Vec<_> = engine.enumerate().collect();

        assert_eq!(candidates.len(), 10 * 9);
        assert_eq!(candidates.len(), engine.space_size());
        assert!(candidates.iter().all(|c| c.oxidizer_count.is_none()));
    }

    #[test]
    fn oxidizer_engines_enumerate_three_dimensions() {
        let balance = Balance::default();
        let engine = SearchEngine::new(&balance, &query(EngineType::Hydrogen));
        let candidates: Vec<_> = engine.enumerate().collect();

        assert_eq!(candidates.len(), 10 * 10 * 9);
        assert_eq!(candidates.len(), engine.space_size());
        assert!(candidates.iter().all(|c| c.oxidizer_count.is_some_and(|n| n >= 1)));
    }

    #[test]
    fn order_is_fuel_major() {
        let balance = Balance::default();
        let engine = SearchEngine::new(&balance, &query(EngineType::Oil));
        let first: Vec<_> = engine
            .enumerate()
            .take(3)
            .map(|c| (c.fuel_count, c.oxidizer_count, c.booster_count))
            .collect();
        assert_eq!(first, vec![(1, Some(1), 0), (1, Some(1), 1), (1, Some(1), 2)]);
    }

    #[test]
    fn wet_weight_counts_tanks_and_boosters() {
        let balance = Balance::default();
        let engine = SearchEngine::new(&balance, &query(EngineType::Oil));
        let candidate = engine
            .enumerate()
            .find(|c| c.fuel_count == 2 && c.oxidizer_count == Some(3) && c.booster_count == 1)
            .unwrap();

        assert_eq!(candidate.capacity, 1800.0);
        // 2 * 1000 fuel tanks, 3 * 1000 oxidizer tanks, 1000 booster
        assert_eq!(candidate.wet_weight, 6000.0);
    }

    #[test]
    fn zero_boosters_limit_still_enumerates() {
        let mut balance = Balance::default();
        balance.limits.max_boosters = 0;
        balance.limits.max_fuel_tanks = 2;
        let engine = SearchEngine::new(&balance, &query(EngineType::Steam));
        assert_eq!(engine.enumerate().count(), 2);
    }
}
